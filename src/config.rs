use crate::analyzer::rollup::Period;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".pilotlog";
const SETTINGS_FILE: &str = "config.json";
const DEFAULT_PERIOD: &str = "month";
pub const DEFAULT_API_PORT: u16 = 7891;

/// Logbook settings persisted as JSON. Missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub report_dir: PathBuf,
    pub api_port: u16,
    pub default_period: String,
    pub pilot_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: app_dir().join("db").join("logbook.db"),
            report_dir: default_report_dir(),
            api_port: DEFAULT_API_PORT,
            default_period: DEFAULT_PERIOD.to_string(),
            pilot_name: None,
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        app_dir().join(SETTINGS_FILE)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Cannot read logbook settings at {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Logbook settings at {} are not valid JSON", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            create_dir(dir)?;
        }

        let body = serde_json::to_string_pretty(self).context("Cannot encode logbook settings")?;
        fs::write(path, body)
            .with_context(|| format!("Cannot write logbook settings to {}", path.display()))?;
        restrict_to_owner(path)
    }

    /// Creates the app, database and report directories if they are missing.
    pub fn ensure_bootstrap_files(&self) -> Result<()> {
        create_dir(&app_dir())?;
        if let Some(db_dir) = self.db_path.parent() {
            create_dir(db_dir)?;
        }
        create_dir(&self.report_dir)
    }

    pub fn period(&self) -> Result<Period> {
        Period::parse(&self.default_period)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();

        match canonical_key(key) {
            Some("db_path") => self.db_path = expand_home(value),
            Some("report_dir") => self.report_dir = expand_home(value),
            Some("api_port") => {
                self.api_port = value
                    .parse::<u16>()
                    .with_context(|| format!("api_port must be a port number, got {value:?}"))?;
            }
            Some("default_period") => {
                self.default_period = Period::parse(value)?.as_str().to_string();
            }
            Some("pilot_name") => {
                self.pilot_name = (!value.is_empty()).then(|| value.to_string());
            }
            _ => bail!("Unknown setting {key:?}. Known settings: {KNOWN_KEYS}"),
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = match canonical_key(key)? {
            "db_path" => self.db_path.display().to_string(),
            "report_dir" => self.report_dir.display().to_string(),
            "api_port" => self.api_port.to_string(),
            "default_period" => self.default_period.clone(),
            "pilot_name" => self.pilot_name.clone().unwrap_or_else(|| "not_set".to_string()),
            _ => return None,
        };

        Some(value)
    }
}

const KNOWN_KEYS: &str =
    "db_path|db.path, report_dir|report.dir, api_port|api.port, default_period|stats.period, pilot_name|pilot.name";

fn canonical_key(key: &str) -> Option<&'static str> {
    let canonical = match key.trim() {
        "db_path" | "db.path" => "db_path",
        "report_dir" | "report.dir" => "report_dir",
        "api_port" | "api.port" => "api_port",
        "default_period" | "stats.period" => "default_period",
        "pilot_name" | "pilot.name" => "pilot_name",
        _ => return None,
    };

    Some(canonical)
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {value}. Example: 2026-02-18"))
}

/// RFC 3339, or a bare date taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| parse_date(value).map(|date| date.and_time(NaiveTime::MIN).and_utc()))
        .with_context(|| {
            format!("Invalid timestamp: {value}. Example: 2026-02-18T06:30:00Z or 2026-02-18")
        })
}

pub fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

fn home_or_cwd() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn app_dir() -> PathBuf {
    home_or_cwd().join(APP_DIR)
}

pub fn default_report_dir() -> PathBuf {
    home_or_cwd().join("Documents").join("pilotlog").join("reports")
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Cannot create directory {}", dir.display()))
}

fn restrict_to_owner(path: &Path) -> Result<()> {
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Cannot restrict permissions on {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_API_PORT, parse_date, parse_timestamp};
    use crate::analyzer::rollup::Period;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    #[test]
    fn timestamps_accept_offsets_and_bare_dates() {
        assert_eq!(
            parse_timestamp("2026-03-01T08:00:00+02:00").expect("rfc3339"),
            Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2026-03-01").expect("date"),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_date("03/01/2026").is_err());
    }

    #[test]
    fn dotted_aliases_resolve_to_same_key() {
        let mut config = Config::default();

        config.set_value("api.port", "9000").expect("set port");
        assert_eq!(config.get_value("api_port").as_deref(), Some("9000"));

        config.set_value("stats.period", "Week").expect("set period");
        assert_eq!(config.default_period, "week");
        assert_eq!(config.period().expect("period"), Period::Week);

        config.set_value("pilot.name", "  Amelia  ").expect("set name");
        assert_eq!(config.get_value("pilot_name").as_deref(), Some("Amelia"));
    }

    #[test]
    fn rejects_bad_values_and_unknown_keys() {
        let mut config = Config::default();

        assert!(config.set_value("api_port", "seventy").is_err());
        assert!(config.set_value("default_period", "decade").is_err());
        assert!(config.set_value("theme", "dark").is_err());
        assert_eq!(config.api_port, DEFAULT_API_PORT);
        assert_eq!(config.get_value("theme"), None);
    }

    #[test]
    fn save_and_load_round_trip_with_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "api_port": 8123 }"#).expect("write partial config");
        let loaded = Config::load_from(&path).expect("load partial");
        assert_eq!(loaded.api_port, 8123);
        assert_eq!(loaded.default_period, "month");

        let mut updated = loaded.clone();
        updated.pilot_name = Some("B. Flyer".to_string());
        updated.save_to(&path).expect("save");
        let reloaded = Config::load_from(&path).expect("reload");
        assert_eq!(reloaded.pilot_name.as_deref(), Some("B. Flyer"));
    }
}
