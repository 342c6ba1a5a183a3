use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    FlightSummary,
    Currency,
    DutySummary,
    AircraftStatus,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlightSummary => "flight-summary",
            Self::Currency => "currency",
            Self::DutySummary => "duty-summary",
            Self::AircraftStatus => "aircraft-status",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "flight-summary" | "flights" => Ok(Self::FlightSummary),
            "currency" => Ok(Self::Currency),
            "duty-summary" | "duty" => Ok(Self::DutySummary),
            "aircraft-status" | "aircraft" => Ok(Self::AircraftStatus),
            _ => bail!(
                "Unsupported report kind: {raw}. Supported kinds: flight-summary, currency, duty-summary, aircraft-status"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportCategory {
    Regulatory,
    Duty,
    Aircraft,
    #[serde(other)]
    Unknown,
}

impl ReportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulatory => "regulatory",
            Self::Duty => "duty",
            Self::Aircraft => "aircraft",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "regulatory" => Self::Regulatory,
            "duty" => Self::Duty,
            "aircraft" => Self::Aircraft,
            _ => Self::Unknown,
        }
    }
}

/// Descriptive metadata for one kind of generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTypeRecord {
    pub kind: ReportKind,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub estimated_time: &'static str,
    pub required_data: Vec<&'static str>,
    pub category: ReportCategory,
}

pub fn report_catalog() -> Vec<ReportTypeRecord> {
    vec![
        ReportTypeRecord {
            kind: ReportKind::FlightSummary,
            title: "Flight Time Summary",
            description: "Totals by time category, condition and flight type, with a monthly rollup",
            icon: "plane",
            estimated_time: "< 1 min",
            required_data: vec!["flights"],
            category: ReportCategory::Regulatory,
        },
        ReportTypeRecord {
            kind: ReportKind::Currency,
            title: "Currency Status",
            description: "Passenger and instrument recency (14 CFR 61.57)",
            icon: "calendar-check",
            estimated_time: "< 1 min",
            required_data: vec!["flights"],
            category: ReportCategory::Regulatory,
        },
        ReportTypeRecord {
            kind: ReportKind::DutySummary,
            title: "Duty Time Summary",
            description: "Completed duty hours for the month, broken down by duty type",
            icon: "clock",
            estimated_time: "< 1 min",
            required_data: vec!["duty_logs"],
            category: ReportCategory::Duty,
        },
        ReportTypeRecord {
            kind: ReportKind::AircraftStatus,
            title: "Aircraft Status",
            description: "Airworthiness, inspection due dates and document expiry per aircraft",
            icon: "wrench",
            estimated_time: "< 1 min",
            required_data: vec!["aircraft"],
            category: ReportCategory::Aircraft,
        },
    ]
}

pub fn report_type(kind: ReportKind) -> Option<ReportTypeRecord> {
    report_catalog()
        .into_iter()
        .find(|record| record.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::{ReportKind, report_catalog, report_type};

    #[test]
    fn every_kind_has_catalog_entry() {
        for kind in [
            ReportKind::FlightSummary,
            ReportKind::Currency,
            ReportKind::DutySummary,
            ReportKind::AircraftStatus,
        ] {
            let record = report_type(kind).expect("catalog entry");
            assert_eq!(ReportKind::parse(record.kind.as_str()).expect("parse"), kind);
        }
        assert_eq!(report_catalog().len(), 4);
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(ReportKind::parse("logbook-export").is_err());
    }
}
