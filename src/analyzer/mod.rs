pub mod catalog;
pub mod display;
pub mod duration;
pub mod report;
pub mod rollup;

use crate::analyzer::catalog::ReportKind;
use crate::analyzer::report::{LogbookReport, ReportInputs, SavedReport};
use crate::config::Config;
use crate::db::Database;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

pub fn generate_and_store_report(
    config: &Config,
    kind: ReportKind,
    as_of: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(LogbookReport, SavedReport)> {
    let database = Database::open(&config.db_path)?;

    let flights = match kind {
        ReportKind::FlightSummary | ReportKind::Currency => database.all_flights()?,
        _ => Vec::new(),
    };
    let duties = match kind {
        ReportKind::DutySummary => database.all_duty_logs()?,
        _ => Vec::new(),
    };
    let aircraft = match kind {
        ReportKind::AircraftStatus => database.all_aircraft()?,
        _ => Vec::new(),
    };

    let inputs = ReportInputs {
        flights: &flights,
        duties: &duties,
        aircraft: &aircraft,
    };
    let report = report::build_report(kind, &inputs, config.pilot_name.as_deref(), as_of, now);
    let saved = report::save_report_files(&report, &config.report_dir)?;

    database.upsert_report_meta(
        kind.as_str(),
        as_of,
        now.timestamp(),
        &saved.markdown_path.display().to_string(),
        &saved.json_path.display().to_string(),
    )?;

    info!(
        kind = kind.as_str(),
        as_of = %as_of,
        notes = report.notes.len(),
        "report generated"
    );

    Ok((report, saved))
}

#[cfg(test)]
mod tests {
    use super::generate_and_store_report;
    use crate::analyzer::catalog::ReportKind;
    use crate::config::Config;
    use crate::db::Database;
    use crate::db::records::NewFlight;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    #[test]
    fn pipeline_writes_files_and_records_metadata() {
        let dir = tempdir().expect("tempdir");
        let config = Config {
            db_path: dir.path().join("db").join("logbook.db"),
            report_dir: dir.path().join("reports"),
            pilot_name: Some("A. Pilot".to_string()),
            ..Config::default()
        };

        let flight: NewFlight = serde_json::from_value(serde_json::json!({
            "date": "2026-09-01",
            "route": "KPAO-KHAF",
            "aircraft_id": "PA28",
            "tail_number": "N8045X",
            "duration": "1.1",
            "landings": { "day": 3 },
            "flight_type": "local"
        }))
        .expect("valid flight payload");
        Database::open(&config.db_path)
            .expect("open db")
            .create_flight(&flight)
            .expect("insert");

        let as_of = NaiveDate::from_ymd_opt(2026, 9, 5).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 9, 5, 18, 0, 0).unwrap();
        let (report, saved) =
            generate_and_store_report(&config, ReportKind::Currency, as_of, now).expect("report");

        assert!(report.currency.expect("currency").passenger_day.current);
        assert!(saved.markdown_path.exists());
        assert!(saved.json_path.exists());

        let latest = Database::open(&config.db_path)
            .expect("open db")
            .latest_report_meta()
            .expect("query")
            .expect("report recorded");
        assert_eq!(latest.kind, "currency");
        assert_eq!(latest.as_of, "2026-09-05");
    }
}
