use crate::analyzer::catalog::{ReportKind, report_type};
use crate::analyzer::display::{aircraft_status_style, duty_type_style, flight_type_style_raw};
use crate::analyzer::duration::{calculate_duration, format_decimal_hours, parse_hours};
use crate::analyzer::rollup::{
    CurrencyStatus, FlightStatistics, FlightTimeTotals, Period, RecencyCheck,
    calculate_total_flight_time, currency_status, duty_hours_by_type, flight_statistics,
    flight_time_totals, hours_by_flight_type, monthly_duty_hours, monthly_flight_hours,
    total_duty_hours,
};
use crate::db::records::{
    AircraftRecord, AircraftStatus, DutyLogRecord, DutyStatus, DutyType, FlightRecord,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const BREAKDOWN_TOLERANCE_HOURS: f64 = 0.1;
const CURRENCY_WARNING_DAYS: i64 = 14;
const ANNUAL_WARNING_DAYS: i64 = 30;
const MONTHLY_DUTY_ADVISORY_HOURS: f64 = 190.0;

pub struct ReportInputs<'a> {
    pub flights: &'a [FlightRecord],
    pub duties: &'a [DutyLogRecord],
    pub aircraft: &'a [AircraftRecord],
}

#[derive(Debug, Clone, Serialize)]
pub struct LogbookReport {
    pub kind: ReportKind,
    pub title: String,
    pub pilot: Option<String>,
    pub as_of: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_summary: Option<FlightSummarySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty: Option<DutySummarySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Vec<AircraftStatusLine>>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightSummarySection {
    pub total_flight_time: String,
    pub totals: FlightTimeTotals,
    pub last_30_days: FlightStatistics,
    pub by_flight_type: BTreeMap<String, f64>,
    pub by_month: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DutySummarySection {
    pub month: String,
    pub completed_hours: f64,
    pub completed_entries: usize,
    pub lifetime_hours: f64,
    pub by_type: BTreeMap<String, f64>,
    pub active: Vec<ActiveDutyLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveDutyLine {
    pub id: i64,
    pub duty_type: DutyType,
    pub description: String,
    pub started_at: String,
    pub elapsed: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AircraftStatusLine {
    pub id: i64,
    pub tail_number: String,
    pub make_model: String,
    pub status: AircraftStatus,
    pub status_label: String,
    pub status_color: String,
    pub total_time: f64,
    pub annual_due: Option<NaiveDate>,
    pub days_until_annual: Option<i64>,
    pub insurance_expiry: Option<NaiveDate>,
    pub registration_expiry: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct SavedReport {
    pub markdown_path: PathBuf,
    pub json_path: PathBuf,
}

pub fn build_report(
    kind: ReportKind,
    inputs: &ReportInputs<'_>,
    pilot: Option<&str>,
    as_of: NaiveDate,
    now: DateTime<Utc>,
) -> LogbookReport {
    let title = report_type(kind)
        .map(|record| record.title.to_string())
        .unwrap_or_else(|| kind.as_str().to_string());

    let mut report = LogbookReport {
        kind,
        title,
        pilot: pilot.map(ToOwned::to_owned),
        as_of: as_of.format("%Y-%m-%d").to_string(),
        generated_at: now.to_rfc3339(),
        flight_summary: None,
        currency: None,
        duty: None,
        aircraft: None,
        notes: Vec::new(),
    };

    let flights = inputs
        .flights
        .iter()
        .filter(|flight| flight.date <= as_of)
        .cloned()
        .collect::<Vec<_>>();

    match kind {
        ReportKind::FlightSummary => {
            report.notes = flight_summary_notes(&flights);
            report.flight_summary = Some(build_flight_summary(&flights, as_of));
        }
        ReportKind::Currency => {
            let status = currency_status(&flights, as_of);
            report.notes = currency_notes(&status);
            report.currency = Some(status);
        }
        ReportKind::DutySummary => {
            let section = build_duty_summary(inputs.duties, as_of, now);
            report.notes = duty_notes(&section);
            report.duty = Some(section);
        }
        ReportKind::AircraftStatus => {
            let lines = inputs
                .aircraft
                .iter()
                .map(|aircraft| aircraft_status_line(aircraft, as_of))
                .collect::<Vec<_>>();
            report.notes = aircraft_notes(&lines, as_of);
            report.aircraft = Some(lines);
        }
    }

    report
}

fn build_flight_summary(flights: &[FlightRecord], as_of: NaiveDate) -> FlightSummarySection {
    FlightSummarySection {
        total_flight_time: calculate_total_flight_time(flights),
        totals: flight_time_totals(flights),
        last_30_days: flight_statistics(flights, Period::Month, end_of_day(as_of)),
        by_flight_type: hours_by_flight_type(flights),
        by_month: monthly_flight_hours(flights),
    }
}

fn build_duty_summary(
    duties: &[DutyLogRecord],
    as_of: NaiveDate,
    now: DateTime<Utc>,
) -> DutySummarySection {
    let month_anchor = end_of_day(as_of);
    let duties = duties
        .iter()
        .filter(|duty| duty.start_time <= month_anchor)
        .cloned()
        .collect::<Vec<_>>();

    let completed_entries = duties
        .iter()
        .filter(|duty| {
            duty.status == DutyStatus::Completed
                && duty.start_time.year() == as_of.year()
                && duty.start_time.month() == as_of.month()
        })
        .count();

    let active = duties
        .iter()
        .filter(|duty| duty.status == DutyStatus::Active)
        .map(|duty| ActiveDutyLine {
            id: duty.id,
            duty_type: duty.duty_type,
            description: duty.description.clone(),
            started_at: duty.start_time.to_rfc3339(),
            elapsed: calculate_duration(Some(duty.start_time), Some(now)),
        })
        .collect::<Vec<_>>();

    DutySummarySection {
        month: as_of.format("%Y-%m").to_string(),
        completed_hours: monthly_duty_hours(&duties, month_anchor),
        completed_entries,
        lifetime_hours: total_duty_hours(&duties),
        by_type: duty_hours_by_type(&duties, month_anchor),
        active,
    }
}

fn aircraft_status_line(aircraft: &AircraftRecord, as_of: NaiveDate) -> AircraftStatusLine {
    let style = aircraft_status_style(aircraft.status);

    AircraftStatusLine {
        id: aircraft.id,
        tail_number: aircraft.tail_number.clone(),
        make_model: format!("{} {} ({})", aircraft.make, aircraft.model, aircraft.year),
        status: aircraft.status,
        status_label: style.label.to_string(),
        status_color: style.color.to_string(),
        total_time: aircraft.total_time,
        annual_due: aircraft.annual_due,
        days_until_annual: aircraft.annual_due.map(|due| (due - as_of).num_days()),
        insurance_expiry: aircraft.insurance.expiry,
        registration_expiry: aircraft.registration.expiry,
    }
}

fn flight_summary_notes(flights: &[FlightRecord]) -> Vec<String> {
    let unparsed = flights
        .iter()
        .filter(|flight| parse_hours(&flight.duration).is_nan())
        .map(|flight| {
            format!(
                "Flight {} on {} has an unreadable duration: {:?}",
                flight.id, flight.date, flight.duration
            )
        })
        .collect::<Vec<_>>();

    let mismatched = flights
        .iter()
        .filter(|flight| {
            let time = &flight.flight_time;
            let parts = time.pic + time.sic + time.solo + time.dual;
            time.total > 0.0 && (time.total - parts).abs() > BREAKDOWN_TOLERANCE_HOURS
        })
        .map(|flight| {
            format!(
                "Flight {} on {}: total {} does not match PIC + SIC + solo + dual",
                flight.id,
                flight.date,
                format_decimal_hours(flight.flight_time.total)
            )
        });

    unparsed.into_iter().chain(mismatched).collect()
}

fn currency_notes(status: &CurrencyStatus) -> Vec<String> {
    let recency_note = |name: &str, check: &RecencyCheck| {
        if !check.current {
            return Some(format!(
                "{name} currency lapsed: {} of {} landings in the last 90 days",
                check.count, check.required
            ));
        }

        check
            .valid_until
            .filter(|until| (*until - status.as_of).num_days() <= CURRENCY_WARNING_DAYS)
            .map(|until| format!("{name} currency expires on {until}"))
    };

    let instrument = (!status.instrument_current).then(|| {
        format!(
            "Instrument currency lapsed since {}: {} of {} approaches, {} of {} holds",
            status.instrument_window_start,
            status.instrument_approaches.count,
            status.instrument_approaches.required,
            status.instrument_holds.count,
            status.instrument_holds.required
        )
    });

    [
        recency_note("Passenger", &status.passenger_day),
        recency_note("Night passenger", &status.passenger_night),
        instrument,
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn duty_notes(section: &DutySummarySection) -> Vec<String> {
    let over_limit = (section.completed_hours > MONTHLY_DUTY_ADVISORY_HOURS).then(|| {
        format!(
            "Duty time for {} is {} h, above the {} h advisory level",
            section.month,
            format_decimal_hours(section.completed_hours),
            MONTHLY_DUTY_ADVISORY_HOURS
        )
    });

    let in_progress = section.active.iter().map(|line| {
        format!(
            "{} duty #{} still open ({} elapsed)",
            duty_type_style(line.duty_type).label,
            line.id,
            line.elapsed
        )
    });

    over_limit.into_iter().chain(in_progress).collect()
}

fn aircraft_notes(lines: &[AircraftStatusLine], as_of: NaiveDate) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| {
            let annual = line.days_until_annual.and_then(|days| {
                if days < 0 {
                    Some(format!(
                        "{}: annual inspection overdue by {} days",
                        line.tail_number, -days
                    ))
                } else if days <= ANNUAL_WARNING_DAYS {
                    Some(format!("{}: annual inspection due in {} days", line.tail_number, days))
                } else {
                    None
                }
            });
            let insurance = line
                .insurance_expiry
                .filter(|expiry| *expiry < as_of)
                .map(|expiry| format!("{}: insurance expired on {expiry}", line.tail_number));
            let registration = line
                .registration_expiry
                .filter(|expiry| *expiry < as_of)
                .map(|expiry| format!("{}: registration expired on {expiry}", line.tail_number));
            let grounded = (line.status == AircraftStatus::MaintenanceDue)
                .then(|| format!("{}: marked {}", line.tail_number, line.status_label));

            [annual, insurance, registration, grounded]
        })
        .flatten()
        .collect()
}

pub fn render_markdown(report: &LogbookReport) -> String {
    let pilot_line = report
        .pilot
        .as_deref()
        .map(|pilot| format!("- Pilot: {pilot}\n"))
        .unwrap_or_default();

    let body = match report.kind {
        ReportKind::FlightSummary => report
            .flight_summary
            .as_ref()
            .map(render_flight_summary),
        ReportKind::Currency => report.currency.as_ref().map(render_currency),
        ReportKind::DutySummary => report.duty.as_ref().map(render_duty_summary),
        ReportKind::AircraftStatus => report.aircraft.as_deref().map(render_aircraft_status),
    }
    .unwrap_or_else(|| "- No data\n".to_string());

    let note_rows = if report.notes.is_empty() {
        "- Nothing to flag".to_string()
    } else {
        report
            .notes
            .iter()
            .map(|entry| format!("- {entry}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# {} - {}\n\n{}- Generated at: {}\n\n{}\n## Notes\n{}\n",
        report.title, report.as_of, pilot_line, report.generated_at, body, note_rows
    )
}

fn render_flight_summary(section: &FlightSummarySection) -> String {
    let totals = &section.totals;
    let rows = [
        ("Logged", totals.logged_hours),
        ("Total", totals.total),
        ("PIC", totals.pic),
        ("SIC", totals.sic),
        ("Solo", totals.solo),
        ("Dual received", totals.dual),
        ("Day", totals.day),
        ("Night", totals.night),
        ("Actual instrument", totals.actual_instrument),
        ("Simulated instrument", totals.simulated_instrument),
        ("Cross-country", totals.cross_country),
    ]
    .iter()
    .map(|(name, hours)| format!("| {name} | {} |", format_decimal_hours(*hours)))
    .collect::<Vec<_>>()
    .join("\n");

    let type_rows = list_hours(section.by_flight_type.iter().map(|(raw, hours)| {
        (flight_type_style_raw(raw).label.to_string(), *hours)
    }));
    let month_rows = list_hours(
        section
            .by_month
            .iter()
            .rev()
            .map(|(month, hours)| (month.clone(), *hours)),
    );

    format!(
        "## Summary\n- Flights: {}\n- Total flight time: {} h\n- Last 30 days: {} h over {} flight(s)\n- Landings: {} day / {} night\n- Approaches: {}, holds: {}\n\n## Time by Category\n| Category | Hours |\n|----------|-------|\n{}\n\n## Time by Flight Type\n{}\n\n## Monthly Rollup\n{}\n",
        totals.flights,
        section.total_flight_time,
        format_decimal_hours(section.last_30_days.period_hours),
        section.last_30_days.period_flights,
        totals.day_landings,
        totals.night_landings,
        totals.approaches,
        totals.holds,
        rows,
        type_rows,
        month_rows
    )
}

fn render_currency(status: &CurrencyStatus) -> String {
    let recency_row = |name: &str, check: &RecencyCheck| {
        format!(
            "| {name} | {} / {} | {} | {} |",
            check.count,
            check.required,
            yes_no(check.current),
            check
                .valid_until
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string())
        )
    };

    format!(
        "## Currency\n| Requirement | Count | Current | Valid until |\n|-------------|-------|---------|-------------|\n{}\n{}\n{}\n{}\n\n- Instrument window starts: {}\n- Instrument current: {}\n",
        recency_row("Landings (90 days)", &status.passenger_day),
        recency_row("Night landings (90 days)", &status.passenger_night),
        recency_row("Approaches (6 months)", &status.instrument_approaches),
        recency_row("Holds (6 months)", &status.instrument_holds),
        status.instrument_window_start,
        yes_no(status.instrument_current)
    )
}

fn render_duty_summary(section: &DutySummarySection) -> String {
    let type_rows = list_hours(section.by_type.iter().map(|(raw, hours)| {
        (
            duty_type_style(DutyType::from_raw(raw)).label.to_string(),
            *hours,
        )
    }));
    let active_rows = if section.active.is_empty() {
        "- None".to_string()
    } else {
        section
            .active
            .iter()
            .map(|line| {
                format!(
                    "- #{} {} since {} ({})",
                    line.id, line.description, line.started_at, line.elapsed
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## Summary\n- Month: {}\n- Completed duty: {} h over {} entr{}\n- Lifetime duty: {} h\n\n## Duty by Type\n{}\n\n## Open Duty Periods\n{}\n",
        section.month,
        format_decimal_hours(section.completed_hours),
        section.completed_entries,
        if section.completed_entries == 1 { "y" } else { "ies" },
        format_decimal_hours(section.lifetime_hours),
        type_rows,
        active_rows
    )
}

fn render_aircraft_status(lines: &[AircraftStatusLine]) -> String {
    if lines.is_empty() {
        return "## Fleet\n- No data\n".to_string();
    }

    let rows = lines
        .iter()
        .map(|line| {
            format!(
                "| {} | {} | {} | {} | {} |",
                line.tail_number,
                line.make_model,
                line.status_label,
                format_decimal_hours(line.total_time),
                line.annual_due
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "-".to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "## Fleet\n| Tail | Aircraft | Status | Total time | Annual due |\n|------|----------|--------|------------|------------|\n{rows}\n"
    )
}

pub fn save_report_files(report: &LogbookReport, report_dir: &Path) -> Result<SavedReport> {
    fs::create_dir_all(report_dir).with_context(|| {
        format!(
            "Failed to create report directory: {}",
            report_dir.display()
        )
    })?;

    let stem = format!("{}-{}", report.kind.as_str(), report.as_of);
    let markdown_path = report_dir.join(format!("{stem}.md"));
    let json_path = report_dir.join(format!("{stem}.json"));

    fs::write(&markdown_path, render_markdown(report)).with_context(|| {
        format!(
            "Failed to write Markdown report: {}",
            markdown_path.display()
        )
    })?;

    let json_content =
        serde_json::to_string_pretty(report).context("Failed to serialize report JSON")?;
    fs::write(&json_path, json_content)
        .with_context(|| format!("Failed to write JSON report: {}", json_path.display()))?;

    Ok(SavedReport {
        markdown_path,
        json_path,
    })
}

fn list_hours<I>(entries: I) -> String
where
    I: Iterator<Item = (String, f64)>,
{
    let rows = entries
        .map(|(name, hours)| format!("- {name}: {} h", format_decimal_hours(hours)))
        .collect::<Vec<_>>();

    if rows.is_empty() {
        "- No data".to_string()
    } else {
        rows.join("\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    (date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1)
}

#[cfg(test)]
mod tests {
    use super::{ReportInputs, build_report, render_markdown, save_report_files};
    use crate::analyzer::catalog::ReportKind;
    use crate::analyzer::rollup::tests::{duty, flight};
    use crate::db::records::{
        AircraftRecord, AircraftStatus, Component, DutyType, Insurance, Landings, Ownership,
        Registration,
    };
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn aircraft(annual_due: NaiveDate) -> AircraftRecord {
        AircraftRecord {
            id: 7,
            tail_number: "N5213K".to_string(),
            make: "Cessna".to_string(),
            model: "172S".to_string(),
            year: 2004,
            status: AircraftStatus::MaintenanceDue,
            ownership: Ownership::Owned,
            total_time: 8123.4,
            engine: Component::default(),
            propeller: Component::default(),
            annual_due: Some(annual_due),
            last_maintenance: None,
            insurance: Insurance {
                expiry: Some(date(2026, 1, 1)),
                ..Insurance::default()
            },
            registration: Registration::default(),
        }
    }

    #[test]
    fn flight_summary_excludes_flights_after_as_of() {
        let mut first = flight(date(2026, 8, 1), "1.5");
        first.flight_time.total = 1.5;
        first.flight_time.pic = 1.5;
        let later = flight(date(2026, 9, 1), "9.0");
        let flights = vec![first, later];
        let inputs = ReportInputs {
            flights: &flights,
            duties: &[],
            aircraft: &[],
        };
        let now = Utc.with_ymd_and_hms(2026, 9, 2, 0, 0, 0).unwrap();

        let report = build_report(
            ReportKind::FlightSummary,
            &inputs,
            Some("A. Pilot"),
            date(2026, 8, 15),
            now,
        );
        let section = report.flight_summary.as_ref().expect("flight section");

        assert_eq!(section.totals.flights, 1);
        assert_eq!(section.total_flight_time, "1.5");
        assert_eq!(section.last_30_days.period_flights, 1);
        assert!(report.notes.is_empty());

        let markdown = render_markdown(&report);
        assert!(markdown.starts_with("# Flight Time Summary - 2026-08-15"));
        assert!(markdown.contains("- Pilot: A. Pilot"));
        assert!(markdown.contains("| PIC | 1.5 |"));
        assert!(markdown.contains("- 2026-08: 1.5 h"));
    }

    #[test]
    fn flight_summary_flags_breakdown_mismatch() {
        let mut mismatch = flight(date(2026, 8, 1), "2.0");
        mismatch.flight_time.total = 2.0;
        mismatch.flight_time.pic = 1.0;
        let flights = vec![mismatch];
        let inputs = ReportInputs {
            flights: &flights,
            duties: &[],
            aircraft: &[],
        };
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap();

        let report = build_report(ReportKind::FlightSummary, &inputs, None, date(2026, 8, 1), now);
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].contains("does not match"));
    }

    #[test]
    fn currency_report_lists_lapsed_requirements() {
        let mut recent = flight(date(2026, 8, 1), "1.0");
        recent.landings = Landings { day: 3, night: 0 };
        let flights = vec![recent];
        let inputs = ReportInputs {
            flights: &flights,
            duties: &[],
            aircraft: &[],
        };
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap();

        let report = build_report(ReportKind::Currency, &inputs, None, date(2026, 8, 2), now);
        let status = report.currency.as_ref().expect("currency section");

        assert!(status.passenger_day.current);
        let lapsed = |prefix: &str| report.notes.iter().any(|note| note.starts_with(prefix));
        assert!(lapsed("Night passenger currency lapsed"));
        assert!(lapsed("Instrument currency lapsed"));
        assert!(!lapsed("Passenger currency"));

        let markdown = render_markdown(&report);
        assert!(markdown.contains("| Landings (90 days) | 3 / 3 | yes |"));
        assert!(!markdown.contains("Day landings"));
    }

    #[test]
    fn duty_report_sums_month_and_lists_open_duty() {
        let start = Utc.with_ymd_and_hms(2026, 8, 3, 6, 0, 0).unwrap();
        let open_start = Utc.with_ymd_and_hms(2026, 8, 20, 6, 0, 0).unwrap();
        let duties = vec![
            duty(start, Some(start + Duration::hours(9)), DutyType::FlightDuty),
            duty(open_start, None, DutyType::Standby),
        ];
        let inputs = ReportInputs {
            flights: &[],
            duties: &duties,
            aircraft: &[],
        };
        let now = open_start + Duration::minutes(95);

        let report = build_report(ReportKind::DutySummary, &inputs, None, date(2026, 8, 20), now);
        let section = report.duty.as_ref().expect("duty section");

        assert_eq!(section.month, "2026-08");
        assert_eq!(section.completed_hours, 9.0);
        assert_eq!(section.completed_entries, 1);
        assert_eq!(section.active.len(), 1);
        assert_eq!(section.active[0].elapsed, "1h 35m");
        assert_eq!(report.notes, vec!["Standby duty #0 still open (1h 35m elapsed)".to_string()]);

        let markdown = render_markdown(&report);
        assert!(markdown.contains("- Completed duty: 9.0 h over 1 entry"));
        assert!(markdown.contains("- Flight Duty: 9.0 h"));
    }

    #[test]
    fn duty_report_ignores_duty_started_after_as_of() {
        let before = Utc.with_ymd_and_hms(2026, 8, 3, 6, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 8, 25, 6, 0, 0).unwrap();
        let duties = vec![
            duty(before, Some(before + Duration::hours(4)), DutyType::Training),
            duty(later, Some(later + Duration::hours(7)), DutyType::FlightDuty),
            duty(later + Duration::days(2), None, DutyType::Standby),
        ];
        let inputs = ReportInputs {
            flights: &[],
            duties: &duties,
            aircraft: &[],
        };
        let now = later + Duration::days(3);

        let report = build_report(ReportKind::DutySummary, &inputs, None, date(2026, 8, 20), now);
        let section = report.duty.as_ref().expect("duty section");

        assert_eq!(section.completed_hours, 4.0);
        assert_eq!(section.completed_entries, 1);
        assert_eq!(section.lifetime_hours, 4.0);
        assert_eq!(section.by_type.get("flight-duty"), None);
        assert!(section.active.is_empty());
    }

    #[test]
    fn aircraft_report_flags_due_dates_and_expiry() {
        let fleet = vec![aircraft(date(2026, 8, 1))];
        let inputs = ReportInputs {
            flights: &[],
            duties: &[],
            aircraft: &fleet,
        };
        let now = Utc.with_ymd_and_hms(2026, 8, 11, 0, 0, 0).unwrap();

        let report = build_report(
            ReportKind::AircraftStatus,
            &inputs,
            None,
            date(2026, 8, 11),
            now,
        );
        let lines = report.aircraft.as_ref().expect("aircraft section");

        assert_eq!(lines[0].days_until_annual, Some(-10));
        assert_eq!(lines[0].status_label, "Maintenance Due");
        assert_eq!(
            report.notes,
            vec![
                "N5213K: annual inspection overdue by 10 days".to_string(),
                "N5213K: insurance expired on 2026-01-01".to_string(),
                "N5213K: marked Maintenance Due".to_string(),
            ]
        );
    }

    #[test]
    fn saves_markdown_and_json_side_by_side() {
        let dir = tempdir().expect("tempdir");
        let inputs = ReportInputs {
            flights: &[],
            duties: &[],
            aircraft: &[],
        };
        let now = Utc.with_ymd_and_hms(2026, 8, 11, 0, 0, 0).unwrap();
        let report = build_report(
            ReportKind::AircraftStatus,
            &inputs,
            None,
            date(2026, 8, 11),
            now,
        );

        let saved = save_report_files(&report, dir.path()).expect("save");

        assert!(saved.markdown_path.ends_with("aircraft-status-2026-08-11.md"));
        let json = std::fs::read_to_string(&saved.json_path).expect("read json");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse json");
        assert_eq!(parsed["kind"], "aircraft-status");
        assert!(parsed.get("flight_summary").is_none());
    }
}
