use crate::analyzer::duration::{elapsed_hours, format_decimal_hours, parse_hours};
use crate::db::records::{DutyLogRecord, DutyStatus, FlightRecord};
use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PASSENGER_WINDOW_DAYS: i64 = 90;
pub const PASSENGER_LANDINGS_REQUIRED: u32 = 3;
pub const INSTRUMENT_WINDOW_MONTHS: u32 = 6;
pub const INSTRUMENT_APPROACHES_REQUIRED: u32 = 6;
pub const INSTRUMENT_HOLDS_REQUIRED: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => bail!("Unsupported period: {raw}. Expected week|month|year"),
        }
    }
}

/// Lifetime totals next to window-scoped figures. Only the `period_*` fields
/// depend on the selected period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightStatistics {
    pub total_hours: f64,
    pub pic_hours: f64,
    pub period_hours: f64,
    pub period_flights: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightTimeTotals {
    pub flights: usize,
    pub logged_hours: f64,
    pub total: f64,
    pub pic: f64,
    pub sic: f64,
    pub solo: f64,
    pub dual: f64,
    pub day: f64,
    pub night: f64,
    pub actual_instrument: f64,
    pub simulated_instrument: f64,
    pub cross_country: f64,
    pub day_landings: u32,
    pub night_landings: u32,
    pub approaches: u32,
    pub holds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyCheck {
    pub count: u32,
    pub required: u32,
    pub current: bool,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyStatus {
    pub as_of: NaiveDate,
    pub passenger_day: RecencyCheck,
    pub passenger_night: RecencyCheck,
    pub instrument_window_start: NaiveDate,
    pub instrument_approaches: RecencyCheck,
    pub instrument_holds: RecencyCheck,
    pub instrument_current: bool,
}

pub fn calculate_total_flight_time(flights: &[FlightRecord]) -> String {
    let total = flights
        .iter()
        .map(|flight| parse_hours(&flight.duration))
        .sum::<f64>();

    format_decimal_hours(total)
}

pub fn flight_statistics(
    flights: &[FlightRecord],
    period: Period,
    now: DateTime<Utc>,
) -> FlightStatistics {
    let window_start = now - Duration::days(period.days());

    let total_hours = flights
        .iter()
        .map(|flight| parse_hours(&flight.duration))
        .sum::<f64>();
    let pic_hours = flights
        .iter()
        .map(|flight| flight.flight_time.pic)
        .sum::<f64>();

    let in_period = flights
        .iter()
        .filter(|flight| flight_start_of_day(flight) >= window_start)
        .collect::<Vec<_>>();

    FlightStatistics {
        total_hours,
        pic_hours,
        period_hours: in_period
            .iter()
            .map(|flight| parse_hours(&flight.duration))
            .sum::<f64>(),
        period_flights: in_period.len(),
    }
}

/// Hours a single duty entry contributes: the timestamp span when the entry
/// is closed, else its stored duration, else nothing.
pub fn duty_entry_hours(duty: &DutyLogRecord) -> f64 {
    match duty.end_time {
        Some(end) => elapsed_hours(duty.start_time, end),
        None => duty
            .duration
            .as_deref()
            .map(parse_hours)
            .filter(|hours| hours.is_finite())
            .unwrap_or_default(),
    }
}

/// Completed duty time started in the calendar month (UTC) containing `as_of`.
pub fn monthly_duty_hours(duties: &[DutyLogRecord], as_of: DateTime<Utc>) -> f64 {
    duties
        .iter()
        .filter(|duty| duty.status == DutyStatus::Completed && same_month(duty.start_time, as_of))
        .map(duty_entry_hours)
        .sum()
}

pub fn total_duty_hours(duties: &[DutyLogRecord]) -> f64 {
    duties
        .iter()
        .filter(|duty| duty.status == DutyStatus::Completed)
        .map(duty_entry_hours)
        .sum()
}

pub fn duty_hours_by_type(
    duties: &[DutyLogRecord],
    as_of: DateTime<Utc>,
) -> BTreeMap<String, f64> {
    duties
        .iter()
        .filter(|duty| duty.status == DutyStatus::Completed && same_month(duty.start_time, as_of))
        .fold(BTreeMap::new(), |mut acc, duty| {
            *acc.entry(duty.duty_type.as_str().to_string()).or_insert(0.0) +=
                duty_entry_hours(duty);
            acc
        })
}

pub fn flight_time_totals(flights: &[FlightRecord]) -> FlightTimeTotals {
    flights
        .iter()
        .fold(FlightTimeTotals::default(), |mut acc, flight| {
            acc.flights += 1;
            acc.logged_hours += parse_hours(&flight.duration);
            acc.total += flight.flight_time.total;
            acc.pic += flight.flight_time.pic;
            acc.sic += flight.flight_time.sic;
            acc.solo += flight.flight_time.solo;
            acc.dual += flight.flight_time.dual;
            acc.day += flight.conditions.day;
            acc.night += flight.conditions.night;
            acc.actual_instrument += flight.conditions.actual_instrument;
            acc.simulated_instrument += flight.conditions.simulated_instrument;
            acc.cross_country += flight.conditions.cross_country;
            acc.day_landings = acc.day_landings.saturating_add(flight.landings.day);
            acc.night_landings = acc.night_landings.saturating_add(flight.landings.night);
            acc.approaches = acc.approaches.saturating_add(flight.approaches);
            acc.holds = acc.holds.saturating_add(flight.holds);
            acc
        })
}

pub fn hours_by_flight_type(flights: &[FlightRecord]) -> BTreeMap<String, f64> {
    flights.iter().fold(BTreeMap::new(), |mut acc, flight| {
        let flight_type = flight.flight_type.as_str().to_string();
        *acc.entry(flight_type).or_insert(0.0) += parse_hours(&flight.duration);
        acc
    })
}

/// Logged hours keyed by `YYYY-MM`.
pub fn monthly_flight_hours(flights: &[FlightRecord]) -> BTreeMap<String, f64> {
    flights.iter().fold(BTreeMap::new(), |mut acc, flight| {
        let month = flight.date.format("%Y-%m").to_string();
        *acc.entry(month).or_insert(0.0) += parse_hours(&flight.duration);
        acc
    })
}

/// Recent-experience status as of a date. Flights after `as_of` are ignored.
pub fn currency_status(flights: &[FlightRecord], as_of: NaiveDate) -> CurrencyStatus {
    let mut logged = flights
        .iter()
        .filter(|flight| flight.date <= as_of)
        .collect::<Vec<_>>();
    logged.sort_by(|left, right| right.date.cmp(&left.date));

    let passenger_day = landing_recency(&logged, as_of, |flight| flight.landings.total());
    let passenger_night = landing_recency(&logged, as_of, |flight| flight.landings.night);

    let instrument_window_start = as_of
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(INSTRUMENT_WINDOW_MONTHS)))
        .unwrap_or(as_of);
    let instrument_flights = logged
        .iter()
        .filter(|flight| flight.date >= instrument_window_start)
        .collect::<Vec<_>>();

    let approaches = instrument_flights
        .iter()
        .map(|flight| flight.approaches)
        .fold(0, u32::saturating_add);
    let holds = instrument_flights
        .iter()
        .map(|flight| flight.holds)
        .fold(0, u32::saturating_add);

    let instrument_approaches = RecencyCheck {
        count: approaches,
        required: INSTRUMENT_APPROACHES_REQUIRED,
        current: approaches >= INSTRUMENT_APPROACHES_REQUIRED,
        valid_until: None,
    };
    let instrument_holds = RecencyCheck {
        count: holds,
        required: INSTRUMENT_HOLDS_REQUIRED,
        current: holds >= INSTRUMENT_HOLDS_REQUIRED,
        valid_until: None,
    };

    CurrencyStatus {
        as_of,
        passenger_day,
        passenger_night,
        instrument_window_start,
        instrument_current: instrument_approaches.current && instrument_holds.current,
        instrument_approaches,
        instrument_holds,
    }
}

fn landing_recency<F>(newest_first: &[&FlightRecord], as_of: NaiveDate, landings: F) -> RecencyCheck
where
    F: Fn(&FlightRecord) -> u32,
{
    let window_start = as_of - Duration::days(PASSENGER_WINDOW_DAYS);

    let count = newest_first
        .iter()
        .filter(|flight| flight.date >= window_start)
        .map(|flight| landings(*flight))
        .fold(0, u32::saturating_add);

    let valid_until = newest_first
        .iter()
        .scan(0_u32, |running, flight| {
            *running = running.saturating_add(landings(*flight));
            Some((*running, flight.date))
        })
        .find(|(running, _)| *running >= PASSENGER_LANDINGS_REQUIRED)
        .map(|(_, date)| date + Duration::days(PASSENGER_WINDOW_DAYS));

    RecencyCheck {
        count,
        required: PASSENGER_LANDINGS_REQUIRED,
        current: count >= PASSENGER_LANDINGS_REQUIRED,
        valid_until,
    }
}

fn flight_start_of_day(flight: &FlightRecord) -> DateTime<Utc> {
    flight.date.and_time(NaiveTime::MIN).and_utc()
}

fn same_month(timestamp: DateTime<Utc>, as_of: DateTime<Utc>) -> bool {
    timestamp.year() == as_of.year() && timestamp.month() == as_of.month()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{
        Period, calculate_total_flight_time, currency_status, duty_hours_by_type,
        flight_statistics, flight_time_totals, hours_by_flight_type, monthly_duty_hours,
        monthly_flight_hours, total_duty_hours,
    };
    use crate::db::records::{
        DutyLogRecord, DutyStatus, DutyType, FlightConditions, FlightRecord, FlightTime,
        FlightType, Landings,
    };
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    pub(crate) fn flight(date: NaiveDate, duration: &str) -> FlightRecord {
        FlightRecord {
            id: 0,
            date,
            route: "KPAO-KSQL".to_string(),
            aircraft_id: "C172".to_string(),
            tail_number: "N12345".to_string(),
            duration: duration.to_string(),
            flight_time: FlightTime::default(),
            conditions: FlightConditions::default(),
            landings: Landings::default(),
            approaches: 0,
            holds: 0,
            remarks: String::new(),
            instructor: None,
            flight_type: FlightType::Local,
        }
    }

    pub(crate) fn duty(
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        duty_type: DutyType,
    ) -> DutyLogRecord {
        DutyLogRecord {
            id: 0,
            duty_type,
            description: "line duty".to_string(),
            start_time: start,
            end_time: end,
            duration: None,
            status: if end.is_some() {
                DutyStatus::Completed
            } else {
                DutyStatus::Active
            },
            location: None,
            crew: None,
            aircraft: None,
            flight_number: None,
            instructor: None,
            training_type: None,
            notes: None,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn total_flight_time_rounds_to_one_decimal() {
        let flights = vec![
            flight(date(2026, 1, 1), "1.5"),
            flight(date(2026, 1, 2), "2.0"),
            flight(date(2026, 1, 3), "0.75"),
        ];

        assert_eq!(calculate_total_flight_time(&flights), "4.3");
        assert_eq!(calculate_total_flight_time(&[]), "0.0");
    }

    #[test]
    fn total_flight_time_rounds_the_stored_sum_not_a_scaled_copy() {
        let flights = vec![
            flight(date(2026, 1, 1), "0.7"),
            flight(date(2026, 1, 2), "0.75"),
        ];

        // 0.7 + 0.75 is stored as 1.4499999999999999556.
        assert_eq!(calculate_total_flight_time(&flights), "1.4");
    }

    #[test]
    fn period_only_changes_windowed_fields() {
        let now = Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap();
        let mut recent = flight(date(2026, 6, 28), "1.5");
        recent.flight_time.pic = 1.5;
        let mut older = flight(date(2026, 6, 10), "2.25");
        older.flight_time.pic = 2.25;
        let ancient = flight(date(2025, 1, 5), "3.0");
        let flights = vec![recent, older, ancient];

        let week = flight_statistics(&flights, Period::Week, now);
        let month = flight_statistics(&flights, Period::Month, now);
        let year = flight_statistics(&flights, Period::Year, now);

        for stats in [&week, &month, &year] {
            assert_eq!(stats.total_hours, 6.75);
            assert_eq!(stats.pic_hours, 3.75);
        }
        assert_eq!(week.period_flights, 1);
        assert_eq!(week.period_hours, 1.5);
        assert_eq!(month.period_flights, 2);
        assert_eq!(month.period_hours, 3.75);
        assert_eq!(year.period_flights, 2);
    }

    #[test]
    fn period_window_compares_against_start_of_flight_day() {
        let now = Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap();
        // 2026-06-23 00:00 is 7.5 days before `now`.
        let flights = vec![flight(date(2026, 6, 23), "1.0"), flight(date(2026, 6, 24), "1.0")];

        assert_eq!(flight_statistics(&flights, Period::Week, now).period_flights, 1);
    }

    #[test]
    fn period_parse_is_strict() {
        assert_eq!(Period::parse("Month").expect("month"), Period::Month);
        assert_eq!(Period::Year.days(), 365);
        assert!(Period::parse("fortnight").is_err());
    }

    #[test]
    fn monthly_duty_sums_completed_entries_in_as_of_month() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let march = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        let february = Utc.with_ymd_and_hms(2026, 2, 27, 6, 0, 0).unwrap();

        let standby = march + Duration::days(3);

        let duties = vec![
            duty(march, Some(march + Duration::minutes(510)), DutyType::FlightDuty),
            duty(standby, Some(standby + Duration::hours(2)), DutyType::Standby),
            duty(march + Duration::days(5), None, DutyType::FlightDuty),
            duty(february, Some(february + Duration::hours(10)), DutyType::Training),
        ];

        assert_eq!(monthly_duty_hours(&duties, as_of), 10.5);
        assert_eq!(total_duty_hours(&duties), 20.5);

        let by_type = duty_hours_by_type(&duties, as_of);
        assert_eq!(by_type.get("flight-duty"), Some(&8.5));
        assert_eq!(by_type.get("standby"), Some(&2.0));
        assert_eq!(by_type.get("training"), None);
    }

    #[test]
    fn monthly_duty_uses_stored_duration_when_end_is_missing() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        let mut entry = duty(start, None, DutyType::Maintenance);
        entry.status = DutyStatus::Completed;
        entry.duration = Some("3.5".to_string());

        assert_eq!(monthly_duty_hours(&[entry], as_of), 3.5);
    }

    #[test]
    fn totals_sum_every_column() {
        let mut first = flight(date(2026, 4, 1), "1.5");
        first.flight_time.pic = 1.5;
        first.conditions.night = 0.5;
        first.landings = Landings { day: 2, night: 1 };
        first.approaches = 2;
        let mut second = flight(date(2026, 4, 12), "2.0");
        second.flight_time.dual = 2.0;
        second.conditions.cross_country = 2.0;
        second.flight_type = FlightType::CrossCountry;
        second.holds = 1;

        let flights = vec![first, second];
        let totals = flight_time_totals(&flights);

        assert_eq!(totals.flights, 2);
        assert_eq!(totals.logged_hours, 3.5);
        assert_eq!(totals.pic, 1.5);
        assert_eq!(totals.dual, 2.0);
        assert_eq!(totals.night, 0.5);
        assert_eq!(totals.cross_country, 2.0);
        assert_eq!(totals.day_landings + totals.night_landings, 3);
        assert_eq!(totals.approaches, 2);
        assert_eq!(totals.holds, 1);

        let by_type = hours_by_flight_type(&flights);
        assert_eq!(by_type.get("local"), Some(&1.5));
        assert_eq!(by_type.get("cross-country"), Some(&2.0));

        let by_month = monthly_flight_hours(&flights);
        assert_eq!(by_month.get("2026-04"), Some(&3.5));
    }

    #[test]
    fn passenger_currency_lapses_after_ninety_days() {
        let mut landing_day = flight(date(2026, 1, 10), "1.0");
        landing_day.landings = Landings { day: 3, night: 0 };
        let flights = vec![landing_day];

        let current = currency_status(&flights, date(2026, 4, 10));
        assert!(current.passenger_day.current);
        assert_eq!(current.passenger_day.valid_until, Some(date(2026, 4, 10)));
        assert!(!current.passenger_night.current);

        let lapsed = currency_status(&flights, date(2026, 4, 11));
        assert!(!lapsed.passenger_day.current);
        assert_eq!(lapsed.passenger_day.count, 0);
    }

    #[test]
    fn instrument_currency_uses_six_calendar_months() {
        let mut approaches = flight(date(2026, 4, 2), "1.4");
        approaches.approaches = 6;
        approaches.holds = 1;
        let flights = vec![approaches];

        let current = currency_status(&flights, date(2026, 10, 31));
        assert_eq!(current.instrument_window_start, date(2026, 4, 1));
        assert!(current.instrument_current);

        let lapsed = currency_status(&flights, date(2026, 11, 1));
        assert!(!lapsed.instrument_current);
        assert_eq!(lapsed.instrument_approaches.count, 0);
    }

    #[test]
    fn huge_landing_counts_saturate_instead_of_overflowing() {
        let mut logged = flight(date(2026, 5, 1), "1.0");
        logged.landings = Landings {
            day: u32::MAX,
            night: 1,
        };
        logged.approaches = u32::MAX;
        let mut second = flight(date(2026, 5, 2), "1.0");
        second.landings = Landings { day: 5, night: 5 };
        second.approaches = 3;
        let flights = vec![logged, second];

        let status = currency_status(&flights, date(2026, 5, 10));
        assert_eq!(status.passenger_day.count, u32::MAX);
        assert_eq!(status.passenger_night.count, 6);
        assert_eq!(status.instrument_approaches.count, u32::MAX);
        assert!(status.passenger_day.current);

        let totals = flight_time_totals(&flights);
        assert_eq!(totals.day_landings, u32::MAX);
        assert_eq!(totals.approaches, u32::MAX);
    }
}
