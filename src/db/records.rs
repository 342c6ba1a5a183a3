use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::duration::{elapsed_hours, format_decimal_hours};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightType {
    Training,
    Solo,
    CrossCountry,
    Local,
    Commercial,
    #[serde(other)]
    Unknown,
}

impl FlightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Solo => "solo",
            Self::CrossCountry => "cross-country",
            Self::Local => "local",
            Self::Commercial => "commercial",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "training" => Self::Training,
            "solo" => Self::Solo,
            "cross-country" | "cross_country" | "xc" => Self::CrossCountry,
            "local" => Self::Local,
            "commercial" => Self::Commercial,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyType {
    FlightDuty,
    Training,
    Standby,
    Maintenance,
    #[serde(other)]
    Unknown,
}

impl DutyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlightDuty => "flight-duty",
            Self::Training => "training",
            Self::Standby => "standby",
            Self::Maintenance => "maintenance",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "flight-duty" | "flight_duty" | "flight" => Self::FlightDuty,
            "training" => Self::Training,
            "standby" => Self::Standby,
            "maintenance" => Self::Maintenance,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyStatus {
    Active,
    Completed,
    #[serde(other)]
    Unknown,
}

impl DutyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AircraftStatus {
    Airworthy,
    MaintenanceSoon,
    MaintenanceDue,
    #[serde(other)]
    Unknown,
}

impl AircraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Airworthy => "airworthy",
            Self::MaintenanceSoon => "maintenance-soon",
            Self::MaintenanceDue => "maintenance-due",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "airworthy" => Self::Airworthy,
            "maintenance-soon" | "maintenance_soon" => Self::MaintenanceSoon,
            "maintenance-due" | "maintenance_due" => Self::MaintenanceDue,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    Owned,
    Rented,
    #[serde(other)]
    Unknown,
}

impl Ownership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Rented => "rented",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "owned" => Self::Owned,
            "rented" => Self::Rented,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTime {
    pub total: f64,
    pub pic: f64,
    pub sic: f64,
    pub solo: f64,
    pub dual: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConditions {
    pub day: f64,
    pub night: f64,
    pub actual_instrument: f64,
    pub simulated_instrument: f64,
    pub cross_country: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Landings {
    pub day: u32,
    pub night: u32,
}

impl Landings {
    pub fn total(&self) -> u32 {
        self.day.saturating_add(self.night)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub route: String,
    pub aircraft_id: String,
    pub tail_number: String,
    pub duration: String,
    pub flight_time: FlightTime,
    pub conditions: FlightConditions,
    pub landings: Landings,
    pub approaches: u32,
    pub holds: u32,
    pub remarks: String,
    pub instructor: Option<String>,
    pub flight_type: FlightType,
}

/// Flight entry as submitted, before it has been assigned an id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFlight {
    pub date: NaiveDate,
    pub route: String,
    pub aircraft_id: String,
    pub tail_number: String,
    pub duration: String,
    #[serde(default)]
    pub flight_time: FlightTime,
    #[serde(default)]
    pub conditions: FlightConditions,
    #[serde(default)]
    pub landings: Landings,
    #[serde(default)]
    pub approaches: u32,
    #[serde(default)]
    pub holds: u32,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub instructor: Option<String>,
    pub flight_type: FlightType,
}

#[derive(Debug, Clone, Serialize)]
pub struct DutyLogRecord {
    pub id: i64,
    pub duty_type: DutyType,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub status: DutyStatus,
    pub location: Option<String>,
    pub crew: Option<String>,
    pub aircraft: Option<String>,
    pub flight_number: Option<String>,
    pub instructor: Option<String>,
    pub training_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DutyDetails {
    pub location: Option<String>,
    pub crew: Option<String>,
    pub aircraft: Option<String>,
    pub flight_number: Option<String>,
    pub instructor: Option<String>,
    pub training_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDutyLog {
    pub duty_type: DutyType,
    pub description: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: DutyDetails,
}

impl NewDutyLog {
    /// Status and stored duration both follow from the end time.
    pub fn derived_status(&self) -> Result<(DutyStatus, Option<String>)> {
        match self.end_time {
            None => Ok((DutyStatus::Active, None)),
            Some(end) if end < self.start_time => bail!(
                "Duty end time {} is before start time {}",
                end.to_rfc3339(),
                self.start_time.to_rfc3339()
            ),
            Some(end) => Ok((
                DutyStatus::Completed,
                Some(format_decimal_hours(elapsed_hours(self.start_time, end))),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Component {
    pub model: String,
    pub serial_number: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insurance {
    pub company: String,
    pub policy_number: String,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub category: String,
    pub class: String,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AircraftRecord {
    pub id: i64,
    pub tail_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub status: AircraftStatus,
    pub ownership: Ownership,
    pub total_time: f64,
    pub engine: Component,
    pub propeller: Component,
    pub annual_due: Option<NaiveDate>,
    pub last_maintenance: Option<NaiveDate>,
    pub insurance: Insurance,
    pub registration: Registration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAircraft {
    pub tail_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub status: AircraftStatus,
    pub ownership: Ownership,
    #[serde(default)]
    pub total_time: f64,
    #[serde(default)]
    pub engine: Component,
    #[serde(default)]
    pub propeller: Component,
    #[serde(default)]
    pub annual_due: Option<NaiveDate>,
    #[serde(default)]
    pub last_maintenance: Option<NaiveDate>,
    #[serde(default)]
    pub insurance: Insurance,
    #[serde(default)]
    pub registration: Registration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetaRecord {
    pub id: i64,
    pub kind: String,
    pub as_of: String,
    pub generated_at: i64,
    pub md_path: String,
    pub json_path: String,
}
