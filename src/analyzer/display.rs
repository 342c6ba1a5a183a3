use crate::analyzer::catalog::ReportCategory;
use crate::db::records::{AircraftStatus, DutyType, FlightType};
use serde::Serialize;

pub const NEUTRAL_GRAY: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayStyle {
    pub color: &'static str,
    pub label: &'static str,
}

const fn style(color: &'static str, label: &'static str) -> DisplayStyle {
    DisplayStyle { color, label }
}

pub fn aircraft_status_style(status: AircraftStatus) -> DisplayStyle {
    match status {
        AircraftStatus::Airworthy => style("#22c55e", "Airworthy"),
        AircraftStatus::MaintenanceSoon => style("#f59e0b", "Maintenance Soon"),
        AircraftStatus::MaintenanceDue => style("#ef4444", "Maintenance Due"),
        _ => style(NEUTRAL_GRAY, "Unknown"),
    }
}

pub fn duty_type_style(duty_type: DutyType) -> DisplayStyle {
    match duty_type {
        DutyType::FlightDuty => style("#3b82f6", "Flight Duty"),
        DutyType::Training => style("#8b5cf6", "Training"),
        DutyType::Standby => style("#f59e0b", "Standby"),
        DutyType::Maintenance => style("#f97316", "Maintenance"),
        _ => style(NEUTRAL_GRAY, "Other"),
    }
}

pub fn flight_type_style(flight_type: FlightType) -> DisplayStyle {
    match flight_type {
        FlightType::Training => style("#8b5cf6", "Training"),
        FlightType::Solo => style("#22c55e", "Solo"),
        FlightType::CrossCountry => style("#3b82f6", "Cross Country"),
        FlightType::Local => style("#14b8a6", "Local"),
        FlightType::Commercial => style("#ef4444", "Commercial"),
        _ => style(NEUTRAL_GRAY, "Other"),
    }
}

pub fn report_category_style(category: ReportCategory) -> DisplayStyle {
    match category {
        ReportCategory::Regulatory => style("#3b82f6", "Regulatory"),
        ReportCategory::Duty => style("#8b5cf6", "Duty"),
        ReportCategory::Aircraft => style("#f97316", "Aircraft"),
        _ => style(NEUTRAL_GRAY, "Other"),
    }
}

pub fn aircraft_status_style_raw(raw: &str) -> DisplayStyle {
    aircraft_status_style(AircraftStatus::from_raw(raw))
}

pub fn duty_type_style_raw(raw: &str) -> DisplayStyle {
    duty_type_style(DutyType::from_raw(raw))
}

pub fn flight_type_style_raw(raw: &str) -> DisplayStyle {
    flight_type_style(FlightType::from_raw(raw))
}

pub fn report_category_style_raw(raw: &str) -> DisplayStyle {
    report_category_style(ReportCategory::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::{
        NEUTRAL_GRAY, aircraft_status_style, aircraft_status_style_raw, duty_type_style_raw,
        flight_type_style_raw, report_category_style_raw,
    };
    use crate::db::records::AircraftStatus;

    #[test]
    fn known_values_map_to_their_labels() {
        assert_eq!(
            aircraft_status_style(AircraftStatus::MaintenanceDue).label,
            "Maintenance Due"
        );
        assert_eq!(duty_type_style_raw("flight-duty").label, "Flight Duty");
        assert_eq!(flight_type_style_raw("cross-country").label, "Cross Country");
        assert_eq!(report_category_style_raw("regulatory").label, "Regulatory");
    }

    #[test]
    fn unrecognized_values_resolve_to_neutral_default() {
        let status = aircraft_status_style_raw("grounded");
        assert_eq!(status.color, NEUTRAL_GRAY);
        assert_eq!(status.label, "Unknown");

        for style in [
            duty_type_style_raw(""),
            flight_type_style_raw("aerobatic"),
            report_category_style_raw("tax"),
        ] {
            assert_eq!(style.color, NEUTRAL_GRAY);
            assert_eq!(style.label, "Other");
        }
    }
}
