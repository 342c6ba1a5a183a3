pub mod queries;
pub mod records;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use records::{
    AircraftRecord, AircraftStatus, Component, DutyLogRecord, DutyStatus, DutyType,
    FlightConditions, FlightRecord, FlightTime, FlightType, Insurance, Landings, NewAircraft,
    NewDutyLog, NewFlight, Ownership, Registration, ReportMetaRecord,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let database = Self { conn };
        database.init_schema()?;

        Ok(database)
    }

    pub fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }

    pub fn all_flights(&self) -> Result<Vec<FlightRecord>> {
        let mut statement = self.conn.prepare(&format!(
            "{} ORDER BY date DESC, id DESC",
            queries::SELECT_FLIGHT
        ))?;

        let rows = statement
            .query_map([], flight_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query flights")?;

        Ok(rows)
    }

    pub fn recent_flights(&self, limit: usize) -> Result<Vec<FlightRecord>> {
        let mut statement = self.conn.prepare(&format!(
            "{} ORDER BY date DESC, id DESC LIMIT ?1",
            queries::SELECT_FLIGHT
        ))?;

        let rows = statement
            .query_map(params![limit as i64], flight_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query recent flights")?;

        Ok(rows)
    }

    pub fn flight_by_id(&self, id: i64) -> Result<Option<FlightRecord>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", queries::SELECT_FLIGHT),
                params![id],
                flight_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to query flight {id}"))
    }

    pub fn create_flight(&self, flight: &NewFlight) -> Result<FlightRecord> {
        self.conn
            .execute(
                "INSERT INTO flights (
                    date, route, aircraft_id, tail_number, duration,
                    total_time, pic_time, sic_time, solo_time, dual_time,
                    day_time, night_time, actual_instrument, simulated_instrument, cross_country,
                    day_landings, night_landings, approaches, holds, remarks, instructor, flight_type
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
                params![
                    flight.date,
                    flight.route,
                    flight.aircraft_id,
                    flight.tail_number,
                    flight.duration.trim(),
                    flight.flight_time.total,
                    flight.flight_time.pic,
                    flight.flight_time.sic,
                    flight.flight_time.solo,
                    flight.flight_time.dual,
                    flight.conditions.day,
                    flight.conditions.night,
                    flight.conditions.actual_instrument,
                    flight.conditions.simulated_instrument,
                    flight.conditions.cross_country,
                    flight.landings.day,
                    flight.landings.night,
                    flight.approaches,
                    flight.holds,
                    flight.remarks,
                    flight.instructor,
                    flight.flight_type.as_str(),
                ],
            )
            .context("Failed to insert flight")?;

        let id = self.conn.last_insert_rowid();
        debug!(id, "flight row inserted");

        self.flight_by_id(id)?
            .with_context(|| format!("Inserted flight {id} could not be read back"))
    }

    pub fn delete_flight(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM flights WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete flight {id}"))?;

        Ok(deleted > 0)
    }

    pub fn all_duty_logs(&self) -> Result<Vec<DutyLogRecord>> {
        let mut statement = self.conn.prepare(&format!(
            "{} ORDER BY start_time DESC, id DESC",
            queries::SELECT_DUTY_LOG
        ))?;

        let rows = statement
            .query_map([], duty_log_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query duty logs")?;

        Ok(rows)
    }

    pub fn duty_logs_with_status(
        &self,
        status: DutyStatus,
        limit: usize,
    ) -> Result<Vec<DutyLogRecord>> {
        let mut statement = self.conn.prepare(&format!(
            "{} WHERE status = ?1 ORDER BY start_time DESC, id DESC LIMIT ?2",
            queries::SELECT_DUTY_LOG
        ))?;

        let rows = statement
            .query_map(params![status.as_str(), limit as i64], duty_log_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to query {} duty logs", status.as_str()))?;

        Ok(rows)
    }

    pub fn count_duty_logs_with_status(&self, status: DutyStatus) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM duty_logs WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )
            .with_context(|| format!("Failed to count {} duty logs", status.as_str()))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub fn duty_log_by_id(&self, id: i64) -> Result<Option<DutyLogRecord>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", queries::SELECT_DUTY_LOG),
                params![id],
                duty_log_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to query duty log {id}"))
    }

    pub fn create_duty_log(&self, duty: &NewDutyLog) -> Result<DutyLogRecord> {
        let (status, duration) = duty.derived_status()?;
        let details = &duty.details;

        self.conn
            .execute(
                "INSERT INTO duty_logs (
                    duty_type, description, start_time, end_time, duration, status,
                    location, crew, aircraft, flight_number, instructor, training_type, notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    duty.duty_type.as_str(),
                    duty.description,
                    duty.start_time.timestamp(),
                    duty.end_time.map(|end| end.timestamp()),
                    duration,
                    status.as_str(),
                    details.location,
                    details.crew,
                    details.aircraft,
                    details.flight_number,
                    details.instructor,
                    details.training_type,
                    details.notes,
                ],
            )
            .context("Failed to insert duty log")?;

        let id = self.conn.last_insert_rowid();
        debug!(id, status = status.as_str(), "duty log row inserted");

        self.duty_log_by_id(id)?
            .with_context(|| format!("Inserted duty log {id} could not be read back"))
    }

    pub fn delete_duty_log(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM duty_logs WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete duty log {id}"))?;

        Ok(deleted > 0)
    }

    pub fn all_aircraft(&self) -> Result<Vec<AircraftRecord>> {
        let mut statement = self
            .conn
            .prepare(&format!("{} ORDER BY id DESC", queries::SELECT_AIRCRAFT))?;

        let rows = statement
            .query_map([], aircraft_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query aircraft")?;

        Ok(rows)
    }

    pub fn aircraft_by_id(&self, id: i64) -> Result<Option<AircraftRecord>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", queries::SELECT_AIRCRAFT),
                params![id],
                aircraft_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to query aircraft {id}"))
    }

    pub fn create_aircraft(&self, aircraft: &NewAircraft) -> Result<AircraftRecord> {
        self.conn
            .execute(
                "INSERT INTO aircraft (
                    tail_number, make, model, year, status, ownership, total_time,
                    engine_model, engine_serial, engine_hours,
                    propeller_model, propeller_serial, propeller_hours,
                    annual_due, last_maintenance,
                    insurance_company, insurance_policy, insurance_expiry,
                    registration_category, registration_class, registration_expiry
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
                params![
                    aircraft.tail_number.trim().to_uppercase(),
                    aircraft.make,
                    aircraft.model,
                    aircraft.year,
                    aircraft.status.as_str(),
                    aircraft.ownership.as_str(),
                    aircraft.total_time,
                    aircraft.engine.model,
                    aircraft.engine.serial_number,
                    aircraft.engine.hours,
                    aircraft.propeller.model,
                    aircraft.propeller.serial_number,
                    aircraft.propeller.hours,
                    aircraft.annual_due,
                    aircraft.last_maintenance,
                    aircraft.insurance.company,
                    aircraft.insurance.policy_number,
                    aircraft.insurance.expiry,
                    aircraft.registration.category,
                    aircraft.registration.class,
                    aircraft.registration.expiry,
                ],
            )
            .context("Failed to insert aircraft")?;

        let id = self.conn.last_insert_rowid();
        debug!(id, "aircraft row inserted");

        self.aircraft_by_id(id)?
            .with_context(|| format!("Inserted aircraft {id} could not be read back"))
    }

    pub fn delete_aircraft(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM aircraft WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete aircraft {id}"))?;

        Ok(deleted > 0)
    }

    pub fn latest_flight_date(&self) -> Result<Option<NaiveDate>> {
        self.conn
            .query_row(
                "SELECT date FROM flights ORDER BY date DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query latest flight date")
    }

    pub fn latest_report_meta(&self) -> Result<Option<ReportMetaRecord>> {
        self.conn
            .query_row(
                &format!("{} ORDER BY generated_at DESC, id DESC LIMIT 1", queries::SELECT_REPORT),
                [],
                report_meta_from_row,
            )
            .optional()
            .context("Failed to query latest report metadata")
    }

    pub fn list_reports(&self, limit: usize) -> Result<Vec<ReportMetaRecord>> {
        let mut statement = self.conn.prepare(&format!(
            "{} ORDER BY generated_at DESC, id DESC LIMIT ?1",
            queries::SELECT_REPORT
        ))?;

        let rows = statement
            .query_map(params![limit as i64], report_meta_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list reports")?;

        Ok(rows)
    }

    pub fn upsert_report_meta(
        &self,
        kind: &str,
        as_of: NaiveDate,
        generated_at: i64,
        md_path: &str,
        json_path: &str,
    ) -> Result<()> {
        let as_of_str = as_of.format("%Y-%m-%d").to_string();
        self.conn
            .execute(
                "INSERT INTO reports (kind, as_of, generated_at, md_path, json_path)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(kind, as_of)
                 DO UPDATE SET generated_at=excluded.generated_at, md_path=excluded.md_path, json_path=excluded.json_path",
                params![kind, as_of_str, generated_at, md_path, json_path],
            )
            .context("Failed to upsert report metadata")?;

        Ok(())
    }
}

fn flight_from_row(row: &Row<'_>) -> rusqlite::Result<FlightRecord> {
    Ok(FlightRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        route: row.get(2)?,
        aircraft_id: row.get(3)?,
        tail_number: row.get(4)?,
        duration: row.get(5)?,
        flight_time: FlightTime {
            total: row.get(6)?,
            pic: row.get(7)?,
            sic: row.get(8)?,
            solo: row.get(9)?,
            dual: row.get(10)?,
        },
        conditions: FlightConditions {
            day: row.get(11)?,
            night: row.get(12)?,
            actual_instrument: row.get(13)?,
            simulated_instrument: row.get(14)?,
            cross_country: row.get(15)?,
        },
        landings: Landings {
            day: row.get(16)?,
            night: row.get(17)?,
        },
        approaches: row.get(18)?,
        holds: row.get(19)?,
        remarks: row.get(20)?,
        instructor: row.get(21)?,
        flight_type: FlightType::from_raw(&row.get::<_, String>(22)?),
    })
}

fn duty_log_from_row(row: &Row<'_>) -> rusqlite::Result<DutyLogRecord> {
    let end_time = row
        .get::<_, Option<i64>>(4)?
        .map(|seconds| timestamp_to_utc(4, seconds))
        .transpose()?;

    Ok(DutyLogRecord {
        id: row.get(0)?,
        duty_type: DutyType::from_raw(&row.get::<_, String>(1)?),
        description: row.get(2)?,
        start_time: timestamp_to_utc(3, row.get(3)?)?,
        end_time,
        duration: row.get(5)?,
        status: DutyStatus::from_raw(&row.get::<_, String>(6)?),
        location: row.get(7)?,
        crew: row.get(8)?,
        aircraft: row.get(9)?,
        flight_number: row.get(10)?,
        instructor: row.get(11)?,
        training_type: row.get(12)?,
        notes: row.get(13)?,
    })
}

fn aircraft_from_row(row: &Row<'_>) -> rusqlite::Result<AircraftRecord> {
    Ok(AircraftRecord {
        id: row.get(0)?,
        tail_number: row.get(1)?,
        make: row.get(2)?,
        model: row.get(3)?,
        year: row.get(4)?,
        status: AircraftStatus::from_raw(&row.get::<_, String>(5)?),
        ownership: Ownership::from_raw(&row.get::<_, String>(6)?),
        total_time: row.get(7)?,
        engine: Component {
            model: row.get(8)?,
            serial_number: row.get(9)?,
            hours: row.get(10)?,
        },
        propeller: Component {
            model: row.get(11)?,
            serial_number: row.get(12)?,
            hours: row.get(13)?,
        },
        annual_due: row.get(14)?,
        last_maintenance: row.get(15)?,
        insurance: Insurance {
            company: row.get(16)?,
            policy_number: row.get(17)?,
            expiry: row.get(18)?,
        },
        registration: Registration {
            category: row.get(19)?,
            class: row.get(20)?,
            expiry: row.get(21)?,
        },
    })
}

fn report_meta_from_row(row: &Row<'_>) -> rusqlite::Result<ReportMetaRecord> {
    Ok(ReportMetaRecord {
        id: row.get(0)?,
        kind: row.get(1)?,
        as_of: row.get(2)?,
        generated_at: row.get(3)?,
        md_path: row.get(4)?,
        json_path: row.get(5)?,
    })
}

fn timestamp_to_utc(column: usize, seconds: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, seconds))
}
