pub const CREATE_FLIGHTS: &str = r#"
CREATE TABLE IF NOT EXISTS flights (
  id                   INTEGER PRIMARY KEY AUTOINCREMENT,
  date                 TEXT NOT NULL,
  route                TEXT NOT NULL,
  aircraft_id          TEXT NOT NULL,
  tail_number          TEXT NOT NULL,
  duration             TEXT NOT NULL DEFAULT '0',
  total_time           REAL NOT NULL DEFAULT 0,
  pic_time             REAL NOT NULL DEFAULT 0,
  sic_time             REAL NOT NULL DEFAULT 0,
  solo_time            REAL NOT NULL DEFAULT 0,
  dual_time            REAL NOT NULL DEFAULT 0,
  day_time             REAL NOT NULL DEFAULT 0,
  night_time           REAL NOT NULL DEFAULT 0,
  actual_instrument    REAL NOT NULL DEFAULT 0,
  simulated_instrument REAL NOT NULL DEFAULT 0,
  cross_country        REAL NOT NULL DEFAULT 0,
  day_landings         INTEGER NOT NULL DEFAULT 0,
  night_landings       INTEGER NOT NULL DEFAULT 0,
  approaches           INTEGER NOT NULL DEFAULT 0,
  holds                INTEGER NOT NULL DEFAULT 0,
  remarks              TEXT NOT NULL DEFAULT '',
  instructor           TEXT,
  flight_type          TEXT NOT NULL DEFAULT 'local'
);
"#;

pub const CREATE_DUTY_LOGS: &str = r#"
CREATE TABLE IF NOT EXISTS duty_logs (
  id            INTEGER PRIMARY KEY AUTOINCREMENT,
  duty_type     TEXT NOT NULL,
  description   TEXT NOT NULL,
  start_time    INTEGER NOT NULL,
  end_time      INTEGER,
  duration      TEXT,
  status        TEXT NOT NULL DEFAULT 'active',
  location      TEXT,
  crew          TEXT,
  aircraft      TEXT,
  flight_number TEXT,
  instructor    TEXT,
  training_type TEXT,
  notes         TEXT
);
"#;

pub const CREATE_AIRCRAFT: &str = r#"
CREATE TABLE IF NOT EXISTS aircraft (
  id                    INTEGER PRIMARY KEY AUTOINCREMENT,
  tail_number           TEXT NOT NULL,
  make                  TEXT NOT NULL,
  model                 TEXT NOT NULL,
  year                  INTEGER NOT NULL,
  status                TEXT NOT NULL DEFAULT 'airworthy',
  ownership             TEXT NOT NULL DEFAULT 'owned',
  total_time            REAL NOT NULL DEFAULT 0,
  engine_model          TEXT NOT NULL DEFAULT '',
  engine_serial         TEXT NOT NULL DEFAULT '',
  engine_hours          REAL NOT NULL DEFAULT 0,
  propeller_model       TEXT NOT NULL DEFAULT '',
  propeller_serial      TEXT NOT NULL DEFAULT '',
  propeller_hours       REAL NOT NULL DEFAULT 0,
  annual_due            TEXT,
  last_maintenance      TEXT,
  insurance_company     TEXT NOT NULL DEFAULT '',
  insurance_policy      TEXT NOT NULL DEFAULT '',
  insurance_expiry      TEXT,
  registration_category TEXT NOT NULL DEFAULT '',
  registration_class    TEXT NOT NULL DEFAULT '',
  registration_expiry   TEXT
);
"#;

pub const CREATE_REPORTS: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
  id           INTEGER PRIMARY KEY AUTOINCREMENT,
  kind         TEXT NOT NULL,
  as_of        TEXT NOT NULL,
  generated_at INTEGER NOT NULL,
  md_path      TEXT NOT NULL,
  json_path    TEXT NOT NULL,
  UNIQUE(kind, as_of)
);
"#;

pub const INDEX_FLIGHTS_DATE: &str =
    "CREATE INDEX IF NOT EXISTS idx_flights_date ON flights(date);";

pub const INDEX_DUTY_LOGS_START_TIME: &str =
    "CREATE INDEX IF NOT EXISTS idx_duty_logs_start_time ON duty_logs(start_time);";

pub const INDEX_REPORTS_GENERATED_AT: &str =
    "CREATE INDEX IF NOT EXISTS idx_reports_generated_at ON reports(generated_at);";

pub const SELECT_FLIGHT: &str = "SELECT id, date, route, aircraft_id, tail_number, duration,
    total_time, pic_time, sic_time, solo_time, dual_time,
    day_time, night_time, actual_instrument, simulated_instrument, cross_country,
    day_landings, night_landings, approaches, holds, remarks, instructor, flight_type
    FROM flights";

pub const SELECT_DUTY_LOG: &str = "SELECT id, duty_type, description, start_time, end_time,
    duration, status, location, crew, aircraft, flight_number, instructor, training_type, notes
    FROM duty_logs";

pub const SELECT_AIRCRAFT: &str = "SELECT id, tail_number, make, model, year, status, ownership,
    total_time, engine_model, engine_serial, engine_hours,
    propeller_model, propeller_serial, propeller_hours,
    annual_due, last_maintenance,
    insurance_company, insurance_policy, insurance_expiry,
    registration_category, registration_class, registration_expiry
    FROM aircraft";

pub const SELECT_REPORT: &str =
    "SELECT id, kind, as_of, generated_at, md_path, json_path FROM reports";

pub fn schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_FLIGHTS,
        CREATE_DUTY_LOGS,
        CREATE_AIRCRAFT,
        CREATE_REPORTS,
        INDEX_FLIGHTS_DATE,
        INDEX_DUTY_LOGS_START_TIME,
        INDEX_REPORTS_GENERATED_AT,
    ]
}
