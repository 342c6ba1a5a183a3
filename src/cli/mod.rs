use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pilotlog", about = "Pilot Logbook & Duty Compliance Tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default config and create the data directories.
    Init,
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Status,
    Flight {
        #[command(subcommand)]
        command: FlightCommands,
    },
    Duty {
        #[command(subcommand)]
        command: DutyCommands,
    },
    Aircraft {
        #[command(subcommand)]
        command: AircraftCommands,
    },
    /// Lifetime and period totals for the flight log.
    Stats {
        #[arg(long)]
        period: Option<String>,
        /// RFC 3339 timestamp used as "now" (defaults to the current time).
        #[arg(long)]
        as_of: Option<String>,
    },
    Report {
        kind: String,
        #[arg(long)]
        as_of: Option<String>,
    },
    Reports {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    ReportTypes,
    /// Run the JSON API until interrupted.
    Serve,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}

#[derive(Debug, Subcommand)]
pub enum FlightCommands {
    Add(FlightArgs),
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    Show {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct FlightArgs {
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub route: String,
    #[arg(long)]
    pub aircraft: String,
    #[arg(long)]
    pub tail: String,
    /// Decimal hours, e.g. 1.3
    #[arg(long)]
    pub duration: String,
    #[arg(long, default_value = "local")]
    pub flight_type: String,
    #[arg(long, default_value_t = 0.0)]
    pub pic: f64,
    #[arg(long, default_value_t = 0.0)]
    pub sic: f64,
    #[arg(long, default_value_t = 0.0)]
    pub solo: f64,
    #[arg(long, default_value_t = 0.0)]
    pub dual: f64,
    #[arg(long, default_value_t = 0.0)]
    pub night: f64,
    #[arg(long, default_value_t = 0.0)]
    pub actual_instrument: f64,
    #[arg(long, default_value_t = 0.0)]
    pub simulated_instrument: f64,
    #[arg(long, default_value_t = 0.0)]
    pub cross_country: f64,
    #[arg(long, default_value_t = 0)]
    pub day_landings: u32,
    #[arg(long, default_value_t = 0)]
    pub night_landings: u32,
    #[arg(long, default_value_t = 0)]
    pub approaches: u32,
    #[arg(long, default_value_t = 0)]
    pub holds: u32,
    #[arg(long)]
    pub instructor: Option<String>,
    #[arg(long, default_value = "")]
    pub remarks: String,
}

#[derive(Debug, Subcommand)]
pub enum DutyCommands {
    Add(DutyArgs),
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    Show {
        id: i64,
    },
    Delete {
        id: i64,
    },
    /// Decimal hours between two HH:MM wall-clock times.
    Span {
        start: String,
        end: String,
    },
}

#[derive(Debug, Args)]
pub struct DutyArgs {
    #[arg(long = "type")]
    pub duty_type: String,
    #[arg(long)]
    pub description: String,
    /// RFC 3339 timestamp
    #[arg(long)]
    pub start: String,
    /// RFC 3339 timestamp; omit for a duty still in progress.
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub crew: Option<String>,
    #[arg(long)]
    pub aircraft: Option<String>,
    #[arg(long)]
    pub flight_number: Option<String>,
    #[arg(long)]
    pub instructor: Option<String>,
    #[arg(long)]
    pub training_type: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AircraftCommands {
    Add(AircraftArgs),
    List,
    Show { id: i64 },
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct AircraftArgs {
    #[arg(long)]
    pub tail: String,
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long, default_value = "airworthy")]
    pub status: String,
    #[arg(long, default_value = "owned")]
    pub ownership: String,
    #[arg(long, default_value_t = 0.0)]
    pub total_time: f64,
    #[arg(long)]
    pub annual_due: Option<String>,
    #[arg(long)]
    pub last_maintenance: Option<String>,
}
