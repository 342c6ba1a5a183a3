mod analyzer;
mod api;
mod cli;
mod config;
mod db;

use crate::analyzer::catalog::{ReportKind, report_catalog};
use crate::analyzer::display::{
    aircraft_status_style, duty_type_style, flight_type_style, report_category_style,
};
use crate::analyzer::duration::{
    calculate_duration, duty_clock_duration, format_decimal_hours, format_flight_duration,
};
use crate::analyzer::rollup::{
    Period, calculate_total_flight_time, flight_statistics, monthly_duty_hours,
};
use crate::cli::{
    AircraftArgs, AircraftCommands, Cli, Commands, ConfigCommands, DutyArgs, DutyCommands,
    FlightArgs, FlightCommands,
};
use crate::config::{Config, parse_date, parse_timestamp};
use crate::db::Database;
use crate::db::records::{
    AircraftRecord, AircraftStatus, DutyDetails, DutyLogRecord, DutyStatus, DutyType,
    FlightConditions, FlightRecord, FlightTime, FlightType, Landings, NewAircraft, NewDutyLog,
    NewFlight, Ownership,
};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => handle_init(),
        Commands::Config { command } => handle_config_command(command),
        Commands::Status => handle_status(),
        Commands::Flight { command } => handle_flight_command(command),
        Commands::Duty { command } => handle_duty_command(command),
        Commands::Aircraft { command } => handle_aircraft_command(command),
        Commands::Stats { period, as_of } => handle_stats(period, as_of),
        Commands::Report { kind, as_of } => handle_report(&kind, as_of),
        Commands::Reports { limit } => handle_reports(limit),
        Commands::ReportTypes => {
            handle_report_types();
            Ok(())
        }
        Commands::Serve => {
            let config = load_config()?;
            run_service(config).await
        }
    }
}

fn handle_init() -> Result<()> {
    let config_path = Config::config_path();
    let config = load_or_default_config()?;

    config.ensure_bootstrap_files()?;
    config.save()?;
    let _ = Database::open(&config.db_path)?;

    println!("pilotlog initialized");
    println!("- config: {}", config_path.display());
    println!("- database: {}", config.db_path.display());
    println!("- reports: {}", config.report_dir.display());
    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = load_or_default_config()?;
            config.set_value(&key, &value)?;
            config.ensure_bootstrap_files()?;
            config.save()?;
            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;
            println!("{value}");
            Ok(())
        }
    }
}

fn handle_status() -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;
    let flights = database.all_flights()?;
    let duties = database.all_duty_logs()?;
    let active = duties
        .iter()
        .filter(|duty| duty.status == DutyStatus::Active)
        .count();

    println!("pilotlog status");
    println!("- pilot: {}", config.pilot_name.as_deref().unwrap_or("not_set"));
    println!("- flights: {}", flights.len());
    println!("- total_flight_time: {}", calculate_total_flight_time(&flights));
    println!(
        "- last_flight: {}",
        database
            .latest_flight_date()?
            .map(|date| date.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("- duty_logs: {} ({active} active)", duties.len());
    println!(
        "- duty_this_month: {}",
        format_decimal_hours(monthly_duty_hours(&duties, Utc::now()))
    );
    println!("- aircraft: {}", database.all_aircraft()?.len());
    println!(
        "- latest_report: {}",
        database
            .latest_report_meta()?
            .map(|meta| format!("{} {}", meta.kind, meta.as_of))
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}

fn handle_flight_command(command: FlightCommands) -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;

    match command {
        FlightCommands::Add(args) => {
            let flight = database.create_flight(&new_flight_from_args(args)?)?;
            info!(id = flight.id, date = %flight.date, "flight logged");
            print_flight(&flight);
        }
        FlightCommands::List { limit } => {
            let flights = match limit {
                Some(limit) => database.recent_flights(limit)?,
                None => database.all_flights()?,
            };
            if flights.is_empty() {
                println!("No flights logged.");
            }
            for flight in &flights {
                println!(
                    "#{:<4} {} {:<16} {:<8} {:>8}  {}",
                    flight.id,
                    flight.date,
                    flight.route,
                    flight.tail_number,
                    format_flight_duration(&flight.duration),
                    flight_type_style(flight.flight_type).label
                );
            }
        }
        FlightCommands::Show { id } => {
            let flight = database
                .flight_by_id(id)?
                .with_context(|| format!("No flight found with id {id}"))?;
            print_flight(&flight);
        }
        FlightCommands::Delete { id } => {
            if !database.delete_flight(id)? {
                bail!("No flight found with id {id}");
            }
            println!("Deleted flight #{id}");
        }
    }

    Ok(())
}

fn handle_duty_command(command: DutyCommands) -> Result<()> {
    if let DutyCommands::Span { start, end } = &command {
        println!("{}", duty_clock_duration(start, end));
        return Ok(());
    }

    let config = load_config()?;
    let database = Database::open(&config.db_path)?;

    match command {
        DutyCommands::Add(args) => {
            let duty = database.create_duty_log(&new_duty_from_args(args)?)?;
            info!(id = duty.id, status = duty.status.as_str(), "duty log recorded");
            print_duty(&duty, Utc::now());
        }
        DutyCommands::List { status, limit } => {
            let duties = match status.as_deref() {
                Some(raw) => match DutyStatus::from_raw(raw) {
                    DutyStatus::Unknown => {
                        bail!("Unknown duty status: {raw}. Use active|completed")
                    }
                    status => database.duty_logs_with_status(status, limit)?,
                },
                None => database.all_duty_logs()?.into_iter().take(limit).collect(),
            };
            if duties.is_empty() {
                println!("No duty logs recorded.");
            }
            let now = Utc::now();
            for duty in &duties {
                println!(
                    "#{:<4} {} {:<18} {:<9} {:>8}  {}",
                    duty.id,
                    duty.start_time.format("%Y-%m-%d %H:%M"),
                    duty_type_style(duty.duty_type).label,
                    duty.status.as_str(),
                    duty_elapsed(duty, now),
                    duty.description
                );
            }
        }
        DutyCommands::Show { id } => {
            let duty = database
                .duty_log_by_id(id)?
                .with_context(|| format!("No duty log found with id {id}"))?;
            print_duty(&duty, Utc::now());
        }
        DutyCommands::Delete { id } => {
            if !database.delete_duty_log(id)? {
                bail!("No duty log found with id {id}");
            }
            println!("Deleted duty log #{id}");
        }
        DutyCommands::Span { .. } => {}
    }

    Ok(())
}

fn handle_aircraft_command(command: AircraftCommands) -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;

    match command {
        AircraftCommands::Add(args) => {
            let aircraft = database.create_aircraft(&new_aircraft_from_args(args)?)?;
            info!(id = aircraft.id, tail = %aircraft.tail_number, "aircraft added");
            print_aircraft(&aircraft);
        }
        AircraftCommands::List => {
            let fleet = database.all_aircraft()?;
            if fleet.is_empty() {
                println!("No aircraft registered.");
            }
            for aircraft in &fleet {
                let style = aircraft_status_style(aircraft.status);
                println!(
                    "#{:<4} {:<8} {} {} ({})  {} [{}]",
                    aircraft.id,
                    aircraft.tail_number,
                    aircraft.make,
                    aircraft.model,
                    aircraft.year,
                    style.label,
                    style.color
                );
            }
        }
        AircraftCommands::Show { id } => {
            let aircraft = database
                .aircraft_by_id(id)?
                .with_context(|| format!("No aircraft found with id {id}"))?;
            print_aircraft(&aircraft);
        }
        AircraftCommands::Delete { id } => {
            if !database.delete_aircraft(id)? {
                bail!("No aircraft found with id {id}");
            }
            println!("Deleted aircraft #{id}");
        }
    }

    Ok(())
}

fn handle_stats(period: Option<String>, as_of: Option<String>) -> Result<()> {
    let config = load_config()?;
    let period = match period {
        Some(raw) => Period::parse(&raw)?,
        None => config.period()?,
    };
    let now = parse_optional_timestamp(as_of)?;

    let database = Database::open(&config.db_path)?;
    let flights = database.all_flights()?;
    let duties = database.all_duty_logs()?;
    let stats = flight_statistics(&flights, period, now);

    println!("Flight statistics as of {}", now.format("%Y-%m-%d %H:%M UTC"));
    println!("- total: {} h", format_decimal_hours(stats.total_hours));
    println!("- pic: {} h", format_decimal_hours(stats.pic_hours));
    println!(
        "- last {}: {} h over {} flight(s)",
        period.as_str(),
        format_decimal_hours(stats.period_hours),
        stats.period_flights
    );
    println!(
        "- duty this month: {} h",
        format_decimal_hours(monthly_duty_hours(&duties, now))
    );

    Ok(())
}

fn handle_report(kind: &str, as_of: Option<String>) -> Result<()> {
    let config = load_config()?;
    let kind = ReportKind::parse(kind)?;
    let now = Utc::now();
    let as_of = match as_of {
        Some(raw) => parse_date(&raw)?,
        None => now.date_naive(),
    };

    let (report, saved) = analyzer::generate_and_store_report(&config, kind, as_of, now)?;

    println!("{} ({})", report.title, report.as_of);
    for note in &report.notes {
        println!("- {note}");
    }
    println!("Markdown: {}", saved.markdown_path.display());
    println!("JSON: {}", saved.json_path.display());
    Ok(())
}

fn handle_reports(limit: usize) -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;
    let reports = database.list_reports(limit)?;

    if reports.is_empty() {
        println!("No reports generated yet.");
    }
    for meta in &reports {
        let generated = DateTime::<Utc>::from_timestamp(meta.generated_at, 0)
            .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| meta.generated_at.to_string());
        println!(
            "{:<16} {}  generated {}  {}",
            meta.kind, meta.as_of, generated, meta.md_path
        );
    }

    Ok(())
}

fn handle_report_types() {
    for entry in report_catalog() {
        let style = report_category_style(entry.category);
        println!(
            "{:<16} {} [{}] ~{}",
            entry.kind.as_str(),
            entry.title,
            style.label,
            entry.estimated_time
        );
        println!("    {}", entry.description);
        println!("    category: {} ({})", entry.category.as_str(), style.color);
        println!("    requires: {}", entry.required_data.join(", "));
    }
}

async fn run_service(config: Config) -> Result<()> {
    config.ensure_bootstrap_files()?;
    let _ = Database::open(&config.db_path)?;

    info!(db = %config.db_path.display(), "pilotlog service started");

    api::run_server(Arc::new(config), async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(error = %error, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    })
    .await
}

fn new_flight_from_args(args: FlightArgs) -> Result<NewFlight> {
    let flight_type = match FlightType::from_raw(&args.flight_type) {
        FlightType::Unknown => bail!(
            "Unknown flight type: {}. Use training|solo|cross-country|local|commercial",
            args.flight_type
        ),
        flight_type => flight_type,
    };
    let total = args
        .duration
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid duration: {}. Example: 1.3", args.duration))?;

    Ok(NewFlight {
        date: parse_date(&args.date)?,
        route: args.route,
        aircraft_id: args.aircraft,
        tail_number: args.tail,
        duration: args.duration,
        flight_time: FlightTime {
            total,
            pic: args.pic,
            sic: args.sic,
            solo: args.solo,
            dual: args.dual,
        },
        conditions: FlightConditions {
            day: (total - args.night).max(0.0),
            night: args.night,
            actual_instrument: args.actual_instrument,
            simulated_instrument: args.simulated_instrument,
            cross_country: args.cross_country,
        },
        landings: Landings {
            day: args.day_landings,
            night: args.night_landings,
        },
        approaches: args.approaches,
        holds: args.holds,
        remarks: args.remarks,
        instructor: args.instructor,
        flight_type,
    })
}

fn new_duty_from_args(args: DutyArgs) -> Result<NewDutyLog> {
    let duty_type = match DutyType::from_raw(&args.duty_type) {
        DutyType::Unknown => bail!(
            "Unknown duty type: {}. Use flight-duty|training|standby|maintenance",
            args.duty_type
        ),
        duty_type => duty_type,
    };

    let duty = NewDutyLog {
        duty_type,
        description: args.description,
        start_time: parse_timestamp(&args.start)?,
        end_time: args.end.as_deref().map(parse_timestamp).transpose()?,
        details: DutyDetails {
            location: args.location,
            crew: args.crew,
            aircraft: args.aircraft,
            flight_number: args.flight_number,
            instructor: args.instructor,
            training_type: args.training_type,
            notes: args.notes,
        },
    };
    duty.derived_status()?;

    Ok(duty)
}

fn new_aircraft_from_args(args: AircraftArgs) -> Result<NewAircraft> {
    let status = match AircraftStatus::from_raw(&args.status) {
        AircraftStatus::Unknown => bail!(
            "Unknown aircraft status: {}. Use airworthy|maintenance-soon|maintenance-due",
            args.status
        ),
        status => status,
    };
    let ownership = match Ownership::from_raw(&args.ownership) {
        Ownership::Unknown => bail!(
            "Unknown ownership: {}. Use owned|rented",
            args.ownership
        ),
        ownership => ownership,
    };

    Ok(NewAircraft {
        tail_number: args.tail,
        make: args.make,
        model: args.model,
        year: args.year,
        status,
        ownership,
        total_time: args.total_time,
        engine: Default::default(),
        propeller: Default::default(),
        annual_due: args.annual_due.as_deref().map(parse_date).transpose()?,
        last_maintenance: args.last_maintenance.as_deref().map(parse_date).transpose()?,
        insurance: Default::default(),
        registration: Default::default(),
    })
}

fn duty_elapsed(duty: &DutyLogRecord, now: DateTime<Utc>) -> String {
    match duty.end_time {
        Some(end) => calculate_duration(Some(duty.start_time), Some(end)),
        None => calculate_duration(Some(duty.start_time), Some(now)),
    }
}

fn print_flight(flight: &FlightRecord) {
    println!("Flight #{} on {}", flight.id, flight.date);
    println!("- route: {}", flight.route);
    println!("- aircraft: {} ({})", flight.aircraft_id, flight.tail_number);
    println!("- duration: {}", format_flight_duration(&flight.duration));
    println!("- type: {}", flight_type_style(flight.flight_type).label);
    println!(
        "- pic/sic/dual/solo: {}/{}/{}/{}",
        flight.flight_time.pic,
        flight.flight_time.sic,
        flight.flight_time.dual,
        flight.flight_time.solo
    );
    println!(
        "- landings: {} day, {} night; approaches {}, holds {}",
        flight.landings.day, flight.landings.night, flight.approaches, flight.holds
    );
    if let Some(instructor) = &flight.instructor {
        println!("- instructor: {instructor}");
    }
    if !flight.remarks.is_empty() {
        println!("- remarks: {}", flight.remarks);
    }
}

fn print_duty(duty: &DutyLogRecord, now: DateTime<Utc>) {
    println!("Duty #{} {}", duty.id, duty.description);
    println!("- type: {}", duty_type_style(duty.duty_type).label);
    println!("- status: {}", duty.status.as_str());
    println!("- start: {}", duty.start_time.to_rfc3339());
    println!(
        "- end: {}",
        duty.end_time
            .map(|end| end.to_rfc3339())
            .unwrap_or_else(|| "in progress".to_string())
    );
    println!("- elapsed: {}", duty_elapsed(duty, now));
    if let Some(hours) = &duty.duration {
        println!("- logged hours: {hours}");
    }
    for (label, value) in [
        ("location", &duty.location),
        ("crew", &duty.crew),
        ("aircraft", &duty.aircraft),
        ("flight", &duty.flight_number),
        ("instructor", &duty.instructor),
        ("training", &duty.training_type),
        ("notes", &duty.notes),
    ] {
        if let Some(value) = value {
            println!("- {label}: {value}");
        }
    }
}

fn print_aircraft(aircraft: &AircraftRecord) {
    let style = aircraft_status_style(aircraft.status);
    println!(
        "Aircraft #{} {} {} {} ({})",
        aircraft.id, aircraft.tail_number, aircraft.make, aircraft.model, aircraft.year
    );
    println!("- status: {} [{}]", style.label, style.color);
    println!("- ownership: {}", aircraft.ownership.as_str());
    println!("- total time: {} h", format_decimal_hours(aircraft.total_time));
    println!(
        "- annual due: {}",
        aircraft
            .annual_due
            .map(|date| date.to_string())
            .unwrap_or_else(|| "not set".to_string())
    );
    println!(
        "- last maintenance: {}",
        aircraft
            .last_maintenance
            .map(|date| date.to_string())
            .unwrap_or_else(|| "not set".to_string())
    );
}

fn parse_optional_timestamp(raw: Option<String>) -> Result<DateTime<Utc>> {
    match raw {
        Some(value) => parse_timestamp(&value),
        None => Ok(Utc::now()),
    }
}

fn load_config() -> Result<Config> {
    let path = Config::config_path();
    if !path.exists() {
        bail!("Config not found. Run `pilotlog init` first.");
    }

    Config::load()
}

fn load_or_default_config() -> Result<Config> {
    let path = Config::config_path();
    if path.exists() {
        Config::load()
    } else {
        Ok(Config::default())
    }
}
