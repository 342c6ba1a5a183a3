use crate::analyzer;
use crate::analyzer::catalog::{ReportKind, report_catalog};
use crate::analyzer::display::{
    DisplayStyle, aircraft_status_style_raw, duty_type_style_raw, flight_type_style_raw,
    report_category_style_raw,
};
use crate::analyzer::duration::format_decimal_hours;
use crate::analyzer::rollup::{FlightStatistics, Period, flight_statistics, monthly_duty_hours};
use crate::config::{Config, parse_date, parse_timestamp};
use crate::db::Database;
use crate::db::records::{
    AircraftRecord, DutyLogRecord, DutyStatus, FlightRecord, NewAircraft, NewDutyLog, NewFlight,
    ReportMetaRecord,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route("/api/v1/flights", get(flights_all).post(flight_create))
        .route(
            "/api/v1/flights/:id",
            get(flight_by_id).delete(flight_delete),
        )
        .route("/api/v1/duty-logs", get(duty_logs_all).post(duty_log_create))
        .route(
            "/api/v1/duty-logs/:id",
            get(duty_log_by_id).delete(duty_log_delete),
        )
        .route("/api/v1/aircraft", get(aircraft_all).post(aircraft_create))
        .route(
            "/api/v1/aircraft/:id",
            get(aircraft_by_id).delete(aircraft_delete),
        )
        .route("/api/v1/stats", get(stats))
        .route("/api/v1/duty/monthly", get(duty_monthly))
        .route("/api/v1/report-types", get(report_types))
        .route("/api/v1/display/:domain/:value", get(display_style))
        .route("/api/v1/reports", get(report_list))
        .route("/api/v1/reports/:kind", post(report_generate))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    period: Option<String>,
    as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AsOfQuery {
    as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct StatusPayload {
    flights: usize,
    total_flight_time: String,
    active_duty_logs: usize,
    aircraft: usize,
    latest_report: Option<ReportMetaRecord>,
    api_port: u16,
}

#[derive(Debug, Serialize)]
struct StatsPayload {
    period: Period,
    as_of: String,
    #[serde(flatten)]
    statistics: FlightStatistics,
}

#[derive(Debug, Serialize)]
struct DutyMonthlyPayload {
    month: String,
    hours: f64,
    display: String,
}

async fn status(State(state): State<ApiState>) -> ApiResult<Json<StatusPayload>> {
    let database = Database::open(&state.config.db_path)?;
    let flights = database.all_flights()?;

    Ok(Json(StatusPayload {
        flights: flights.len(),
        total_flight_time: analyzer::rollup::calculate_total_flight_time(&flights),
        active_duty_logs: database.count_duty_logs_with_status(DutyStatus::Active)?,
        aircraft: database.all_aircraft()?.len(),
        latest_report: database.latest_report_meta()?,
        api_port: state.config.api_port,
    }))
}

async fn flights_all(State(state): State<ApiState>) -> ApiResult<Json<Vec<FlightRecord>>> {
    let database = Database::open(&state.config.db_path)?;
    Ok(Json(database.all_flights()?))
}

async fn flight_by_id(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<FlightRecord>> {
    let database = Database::open(&state.config.db_path)?;
    database
        .flight_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No flight found with id {id}")))
}

async fn flight_create(
    State(state): State<ApiState>,
    Json(payload): Json<NewFlight>,
) -> ApiResult<(StatusCode, Json<FlightRecord>)> {
    let database = Database::open(&state.config.db_path)?;
    let created = database.create_flight(&payload)?;
    info!(id = created.id, date = %created.date, "flight logged via API");

    Ok((StatusCode::CREATED, Json(created)))
}

async fn flight_delete(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let database = Database::open(&state.config.db_path)?;
    deleted_or_not_found(database.delete_flight(id)?, "flight", id)
}

async fn duty_logs_all(State(state): State<ApiState>) -> ApiResult<Json<Vec<DutyLogRecord>>> {
    let database = Database::open(&state.config.db_path)?;
    Ok(Json(database.all_duty_logs()?))
}

async fn duty_log_by_id(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DutyLogRecord>> {
    let database = Database::open(&state.config.db_path)?;
    database
        .duty_log_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No duty log found with id {id}")))
}

async fn duty_log_create(
    State(state): State<ApiState>,
    Json(payload): Json<NewDutyLog>,
) -> ApiResult<(StatusCode, Json<DutyLogRecord>)> {
    payload
        .derived_status()
        .map_err(|error| ApiError::BadRequest(error.to_string()))?;

    let database = Database::open(&state.config.db_path)?;
    let created = database.create_duty_log(&payload)?;
    info!(id = created.id, status = created.status.as_str(), "duty log recorded via API");

    Ok((StatusCode::CREATED, Json(created)))
}

async fn duty_log_delete(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let database = Database::open(&state.config.db_path)?;
    deleted_or_not_found(database.delete_duty_log(id)?, "duty log", id)
}

async fn aircraft_all(State(state): State<ApiState>) -> ApiResult<Json<Vec<AircraftRecord>>> {
    let database = Database::open(&state.config.db_path)?;
    Ok(Json(database.all_aircraft()?))
}

async fn aircraft_by_id(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AircraftRecord>> {
    let database = Database::open(&state.config.db_path)?;
    database
        .aircraft_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No aircraft found with id {id}")))
}

async fn aircraft_create(
    State(state): State<ApiState>,
    Json(payload): Json<NewAircraft>,
) -> ApiResult<(StatusCode, Json<AircraftRecord>)> {
    let database = Database::open(&state.config.db_path)?;
    let created = database.create_aircraft(&payload)?;
    info!(id = created.id, tail = %created.tail_number, "aircraft added via API");

    Ok((StatusCode::CREATED, Json(created)))
}

async fn aircraft_delete(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let database = Database::open(&state.config.db_path)?;
    deleted_or_not_found(database.delete_aircraft(id)?, "aircraft", id)
}

async fn stats(
    State(state): State<ApiState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<StatsPayload>> {
    let period = query
        .period
        .as_deref()
        .map(Period::parse)
        .unwrap_or_else(|| state.config.period())
        .map_err(|error| ApiError::BadRequest(error.to_string()))?;
    let now = as_of_or_now(query.as_of.as_deref())?;

    let database = Database::open(&state.config.db_path)?;
    let flights = database.all_flights()?;

    Ok(Json(StatsPayload {
        period,
        as_of: now.to_rfc3339(),
        statistics: flight_statistics(&flights, period, now),
    }))
}

async fn duty_monthly(
    State(state): State<ApiState>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<Json<DutyMonthlyPayload>> {
    let as_of = as_of_or_now(query.as_of.as_deref())?;
    let database = Database::open(&state.config.db_path)?;
    let hours = monthly_duty_hours(&database.all_duty_logs()?, as_of);

    Ok(Json(DutyMonthlyPayload {
        month: as_of.format("%Y-%m").to_string(),
        hours,
        display: format_decimal_hours(hours),
    }))
}

async fn report_types() -> Json<Value> {
    Json(json!({ "report_types": report_catalog() }))
}

/// Unrecognized values still resolve to the neutral style.
async fn display_style(
    Path((domain, value)): Path<(String, String)>,
) -> ApiResult<Json<DisplayStyle>> {
    let style = match domain.as_str() {
        "aircraft-status" => aircraft_status_style_raw(&value),
        "duty-type" => duty_type_style_raw(&value),
        "flight-type" => flight_type_style_raw(&value),
        "report-category" => report_category_style_raw(&value),
        _ => {
            return Err(ApiError::BadRequest(format!(
                "Unknown display domain: {domain}. Use aircraft-status|duty-type|flight-type|report-category"
            )));
        }
    };

    Ok(Json(style))
}

async fn report_list(
    State(state): State<ApiState>,
    Query(query): Query<ReportsQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let database = Database::open(&state.config.db_path)?;

    Ok(Json(json!({ "reports": database.list_reports(limit)? })))
}

async fn report_generate(
    State(state): State<ApiState>,
    Path(kind): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<Json<Value>> {
    let kind = ReportKind::parse(&kind).map_err(|error| ApiError::BadRequest(error.to_string()))?;
    let now = Utc::now();
    let as_of = query
        .as_of
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
        .unwrap_or_else(|| now.date_naive());

    let (report, saved) = analyzer::generate_and_store_report(&state.config, kind, as_of, now)?;

    Ok(Json(json!({
        "report": report,
        "markdown_path": saved.markdown_path.display().to_string(),
        "json_path": saved.json_path.display().to_string(),
    })))
}

fn as_of_or_now(raw: Option<&str>) -> ApiResult<DateTime<Utc>> {
    raw.map(parse_timestamp)
        .transpose()
        .map(|parsed| parsed.unwrap_or_else(Utc::now))
        .map_err(|error| ApiError::BadRequest(error.to_string()))
}

fn deleted_or_not_found(deleted: bool, entity: &str, id: i64) -> ApiResult<Json<Value>> {
    if !deleted {
        return Err(ApiError::NotFound(format!("No {entity} found with id {id}")));
    }

    info!(entity, id, "record deleted via API");
    Ok(Json(json!({ "deleted": true, "id": id })))
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{error:#}") })),
            )
                .into_response(),
        }
    }
}
