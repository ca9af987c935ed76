//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;

use crate::domain::{
    ErrorDetail, ErrorEnvelope, Outcome, OutcomeBody, ReadingCountLimit, StationId,
};
use crate::gateway::GatewayError;

use super::dto::*;
use super::state::AppState;

/// OpenAPI description of the public endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rainfall API",
        version = "1.0",
        description = "An API which provides rainfall reading data"
    ),
    paths(rainfall_readings),
    components(schemas(
        RainfallReadingResponse,
        RainfallReading,
        ErrorResponse,
        ErrorDetailResult,
    )),
    tags(
        (name = "Rainfall", description = "Operations relating to rainfall")
    )
)]
pub struct ApiDoc;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        .route("/rainfall/id/:station_id/readings", get(rainfall_readings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Serve the OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Latest readings for a station.
#[utoipa::path(
    get,
    path = "/rainfall/id/{stationId}/readings",
    tag = "Rainfall",
    params(
        ("stationId" = String, Path, description = "The id of the reading station"),
        ReadingsQuery,
    ),
    responses(
        (status = 200, description = "A list of rainfall readings", body = RainfallReadingResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No readings found for the specified stationId", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn rainfall_readings(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    query: Result<Query<ReadingsQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest {
        property: "count",
        message: e.body_text(),
    })?;

    let station = StationId::parse(&station_id).map_err(|_| AppError::InvalidRequest {
        property: "stationId",
        message: "StationId must consist of alphanumeric characters only".to_string(),
    })?;

    let limit = ReadingCountLimit::or_default(query.count);
    info!(%station, %limit, "rainfall readings requested");

    let outcome = state.gateway.lookup(&station, limit).await?;

    Ok(outcome_response(&outcome))
}

/// Render an outcome with its own status code.
fn outcome_response(outcome: &Outcome) -> Response {
    let status =
        StatusCode::from_u16(outcome.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match outcome.body() {
        OutcomeBody::Readings(readings) => {
            (status, Json(RainfallReadingResponse::from(readings))).into_response()
        }
        OutcomeBody::Error(envelope) => {
            (status, Json(ErrorResponse::from(envelope))).into_response()
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// A request property failed validation
    InvalidRequest {
        property: &'static str,
        message: String,
    },
    /// The lookup failed in a way that has no outcome
    Internal { message: String },
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            AppError::InvalidRequest { property, message } => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::new("Invalid request")
                    .with_detail(ErrorDetail::new(property, message)),
            ),
            AppError::Internal { message } => {
                error!(%message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorEnvelope::new("Internal server error"),
                )
            }
        };

        (status, Json(ErrorResponse::from(&envelope))).into_response()
    }
}
