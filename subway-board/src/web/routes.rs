//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use crate::accessor::FieldAccessor;
use crate::domain::{Direction, Rank, Snapshot};
use crate::sensor::SensorReading;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/snapshot", get(snapshot))
        .route("/api/sensor", get(sensor))
        .route("/api/arrivals/:direction/:rank", get(arrival))
        .with_state(state)
}

/// Health of the refresh loop.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (current, status) = state.store.load().await;
    Json(HealthResponse::new(&current, status, Utc::now()))
}

/// The full current snapshot.
async fn snapshot(State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    let current = state.store.current().await;
    let snapshot = current.snapshot().ok_or(AppError::NotReady)?;
    Ok(Json(Snapshot::clone(snapshot)))
}

/// Sensor value and attributes.
async fn sensor(State(state): State<AppState>) -> Json<SensorReading> {
    Json(state.sensor.read().await)
}

/// A single (direction, rank) lookup.
async fn arrival(
    State(state): State<AppState>,
    Path((direction, rank)): Path<(String, usize)>,
) -> Result<Json<ArrivalResponse>, AppError> {
    let direction = direction
        .parse::<Direction>()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;
    let rank = Rank::new(rank).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let current = state.store.current().await;
    let fields = FieldAccessor::from_current(&current);
    Ok(Json(ArrivalResponse::from_fields(&fields, direction, rank)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotReady,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "no data yet".to_string()),
        };

        tracing::debug!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
