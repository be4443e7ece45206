//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::IndexerError;
use crate::events::{ApplicationRecord, EventRecord};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Routes served by the indexer. Middleware layers are added by the caller.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/scholarships/:id/events", get(get_scholarship_events))
        .route(
            "/scholarships/:id/applications",
            get(get_scholarship_applications),
        )
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub scholarship_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub scholarship_id: String,
    pub count: usize,
    pub applications: Vec<ApplicationRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Storage failure surfaced to HTTP clients as a 500.
pub struct ApiError(IndexerError);

impl From<IndexerError> for ApiError {
    fn from(err: IndexerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("API request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AllEventsResponse>, ApiError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /scholarships/:id/events`
///
/// Every indexed event for one scholarship, oldest first. Unknown ids give
/// an empty list.
pub async fn get_scholarship_events(
    State(state): State<Arc<ApiState>>,
    Path(scholarship_id): Path<String>,
) -> Result<Json<EventsResponse>, ApiError> {
    let events = db::get_events_for_scholarship(&state.pool, &scholarship_id).await?;
    Ok(Json(EventsResponse {
        scholarship_id,
        count: events.len(),
        events,
    }))
}

/// `GET /scholarships/:id/applications`
pub async fn get_scholarship_applications(
    State(state): State<Arc<ApiState>>,
    Path(scholarship_id): Path<String>,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    let applications = db::get_applications_for_scholarship(&state.pool, &scholarship_id).await?;
    Ok(Json(ApplicationsResponse {
        scholarship_id,
        count: applications.len(),
        applications,
    }))
}
