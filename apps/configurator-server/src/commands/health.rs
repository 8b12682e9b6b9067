//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub database: bool,
    pub catalog_size: usize,
}

/// `GET /api/health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthView>) {
    let database = state.db.health_check().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthView {
            status: if database { "ok" } else { "degraded" },
            database,
            catalog_size: state.catalog.snapshot().len(),
        }),
    )
}
