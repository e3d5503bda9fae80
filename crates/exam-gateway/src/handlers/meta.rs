//! Read-only endpoints: the subject list and liveness.

use crate::domain::SUBJECTS;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// `GET /api/subjects`
pub async fn subjects() -> Json<&'static [&'static str]> {
    Json(&SUBJECTS)
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
