//! Liveness probe.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body returned by the health probe.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct HealthPayload {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

#[expect(clippy::unused_async, reason = "axum handlers must be async")]
pub(crate) async fn health() -> Json<HealthPayload> {
    Json(HealthPayload {
        status: "ok",
        timestamp: Utc::now(),
    })
}
