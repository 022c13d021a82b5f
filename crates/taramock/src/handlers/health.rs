//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    pub name: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness report.
///
/// The service holds no external dependencies, so being able to answer
/// means it is up.
#[axum::debug_handler]
pub async fn health() -> Json<Health> {
    Json(Health {
        name: "taramock",
        status: "UP",
        version: env!("CARGO_PKG_VERSION"),
    })
}
