//! Health check endpoints for liveness and readiness

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

/// Detailed health response with component status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl HealthCheck {
    fn from_result(name: &str, started: Instant, result: Result<(), String>) -> Self {
        let (status, message) = match result {
            Ok(()) => (HealthStatus::Healthy, None),
            Err(message) => (HealthStatus::Unhealthy, Some(message)),
        };

        Self {
            name: name.to_string(),
            status,
            message,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        }
    }
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: embedding model, answer store and cache state
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let (embedder, answer_store, semantic_cache) = futures::join!(
        check_embedder(&state),
        check_answer_store(&state),
        check_semantic_cache(&state),
    );
    let checks = vec![embedder, answer_store, semantic_cache];

    let overall_status = overall(&checks);
    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - the process is up
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// The embedder is required to serve; the answer store only degrades caching
fn overall(checks: &[HealthCheck]) -> HealthStatus {
    let mut status = HealthStatus::Healthy;

    for check in checks {
        match (check.name.as_str(), check.status) {
            (_, HealthStatus::Healthy) => {}
            ("embedder", _) => return HealthStatus::Unhealthy,
            _ => status = HealthStatus::Degraded,
        }
    }

    status
}

async fn check_embedder(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    if !state.cache().is_enabled() {
        let mut check = HealthCheck::from_result("embedder", start, Ok(()));
        check.message = Some("Semantic cache disabled".to_string());
        return check;
    }

    let result = state
        .cache()
        .embedder()
        .ensure_ready()
        .await
        .map_err(|e| e.to_string());

    HealthCheck::from_result("embedder", start, result)
}

async fn check_answer_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state
        .cache()
        .answer_store()
        .ping()
        .await
        .map_err(|e| e.to_string());

    HealthCheck::from_result("answer_store", start, result)
}

async fn check_semantic_cache(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let cache = state.cache();
    let counts = cache.entry_counts().await;

    let mut check = HealthCheck::from_result(
        "semantic_cache",
        start,
        if counts.is_consistent() {
            Ok(())
        } else {
            Err(format!(
                "{} vectors, {} prompts, {} keys",
                counts.vectors, counts.prompts, counts.keys
            ))
        },
    );

    if check.status == HealthStatus::Healthy && cache.is_dirty().await {
        check.status = HealthStatus::Degraded;
        check.message = Some("Snapshot behind in-memory state".to_string());
    }

    check
}
