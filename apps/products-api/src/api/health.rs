//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};
use database::mongodb::check_health_detailed;
use serde_json::Value;

use crate::state::AppState;

type ReadyResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

/// `200 {"status": "ready", "mongodb": "connected"}` when MongoDB answers a
/// ping, `503` otherwise
async fn ready(State(state): State<AppState>) -> ReadyResult {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        let status = check_health_detailed(&state.db).await;
        tracing::debug!(response_time_ms = status.response_time_ms, "MongoDB ping");
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_default())
        }
    });
    let checks = vec![("mongodb", mongodb)];

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
