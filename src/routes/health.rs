use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::services::usage_validator::MatchPolicy;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
        .route("/ready", get(ready))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    start_time: String,
    uptime: u64,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadinessResponse {
    status: &'static str,
    timestamp: String,
    checks: ReadinessChecks,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadinessChecks {
    dataset_source: String,
    dataset_entries: Option<usize>,
    validator_policy: MatchPolicy,
    active_sessions: usize,
}

async fn root() -> Response {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_iso(),
    })
    .into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    Json(LivenessResponse {
        status: "healthy",
        timestamp: now_iso(),
        start_time: DateTime::<Utc>::from(state.started_at_system())
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION"),
    })
    .into_response()
}

/// Ready once the dataset has been loaded. A literal-only validator is
/// reported as degraded, not unhealthy.
async fn ready(State(state): State<AppState>) -> Response {
    let catalog = state.catalog();
    let dataset_entries = catalog.loaded_len().await;
    let validator_policy = state.validator().policy();

    let status = match (dataset_entries, validator_policy) {
        (None, _) => "unhealthy",
        (Some(_), MatchPolicy::Literal) => "degraded",
        (Some(_), MatchPolicy::Lemmatized) => "healthy",
    };
    let status_code = if dataset_entries.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        status,
        timestamp: now_iso(),
        checks: ReadinessChecks {
            dataset_source: catalog.source().describe(),
            dataset_entries,
            validator_policy,
            active_sessions: state.sessions().len(),
        },
    };
    (status_code, Json(response)).into_response()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
