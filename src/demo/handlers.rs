use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use panic_guard::{on_blank, on_nil, retry, with_trace};

use super::server::AppState;

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
pub struct EchoParams {
    pub text: Option<String>,
}

/// Echoes `text`; a missing or blank value trips an assertion.
pub async fn echo(Query(params): Query<EchoParams>) -> String {
    let text = on_nil(params.text, "echo requires a text parameter");
    on_blank(&text, "echo text");
    text
}

#[derive(Debug, Serialize)]
pub struct FlakyReport {
    pub attempts: usize,
    pub succeeded: bool,
}

/// Runs a unit of work that panics for the first few attempts under the
/// configured retry budget.
pub async fn flaky(State(state): State<AppState>) -> Json<FlakyReport> {
    let failures = state.config.retry.failures_before_success;
    let mut attempts = 0;

    let result = retry(state.config.retry.max_attempts, || {
        attempts += 1;
        if attempts <= failures {
            panic!("flaky attempt {} of {} failed", attempts, failures);
        }
    });

    Json(FlakyReport {
        attempts,
        succeeded: result.is_ok(),
    })
}

pub async fn panic() -> &'static str {
    with_trace("requested panic")
}
