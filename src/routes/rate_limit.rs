//! Rate-limit check endpoint for client-side actions.
//!
//! Lets the browser ask "may I do `action` now?" for actions it throttles
//! itself. Actions the server throttles (the contact form) are refused so a
//! pre-check never spends a real submission's attempt. Valid requests always
//! get 200 with a decision; store failures fail open.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use crate::fingerprint::{ClientEnvironment, ScreenSignals};
use crate::rate_limit::{MAX_WINDOW_MINUTES, RateLimitDecision, RateLimitPolicy, SERVER_ACTIONS};
use crate::state::AppState;

pub const MAX_ACTION_LEN: usize = 64;
pub const MAX_ATTEMPTS_OVERRIDE: u32 = 1000;
pub const MAX_WINDOW_MINUTES_OVERRIDE: u32 = MAX_WINDOW_MINUTES;

#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    pub action: String,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub window_minutes: Option<u32>,
    #[serde(flatten)]
    pub signals: ScreenSignals,
}

/// Action tags are short identifiers made of ASCII alphanumerics and `_-:`.
/// Server-throttled actions are not valid here.
pub(crate) fn valid_action(action: &str) -> bool {
    !action.is_empty()
        && !SERVER_ACTIONS.contains(&action)
        && action.len() <= MAX_ACTION_LEN
        && action
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'))
}

/// Merge request overrides into the configured policy.
pub(crate) fn resolve_policy(default: RateLimitPolicy, req: &CheckRequest) -> Option<RateLimitPolicy> {
    let max_attempts = req.max_attempts.unwrap_or(default.max_attempts);
    if !(1..=MAX_ATTEMPTS_OVERRIDE).contains(&max_attempts) {
        return None;
    }
    let window = match req.window_minutes {
        None => default.window,
        Some(minutes) if (1..=MAX_WINDOW_MINUTES_OVERRIDE).contains(&minutes) => {
            time::Duration::minutes(i64::from(minutes))
        }
        Some(_) => return None,
    };
    Some(RateLimitPolicy { max_attempts, window })
}

pub async fn check_rate_limit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CheckRequest>,
) -> Result<Json<RateLimitDecision>, StatusCode> {
    if !valid_action(&req.action) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let policy = resolve_policy(state.rate_limit, &req).ok_or(StatusCode::BAD_REQUEST)?;
    let env = ClientEnvironment::from_parts(super::user_agent(&headers), &req.signals);
    Ok(Json(state.guard.check_rate_limit(&env, &req.action, policy).await))
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
