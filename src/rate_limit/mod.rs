//! Fixed-window rate limiting against a shared remote table.
//!
//! DESIGN
//! ======
//! One row per (client identifier, action, window). Each check reads the
//! newest row whose `window_start` falls inside the window, then either
//! inserts a fresh row, refuses, or bumps the count. Windows are a read-time
//! filter only; nothing is expired or deleted here.
//!
//! TRADE-OFFS
//! ==========
//! - Fail-open: any store error allows the attempt with the full quota. The
//!   guard deters abuse, it is not a security boundary.
//! - Read-then-write without CAS: two near-simultaneous attempts from one
//!   client can both read count N and both write N+1. Accepted.
//! - The remaining count in the increment branch uses the pre-increment
//!   value, so a client gets `max_attempts` allowed attempts per window.
//! - Windows are capped at `MAX_WINDOW_MINUTES`. Window arithmetic saturates
//!   at the calendar bounds instead of panicking.

pub mod memory;
pub mod rest;
pub mod store;

use std::sync::Arc;

use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::backend::BackendError;
use crate::fingerprint::{ClientEnvironment, ClientIdentifier};
pub use memory::MemoryRateLimitStore;
pub use rest::RestRateLimitStore;
pub use store::{NewRateLimitRecord, RateLimitRecord, RateLimitStore};

/// Action tag for contact form submissions.
pub const CONTACT_FORM_ACTION: &str = "contact_form_submit";

/// Actions the server throttles itself. Clients may not check or spend them.
pub const SERVER_ACTIONS: &[&str] = &[CONTACT_FORM_ACTION];

/// Longest window any policy may use (one day).
pub const MAX_WINDOW_MINUTES: u32 = 24 * 60;

// =============================================================================
// POLICY / DECISION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_WINDOW_MINUTES: u32 = 15;

    #[must_use]
    pub fn new(max_attempts: u32, window_minutes: u32) -> Self {
        Self { max_attempts, window: Duration::minutes(i64::from(window_minutes)) }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_WINDOW_MINUTES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining_attempts: u32,
    /// Set only when refused: when the current window ends.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub reset_time: Option<OffsetDateTime>,
}

impl RateLimitDecision {
    fn allowed(remaining_attempts: u32) -> Self {
        Self { allowed: true, remaining_attempts, reset_time: None }
    }

    fn blocked(reset_time: OffsetDateTime) -> Self {
        Self { allowed: false, remaining_attempts: 0, reset_time: Some(reset_time) }
    }

    /// Result used whenever the store cannot be reached.
    #[must_use]
    pub fn fail_open(policy: RateLimitPolicy) -> Self {
        Self::allowed(policy.max_attempts)
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Clone)]
pub struct RateLimitGuard {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimitGuard {
    #[must_use]
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Fingerprint the client from its environment, then check + record.
    pub async fn check_rate_limit(
        &self,
        env: &ClientEnvironment,
        action: &str,
        policy: RateLimitPolicy,
    ) -> RateLimitDecision {
        let client = ClientIdentifier::derive(env);
        self.check_identifier(&client, action, policy).await
    }

    /// Check + record for an already-derived identifier. Never fails.
    pub async fn check_identifier(
        &self,
        client: &ClientIdentifier,
        action: &str,
        policy: RateLimitPolicy,
    ) -> RateLimitDecision {
        self.check_at(client, action, policy, OffsetDateTime::now_utc())
            .await
    }

    /// Internal: check with explicit timestamp (for testing).
    async fn check_at(
        &self,
        client: &ClientIdentifier,
        action: &str,
        policy: RateLimitPolicy,
        now: OffsetDateTime,
    ) -> RateLimitDecision {
        match self.try_check_at(client, action, policy, now).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(code = e.error_code(), error = %e, action, "rate limit store unavailable; failing open");
                RateLimitDecision::fail_open(policy)
            }
        }
    }

    async fn try_check_at(
        &self,
        client: &ClientIdentifier,
        action: &str,
        policy: RateLimitPolicy,
        now: OffsetDateTime,
    ) -> Result<RateLimitDecision, BackendError> {
        let window_start = now
            .checked_sub(policy.window)
            .unwrap_or_else(|| Date::MIN.midnight().assume_utc());
        let existing = self
            .store
            .latest_since(client, action, window_start)
            .await?;

        let Some(record) = existing else {
            self.store
                .insert(&NewRateLimitRecord {
                    client_identifier: client.clone(),
                    action_type: action.to_owned(),
                    attempt_count: 1,
                    window_start: now,
                })
                .await?;
            debug!(%client, action, "rate limit window opened");
            return Ok(RateLimitDecision::allowed(policy.max_attempts.saturating_sub(1)));
        };

        if record.attempt_count >= policy.max_attempts {
            let reset_time = record
                .window_start
                .checked_add(policy.window)
                .unwrap_or_else(|| Date::MAX.midnight().assume_utc());
            info!(%client, action, attempts = record.attempt_count, %reset_time, "rate limit exceeded");
            return Ok(RateLimitDecision::blocked(reset_time));
        }

        self.store
            .update_attempt_count(record.id, record.attempt_count + 1)
            .await?;
        let remaining = policy
            .max_attempts
            .saturating_sub(record.attempt_count)
            .saturating_sub(1);
        debug!(%client, action, attempts = record.attempt_count + 1, remaining, "rate limit attempt recorded");
        Ok(RateLimitDecision::allowed(remaining))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
