//! Persistence seam for the rate-limit guard.
//!
//! The guard only ever needs three calls: newest record in window, insert,
//! and update-count-by-id. Keeping them behind a trait lets a store with an
//! atomic increment-if-below-threshold primitive replace the read-then-write
//! sequence without changing the guard's callers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::backend::BackendError;
use crate::fingerprint::ClientIdentifier;

/// One row of the `rate_limits` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    pub id: i64,
    #[serde(rename = "ip_address")]
    pub client_identifier: ClientIdentifier,
    pub action_type: String,
    pub attempt_count: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Insert payload. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRateLimitRecord {
    #[serde(rename = "ip_address")]
    pub client_identifier: ClientIdentifier,
    pub action_type: String,
    pub attempt_count: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
}

#[async_trait::async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Newest record for (client, action) whose `window_start >= since`.
    async fn latest_since(
        &self,
        client: &ClientIdentifier,
        action: &str,
        since: OffsetDateTime,
    ) -> Result<Option<RateLimitRecord>, BackendError>;

    async fn insert(&self, record: &NewRateLimitRecord) -> Result<(), BackendError>;

    /// Overwrite `attempt_count` on the row with this id.
    async fn update_attempt_count(&self, id: i64, attempt_count: u32) -> Result<(), BackendError>;
}
