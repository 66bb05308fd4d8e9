//! In-process rate-limit store.
//!
//! Used when no hosted backend is configured, and as the reference store in
//! tests. Each insert drops rows older than `MAX_WINDOW_MINUTES` before the
//! new row's `window_start`; no policy can read them again.

use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

use super::MAX_WINDOW_MINUTES;
use super::store::{NewRateLimitRecord, RateLimitRecord, RateLimitStore};
use crate::backend::BackendError;
use crate::fingerprint::ClientIdentifier;

#[derive(Default)]
pub struct MemoryRateLimitStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows: Vec<RateLimitRecord>,
    next_id: i64,
}

impl MemoryRateLimitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<RateLimitRecord> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn latest_since(
        &self,
        client: &ClientIdentifier,
        action: &str,
        since: OffsetDateTime,
    ) -> Result<Option<RateLimitRecord>, BackendError> {
        let inner = self.lock();
        let newest = inner
            .rows
            .iter()
            .filter(|r| &r.client_identifier == client && r.action_type == action && r.window_start >= since)
            .max_by_key(|r| (r.window_start, r.id))
            .cloned();
        Ok(newest)
    }

    async fn insert(&self, record: &NewRateLimitRecord) -> Result<(), BackendError> {
        let mut inner = self.lock();
        prune_stale(&mut inner.rows, record.window_start);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(RateLimitRecord {
            id,
            client_identifier: record.client_identifier.clone(),
            action_type: record.action_type.clone(),
            attempt_count: record.attempt_count,
            window_start: record.window_start,
            created_at: Some(OffsetDateTime::now_utc()),
        });
        Ok(())
    }

    async fn update_attempt_count(&self, id: i64, attempt_count: u32) -> Result<(), BackendError> {
        // Zero matching rows is not an error, same as a PATCH with no match.
        if let Some(row) = self.lock().rows.iter_mut().find(|r| r.id == id) {
            row.attempt_count = attempt_count;
        }
        Ok(())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn prune_stale(rows: &mut Vec<RateLimitRecord>, now: OffsetDateTime) {
    let Some(horizon) = now.checked_sub(Duration::minutes(i64::from(MAX_WINDOW_MINUTES))) else {
        return;
    };
    rows.retain(|r| r.window_start >= horizon);
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
