//! Rate-limit store backed by the hosted `rate_limits` table.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::store::{NewRateLimitRecord, RateLimitRecord, RateLimitStore};
use crate::backend::{self, BackendError, Filter, RestClient};
use crate::fingerprint::ClientIdentifier;

pub struct RestRateLimitStore {
    client: RestClient,
    table: String,
}

impl RestRateLimitStore {
    #[must_use]
    pub fn new(client: RestClient, table: impl Into<String>) -> Self {
        Self { client, table: table.into() }
    }
}

#[derive(serde::Serialize)]
struct AttemptCountPatch {
    attempt_count: u32,
}

/// Filters for "newest record for (client, action) since `since`".
fn latest_since_filters(
    client: &ClientIdentifier,
    action: &str,
    since: OffsetDateTime,
) -> Result<Vec<Filter>, BackendError> {
    let since = since
        .format(&Rfc3339)
        .map_err(|e| BackendError::Request(format!("timestamp format: {e}")))?;
    Ok(vec![
        backend::eq("ip_address", client.as_str()),
        backend::eq("action_type", action),
        backend::gte("window_start", &since),
        backend::order_desc("window_start"),
        backend::limit(1),
    ])
}

#[async_trait::async_trait]
impl RateLimitStore for RestRateLimitStore {
    async fn latest_since(
        &self,
        client: &ClientIdentifier,
        action: &str,
        since: OffsetDateTime,
    ) -> Result<Option<RateLimitRecord>, BackendError> {
        let filters = latest_since_filters(client, action, since)?;
        let rows: Vec<RateLimitRecord> = self.client.select(&self.table, &filters).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, record: &NewRateLimitRecord) -> Result<(), BackendError> {
        self.client.insert(&self.table, record).await
    }

    async fn update_attempt_count(&self, id: i64, attempt_count: u32) -> Result<(), BackendError> {
        self.client
            .update(&self.table, id, &AttemptCountPatch { attempt_count })
            .await
    }
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
