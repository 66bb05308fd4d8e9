//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the read-only portfolio content plus the rate-limit guard and the
//! contact service. Stores sit behind trait objects: hosted REST tables when
//! a backend is configured, in-process memory otherwise.

use std::sync::Arc;

use tracing::warn;

use crate::backend::{BackendError, RestClient};
use crate::config::AppConfig;
use crate::contact::{ContactService, ContactStore, MemoryContactStore, RestContactStore};
use crate::content::PortfolioContent;
use crate::rate_limit::{MemoryRateLimitStore, RateLimitGuard, RateLimitPolicy, RateLimitStore, RestRateLimitStore};

/// Shared application state. Clone is required by Axum; inner fields are
/// Arc-wrapped or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<PortfolioContent>,
    pub guard: RateLimitGuard,
    pub contact: ContactService,
    /// Default policy for checks that do not override it.
    pub rate_limit: RateLimitPolicy,
}

impl AppState {
    #[must_use]
    pub fn new(
        content: PortfolioContent,
        limits: Arc<dyn RateLimitStore>,
        messages: Arc<dyn ContactStore>,
        rate_limit: RateLimitPolicy,
    ) -> Self {
        let guard = RateLimitGuard::new(limits);
        let contact = ContactService::new(guard.clone(), messages, rate_limit);
        Self { content: Arc::new(content), guard, contact, rate_limit }
    }

    /// Wire stores from config: REST tables when a backend is configured,
    /// in-process memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client fails to build.
    pub fn from_config(config: &AppConfig, content: PortfolioContent) -> Result<Self, BackendError> {
        let Some(backend) = &config.backend else {
            warn!("BACKEND_URL/BACKEND_API_KEY not set; using in-memory stores, submissions are not persisted");
            return Ok(Self::new(
                content,
                Arc::new(MemoryRateLimitStore::new()),
                Arc::new(MemoryContactStore::new()),
                config.rate_limit,
            ));
        };

        let client = RestClient::new(backend)?;
        let limits = Arc::new(RestRateLimitStore::new(client.clone(), &backend.rate_limit_table));
        let messages = Arc::new(RestContactStore::new(client, &backend.contact_table));
        Ok(Self::new(content, limits, messages, config.rate_limit))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// State over memory stores; the stores are returned for inspection.
    #[must_use]
    pub fn test_app_state(policy: RateLimitPolicy) -> (AppState, Arc<MemoryRateLimitStore>, Arc<MemoryContactStore>) {
        let limits = Arc::new(MemoryRateLimitStore::new());
        let messages = Arc::new(MemoryContactStore::new());
        let content = PortfolioContent::builtin().expect("builtin content should parse");
        let state = AppState::new(content, limits.clone(), messages.clone(), policy);
        (state, limits, messages)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
