//! Contact form service: cleans a submission, then throttles and stores it.
//!
//! The rate-limit check fails open, the message store does not: a lost
//! submission is reported to the sender so they can retry.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::{BackendError, RestClient};
use crate::fingerprint::{ClientEnvironment, ClientIdentifier, ScreenSignals};
use crate::rate_limit::{CONTACT_FORM_ACTION, RateLimitDecision, RateLimitGuard, RateLimitPolicy};
use crate::sanitize::{sanitize_input, validate_email, validate_required};

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

// =============================================================================
// TYPES
// =============================================================================

/// Raw JSON body posted by the contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub signals: ScreenSignals,
}

/// Cleaned submission, one row of the `contact_messages` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    #[serde(rename = "ip_address")]
    pub client_identifier: ClientIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid contact form: {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("too many submissions")]
    RateLimited { reset_time: Option<OffsetDateTime> },
    #[error("message store failed: {0}")]
    Store(#[from] BackendError),
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Sanitized fields, before a client identifier is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanContact {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// Sanitize free-text fields and check every field, collecting all failures.
///
/// # Errors
///
/// Returns every failing field, in form order.
pub fn clean_contact(form: &ContactForm) -> Result<CleanContact, Vec<FieldError>> {
    let name = sanitize_input(&form.name);
    let email = form.email.trim().to_string();
    let subject = form
        .subject
        .as_deref()
        .map(sanitize_input)
        .filter(|s| !s.trim().is_empty());
    let message = sanitize_input(&form.message);

    let mut errors = Vec::new();
    if !validate_required(&name, MIN_NAME_CHARS) {
        errors.push(FieldError { field: "name", message: "name must be at least 2 characters" });
    }
    if !validate_email(&email) {
        errors.push(FieldError { field: "email", message: "enter a valid email address" });
    }
    if !validate_required(&message, MIN_MESSAGE_CHARS) {
        errors.push(FieldError { field: "message", message: "message must be at least 10 characters" });
    }

    if errors.is_empty() { Ok(CleanContact { name, email, subject, message }) } else { Err(errors) }
}

// =============================================================================
// STORES
// =============================================================================

#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    async fn save(&self, message: &ContactMessage) -> Result<(), BackendError>;
}

pub struct RestContactStore {
    client: RestClient,
    table: String,
}

impl RestContactStore {
    #[must_use]
    pub fn new(client: RestClient, table: impl Into<String>) -> Self {
        Self { client, table: table.into() }
    }
}

#[async_trait::async_trait]
impl ContactStore for RestContactStore {
    async fn save(&self, message: &ContactMessage) -> Result<(), BackendError> {
        self.client.insert(&self.table, message).await
    }
}

/// Keeps submissions in memory. Used when no backend is configured.
#[derive(Default)]
pub struct MemoryContactStore {
    messages: Mutex<Vec<ContactMessage>>,
}

impl MemoryContactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ContactMessage> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl ContactStore for MemoryContactStore {
    async fn save(&self, message: &ContactMessage) -> Result<(), BackendError> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

// =============================================================================
// SERVICE
// =============================================================================

#[derive(Clone)]
pub struct ContactService {
    guard: RateLimitGuard,
    store: Arc<dyn ContactStore>,
    policy: RateLimitPolicy,
}

impl ContactService {
    #[must_use]
    pub fn new(guard: RateLimitGuard, store: Arc<dyn ContactStore>, policy: RateLimitPolicy) -> Self {
        Self { guard, store, policy }
    }

    /// Validate, rate-limit and store one submission.
    ///
    /// Validation runs first so malformed posts never consume an attempt.
    ///
    /// # Errors
    ///
    /// - [`ContactError::Validation`] for bad fields (no backend call made)
    /// - [`ContactError::RateLimited`] when the client is over its quota
    /// - [`ContactError::Store`] when the message could not be saved
    pub async fn submit(&self, form: &ContactForm, user_agent: Option<&str>) -> Result<RateLimitDecision, ContactError> {
        let clean = clean_contact(form).map_err(ContactError::Validation)?;

        let env = ClientEnvironment::from_parts(user_agent, &form.signals);
        let client = ClientIdentifier::derive(&env);
        let decision = self
            .guard
            .check_identifier(&client, CONTACT_FORM_ACTION, self.policy)
            .await;
        if !decision.allowed {
            return Err(ContactError::RateLimited { reset_time: decision.reset_time });
        }

        let message = ContactMessage {
            name: clean.name,
            email: clean.email,
            subject: clean.subject,
            message: clean.message,
            client_identifier: client,
        };
        self.store.save(&message).await?;
        info!(client = %message.client_identifier, remaining = decision.remaining_attempts, "contact message stored");
        Ok(decision)
    }
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
