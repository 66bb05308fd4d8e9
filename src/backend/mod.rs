//! Backend: thin client for the hosted table service (PostgREST dialect).
//!
//! DESIGN
//! ======
//! Every remote call in this service is one of three table primitives:
//! filtered select, insert, and update-by-id. `RestClient` owns the HTTP
//! client, auth headers and timeouts; the rate-limit and contact stores build
//! on top of it. Response parsing is kept in pure functions for testability.

pub mod rest;

pub use rest::RestClient;

// =============================================================================
// ERROR
// =============================================================================

/// Failure reaching or querying the hosted table service.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("backend response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("backend response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BackendError {
    /// Grepable code for log lines.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_BACKEND_REQUEST",
            Self::Response { .. } => "E_BACKEND_RESPONSE",
            Self::Parse(_) => "E_BACKEND_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// One PostgREST query pair, e.g. `("action_type", "eq.contact_form_submit")`.
pub type Filter = (String, String);

/// `column=eq.value`
#[must_use]
pub fn eq(column: &str, value: &str) -> Filter {
    (column.to_owned(), format!("eq.{value}"))
}

/// `column=gte.value`
#[must_use]
pub fn gte(column: &str, value: &str) -> Filter {
    (column.to_owned(), format!("gte.{value}"))
}

/// `order=column.desc`
#[must_use]
pub fn order_desc(column: &str) -> Filter {
    ("order".to_owned(), format!("{column}.desc"))
}

/// `limit=n`
#[must_use]
pub fn limit(n: usize) -> Filter {
    ("limit".to_owned(), n.to_string())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
