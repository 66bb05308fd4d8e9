//! Contact form endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use time::format_description::well_known::Rfc3339;
use tracing::{error, warn};

use crate::contact::{ContactError, ContactForm};
use crate::state::AppState;

/// `POST /api/contact`: 201 on success, 422 / 429 / 502 on failure.
pub async fn submit_contact(State(state): State<AppState>, headers: HeaderMap, Json(form): Json<ContactForm>) -> Response {
    match state
        .contact
        .submit(&form, super::user_agent(&headers))
        .await
    {
        Ok(decision) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "ok": true, "remaining_attempts": decision.remaining_attempts })),
        )
            .into_response(),
        Err(e) => contact_error_to_response(e),
    }
}

pub(crate) fn contact_error_to_response(err: ContactError) -> Response {
    match err {
        ContactError::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "ok": false, "error": "validation failed", "fields": errors })),
        )
            .into_response(),
        ContactError::RateLimited { reset_time } => {
            let reset_time = reset_time.and_then(|t| t.format(&Rfc3339).ok());
            warn!(reset_time = ?reset_time, "contact form rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "ok": false,
                    "error": "too many submissions, try again later",
                    "reset_time": reset_time,
                })),
            )
                .into_response()
        }
        ContactError::Store(e) => {
            error!(code = e.error_code(), error = %e, "contact message store failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "ok": false, "error": "could not send message, try again later" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
