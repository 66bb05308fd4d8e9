use super::*;
use crate::backend::BackendError;
use crate::contact::FieldError;
use crate::fingerprint::ScreenSignals;
use crate::rate_limit::RateLimitPolicy;
use crate::state::test_helpers;
use axum::http::{HeaderValue, header};

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn form() -> ContactForm {
    ContactForm {
        name: "Grace Hopper".into(),
        email: "grace@example.com".into(),
        subject: None,
        message: "Could we schedule a call next week?".into(),
        signals: ScreenSignals { screen_width: Some(1280), screen_height: Some(800), timezone: Some("UTC".into()) },
    }
}

fn headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
    headers
}

#[tokio::test]
async fn submit_valid_form_is_created() {
    let (state, _, messages) = test_helpers::test_app_state(RateLimitPolicy::default());
    let resp = submit_contact(State(state), headers(), Json(form())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["remaining_attempts"], 4);
    assert_eq!(messages.messages().len(), 1);
}

#[tokio::test]
async fn submit_invalid_form_is_unprocessable() {
    let (state, _, messages) = test_helpers::test_app_state(RateLimitPolicy::default());
    let mut bad = form();
    bad.email = "nope".into();
    let resp = submit_contact(State(state), headers(), Json(bad)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["fields"][0]["field"], "email");
    assert!(messages.messages().is_empty());
}

#[tokio::test]
async fn submit_over_limit_is_too_many_requests() {
    let (state, _, _) = test_helpers::test_app_state(RateLimitPolicy::new(1, 15));
    let first = submit_contact(State(state.clone()), headers(), Json(form())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = submit_contact(State(state), headers(), Json(form())).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(second).await;
    assert!(body["reset_time"].is_string());
}

#[test]
fn store_error_maps_to_bad_gateway() {
    let resp = contact_error_to_response(ContactError::Store(BackendError::Request("timeout".into())));
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn validation_error_maps_to_unprocessable() {
    let resp = contact_error_to_response(ContactError::Validation(vec![FieldError { field: "name", message: "x" }]));
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
