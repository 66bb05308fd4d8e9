use super::*;

#[test]
fn eq_filter_prefixes_operator() {
    assert_eq!(eq("action_type", "contact_form_submit"), ("action_type".into(), "eq.contact_form_submit".into()));
}

#[test]
fn gte_filter_keeps_timestamp_verbatim() {
    let (column, value) = gte("window_start", "2026-01-01T00:00:00Z");
    assert_eq!(column, "window_start");
    assert_eq!(value, "gte.2026-01-01T00:00:00Z");
}

#[test]
fn order_and_limit_filters() {
    assert_eq!(order_desc("window_start"), ("order".into(), "window_start.desc".into()));
    assert_eq!(limit(1), ("limit".into(), "1".into()));
}

#[test]
fn error_codes_are_distinct() {
    let errors = [
        BackendError::Request("x".into()),
        BackendError::Response { status: 500, body: String::new() },
        BackendError::Parse("x".into()),
        BackendError::HttpClientBuild("x".into()),
    ];
    let mut codes: Vec<_> = errors.iter().map(BackendError::error_code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), 4);
}

#[test]
fn response_error_message_includes_status() {
    let err = BackendError::Response { status: 401, body: "nope".into() };
    assert!(err.to_string().contains("401"));
}
