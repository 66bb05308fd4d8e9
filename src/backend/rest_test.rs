use super::*;

#[derive(Debug, serde::Deserialize)]
struct Row {
    id: i64,
    action_type: String,
}

#[test]
fn table_url_joins_prefix() {
    assert_eq!(table_url("https://demo.supabase.co", "rate_limits"), "https://demo.supabase.co/rest/v1/rate_limits");
}

#[test]
fn table_url_trims_trailing_slash() {
    assert_eq!(table_url("https://demo.supabase.co/", "contact_messages"), "https://demo.supabase.co/rest/v1/contact_messages");
}

#[test]
fn check_status_accepts_2xx() {
    assert_eq!(check_status(200, "[]".into()).unwrap(), "[]");
    assert_eq!(check_status(201, String::new()).unwrap(), "");
    assert_eq!(check_status(204, String::new()).unwrap(), "");
}

#[test]
fn check_status_rejects_errors_with_body() {
    let err = check_status(404, "{\"message\":\"relation does not exist\"}".into()).unwrap_err();
    match err {
        BackendError::Response { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("relation"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn parse_rows_decodes_array() {
    let rows: Vec<Row> = parse_rows(r#"[{"id":7,"action_type":"contact_form_submit","extra":true}]"#).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 7);
    assert_eq!(rows[0].action_type, "contact_form_submit");
}

#[test]
fn parse_rows_empty_array() {
    let rows: Vec<Row> = parse_rows("[]").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn parse_rows_invalid_json() {
    let err = parse_rows::<Row>("not json").unwrap_err();
    assert!(matches!(err, BackendError::Parse(_)));
}

#[test]
fn client_builds_from_config() {
    let config = BackendConfig {
        base_url: "https://demo.supabase.co".into(),
        api_key: "anon".into(),
        timeouts: crate::config::BackendTimeouts { request_secs: 3, connect_secs: 1 },
        rate_limit_table: "rate_limits".into(),
        contact_table: "contact_messages".into(),
    };
    let client = RestClient::new(&config).unwrap();
    assert_eq!(client.table_url("rate_limits"), "https://demo.supabase.co/rest/v1/rate_limits");
}
