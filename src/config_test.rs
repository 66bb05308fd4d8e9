use super::*;
use std::sync::Mutex;

// Env is process-global; every test here takes this lock first.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "PORT",
    "WEBSITE_DIR",
    "CONTENT_PATH",
    "BACKEND_URL",
    "BACKEND_API_KEY",
    "BACKEND_REQUEST_TIMEOUT_SECS",
    "BACKEND_CONNECT_TIMEOUT_SECS",
    "RATE_LIMIT_TABLE",
    "CONTACT_TABLE",
    "RATE_LIMIT_MAX_ATTEMPTS",
    "RATE_LIMIT_WINDOW_MINUTES",
];

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_env() };

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.website_dir, PathBuf::from(DEFAULT_WEBSITE_DIR));
    assert!(cfg.content_path.is_none());
    assert!(cfg.backend.is_none());
    assert_eq!(cfg.rate_limit, RateLimitPolicy::default());
    assert_eq!(cfg.rate_limit.max_attempts, 5);
    assert_eq!(cfg.rate_limit.window, time::Duration::minutes(15));
}

#[test]
fn from_env_parses_backend_and_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("PORT", "8088");
        std::env::set_var("CONTENT_PATH", "/srv/folio/content.yaml");
        std::env::set_var("BACKEND_URL", "https://demo.supabase.co/");
        std::env::set_var("BACKEND_API_KEY", "anon-key");
        std::env::set_var("BACKEND_REQUEST_TIMEOUT_SECS", "4");
        std::env::set_var("BACKEND_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("RATE_LIMIT_TABLE", "throttle");
        std::env::set_var("RATE_LIMIT_MAX_ATTEMPTS", "3");
        std::env::set_var("RATE_LIMIT_WINDOW_MINUTES", "60");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8088);
    assert_eq!(cfg.content_path, Some(PathBuf::from("/srv/folio/content.yaml")));
    assert_eq!(cfg.rate_limit, RateLimitPolicy::new(3, 60));

    let backend = cfg.backend.unwrap();
    assert_eq!(backend.base_url, "https://demo.supabase.co");
    assert_eq!(backend.api_key, "anon-key");
    assert_eq!(backend.timeouts, BackendTimeouts { request_secs: 4, connect_secs: 2 });
    assert_eq!(backend.rate_limit_table, "throttle");
    assert_eq!(backend.contact_table, DEFAULT_CONTACT_TABLE);

    unsafe { clear_env() };
}

#[test]
fn from_env_backend_needs_both_url_and_key() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("BACKEND_URL", "https://demo.supabase.co");
    }
    assert!(AppConfig::from_env().unwrap().backend.is_none());

    unsafe {
        clear_env();
        std::env::set_var("BACKEND_API_KEY", "anon-key");
    }
    assert!(AppConfig::from_env().unwrap().backend.is_none());

    unsafe { clear_env() };
}

#[test]
fn from_env_invalid_port_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("PORT", "eighty");
    }

    let err = AppConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::InvalidValue { var: "PORT".into(), value: "eighty".into() });

    unsafe { clear_env() };
}

#[test]
fn from_env_zero_attempts_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("RATE_LIMIT_MAX_ATTEMPTS", "0");
    }

    let err = AppConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("RATE_LIMIT_MAX_ATTEMPTS"));

    unsafe { clear_env() };
}

#[test]
fn from_env_window_is_capped_at_one_day() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("RATE_LIMIT_WINDOW_MINUTES", "1440");
    }
    assert_eq!(AppConfig::from_env().unwrap().rate_limit.window, time::Duration::days(1));

    unsafe { std::env::set_var("RATE_LIMIT_WINDOW_MINUTES", "4294967295") };
    let err = AppConfig::from_env().unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidValue { var: "RATE_LIMIT_WINDOW_MINUTES".into(), value: "4294967295".into() }
    );

    unsafe { clear_env() };
}

#[test]
fn from_env_blank_values_use_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("PORT", "  ");
        std::env::set_var("CONTENT_PATH", "");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(cfg.content_path.is_none());

    unsafe { clear_env() };
}
