//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api` for content sections, the contact form and the
//! rate-limit check. Everything else falls through to the static site in
//! `WEBSITE_DIR`.

pub mod contact;
pub mod content;
pub mod rate_limit;

use std::path::Path;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes only, without the static fallback.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/content", get(content::get_content))
        .route("/api/projects", get(content::list_projects))
        .route("/api/blog", get(content::latest_posts))
        .route("/api/certifications", get(content::list_certifications))
        .route("/api/theme", get(content::get_theme))
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/rate-limit/check", post(rate_limit::check_rate_limit))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: API + static site + CORS + request tracing.
pub fn app(state: AppState, website_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let website = ServeDir::new(website_dir).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(website)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `User-Agent` header as text, if present and valid.
pub(crate) fn user_agent(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
