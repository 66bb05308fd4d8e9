use folio::{config, content, routes, state};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let content = content::PortfolioContent::load(config.content_path.as_deref()).expect("content load failed");
    tracing::info!(
        projects = content.projects.len(),
        posts = content.blog.len(),
        certifications = content.certifications.len(),
        source = ?config.content_path,
        "portfolio content loaded"
    );

    let state = state::AppState::from_config(&config, content).expect("backend client init failed");
    tracing::info!(
        max_attempts = config.rate_limit.max_attempts,
        window_minutes = config.rate_limit.window.whole_minutes(),
        backend = config.backend.is_some(),
        "rate limiting configured"
    );

    let app = routes::app(state, &config.website_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, website_dir = %config.website_dir.display(), "folio listening");
    axum::serve(listener, app).await.expect("server failed");
}
