//! urlguard - Main Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use urlguard::api::{build_router, AppState};
use urlguard::{AppConfig, UrlChecker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("urlguard v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    let checker = Arc::new(UrlChecker::new(&config));
    let app = build_router(AppState { checker });

    tracing::info!("API listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
