//! Review-suggestions service
//!
//! Receives a pull request diff, asks the completions API for a review and
//! answers with the review split into per-file sections.

mod config;
mod error;
mod openai;
mod review;
mod routes;

use anyhow::{Context, Result};
use config::ProxyConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ProxyConfig::from_env()?;
    log::info!("Starting pr-review-proxy on {}", config.addr);
    log::debug!("Completions endpoint {} using {}", config.api_url, config.model);

    let app = routes::router(routes::AppState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
