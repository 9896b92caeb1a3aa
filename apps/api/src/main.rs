use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_optimizer::config::Config;
use resume_optimizer::llm_client::LlmClient;
use resume_optimizer::optimize::{OptimizeService, OptimizeSettings};
use resume_optimizer::routes::build_router;
use resume_optimizer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume optimizer v{}", env!("CARGO_PKG_VERSION"));

    match config.masked_api_key() {
        Some(masked) => info!("DeepSeek API key configured: true ({masked})"),
        None => warn!("DeepSeek API key configured: false; optimize requests will fail"),
    }

    // Initialize LLM client
    let llm = LlmClient::new(config.deepseek_api_url.clone())?;
    info!(
        "LLM client initialized (url: {}, model: {})",
        llm.api_url(),
        config.model
    );
    info!(
        "Prompt template: {} (max_tokens={}, temperature={})",
        config.prompt_template, config.max_tokens, config.temperature
    );

    let optimizer = OptimizeService::new(Arc::new(llm), OptimizeSettings::from(&config));

    if let Some(dir) = &config.static_dir {
        info!("Serving static assets from {}", dir.display());
    }

    let state = AppState {
        optimizer,
        config: config.clone(),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {}; is it already in use?", config.port))?;
    info!("Listening on {addr} (API base: {}/)", config.base_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
