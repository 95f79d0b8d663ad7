//! VaultAI relay — application entry point.
//!
//! Wires together:
//! - Configuration (config.rs)
//! - Credential extraction and redaction (safety/)
//! - Upstream LLM streaming (llm/)
//! - HTTP routes (server.rs)

pub mod config;
pub mod error;
pub mod llm;
pub mod safety;
pub mod server;

use config::AppConfig;
use error::AppError;
use server::AppState;

/// Load configuration, bind, and serve until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match dotenv {
        Ok(path) => log::info!("[CONFIG] Loaded {}", path.display()),
        Err(e) if e.not_found() => log::debug!("[CONFIG] No .env file"),
        Err(e) => log::warn!("[CONFIG] Ignoring unreadable .env: {}", e),
    }

    let config = AppConfig::from_env()?;
    match &config.api_key {
        Some(key) => log::info!("[CONFIG] API key found ({} chars)", key.len()),
        None => log::warn!("[CONFIG] No OPENAI_API_KEY set — /chat will answer 503"),
    }
    log::info!("[CONFIG] Model: {}, upstream: {}", config.model, config.api_base);
    log::info!("[CONFIG] Vault tools: {}", llm::tools::tool_names().join(", "));

    let addr = config.listen_addr;
    let app = server::build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;

    log::info!("VaultAI relay listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("VaultAI relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
