// src/main.rs
use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use web_scaffold::{
    client::ApiClient,
    config::{self, Config},
    server::{build_service, ServerBuilder},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("web_scaffold=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // `web-scaffold [config]` serves, `web-scaffold health [config]` checks the backend
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("health") {
        let config = load(args.next()).await?;
        return check_backend(&config).await;
    }

    let config = load(first).await?;
    serve(config).await
}

async fn load(path: Option<String>) -> Result<Config> {
    match &path {
        Some(path) => info!("Loading configuration from: {}", path),
        None => info!("No config file given, using defaults and environment"),
    }
    config::load_config(path).await
}

async fn serve(config: Config) -> Result<()> {
    info!(
        environment = ?config.environment,
        api_base = %config.api_base,
        "Starting web scaffold on {}",
        config.server.bind_addr
    );

    let service = build_service(config.environment, AppState::in_memory());

    ServerBuilder::new(config.server.bind_addr)
        .with_handler(service)
        .with_shutdown(shutdown_signal())
        .serve()
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn check_backend(config: &Config) -> Result<()> {
    let client = ApiClient::new(config.api_base.clone());
    let health = client
        .health()
        .await
        .with_context(|| format!("Health check against {} failed", client.base()))?;

    println!("{}", serde_json::to_string(&health)?);
    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
