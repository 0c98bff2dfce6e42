//! TruthLens HTTP server entrypoint.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use truthlens_core::config::Config;
use truthlens_core::server::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--check-config") {
        std::process::exit(run_config_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let pipeline = config.build_pipeline()?;
    let addr = config.socket_addr();

    tracing::info!(
        llm_provider = %config.llm_provider,
        main_model = %config.main_model,
        verifier_model = %config.verifier_model,
        search_provider = %config.search_provider,
        "TruthLens starting"
    );

    let state = AppState::new(Arc::new(pipeline), ServiceConfig::from(&config));
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("TruthLens shutdown complete");
    Ok(())
}

/// Print the resolved configuration with keys masked. Returns the exit code.
fn run_config_check() -> i32 {
    println!("TruthLens configuration check\n");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("[ERROR] {}", e);
            return 1;
        }
    };

    for (label, value) in config.describe() {
        println!("  {:<20} {}", label, value);
    }
    println!();

    match config.validate() {
        Ok(()) => {
            println!("[OK] Configuration is valid");
            0
        }
        Err(e) => {
            println!("[ERROR] {}", e);
            1
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
