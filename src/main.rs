//! Server binary: configuration, startup, and graceful shutdown.

use std::error::Error;
use std::net::SocketAddr;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shoebox::handlers;
use shoebox::{AppConfig, AppState, PhotoStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::parse();
    config.validate()?;
    std::fs::create_dir_all(&config.photos_dir)?;

    let (store, worker) = PhotoStore::open(&config.photos_dir)?;
    info!(
        photos = store.photo_count(),
        dir = %config.photos_dir.display(),
        "photo directory scanned"
    );

    let addr = SocketAddr::new(config.host, config.port);
    let state = AppState::new(config, store);
    let app = handlers::router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Queued writes must land before we exit; dropping the last store
    // handle closes the queue and the worker finishes what remains.
    info!("draining photo writer");
    drop(state);
    worker.drain().await;
    info!("shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
