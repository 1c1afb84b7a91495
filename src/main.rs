use anyhow::Context;
use live_vote::{
    app::create_app,
    config::{
        cors::init_cors, logger::initialize_logger, settings::ServerSettings,
        storage::init_storage,
    },
};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    initialize_logger();

    info!("🚀 Server starting initialization...");
    let settings = ServerSettings::load();

    // Initialize Storage
    let storage = init_storage(&settings.data_dir)
        .await
        .context("Failed to initialize storage")?;

    let app = create_app(storage, init_cors(&settings.cors_origin));

    let address = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("🚀 Server started successfully at {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
