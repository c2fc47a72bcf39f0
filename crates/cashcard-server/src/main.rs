//! CashCard Server Binary
//!
//! Runs the CashCard HTTP server.

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use cashcard_server::{
    create_router, seed, AppState, CardStore, MemoryStore, ServerConfig,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let store = open_store(&config).await?;
    if config.seed_demo_data {
        seed::seed_cards(store.as_ref(), seed::demo_cards()).await?;
    }

    let gate = config.build_gate()?;

    info!(
        addr = %config.listen_addr(),
        required_role = %config.required_role,
        default_page_size = config.default_page_size,
        "Starting CashCard server"
    );

    // Create application state
    let state = Arc::new(AppState {
        store,
        gate,
        config: config.card_service(),
    });

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!(addr = %config.listen_addr(), "CashCard server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("CashCard server stopped");
    Ok(())
}

#[cfg(feature = "postgres")]
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn CardStore>, BoxError> {
    match &config.database_url {
        Some(url) => {
            let store = cashcard_server::storage::PostgresStore::new(url).await?;
            Ok(Arc::new(store))
        }
        None => {
            info!("No database URL configured, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn CardStore>, BoxError> {
    if config.database_url.is_some() {
        warn!("Database URL set but built without the postgres feature; using in-memory store");
    }
    Ok(Arc::new(MemoryStore::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
