//! Core library for the bills manager: document storage, workflow metadata
//! and the HTTP surface serving the overview and edit pages.

pub mod config;
pub mod database;
pub mod documents;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use config::AppConfig;
pub use database::{get_database_pool, run_migrations, DatabaseManager};
pub use documents::{
    Document, DocumentDownload, DocumentPatch, DocumentRepository, DocumentRepositoryTrait,
    DocumentStore, DocumentUpload, DocumentView,
};
pub use error::{AppError, Result};
pub use handlers::create_routes;

use axum::{extract::DefaultBodyLimit, Router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub store: DocumentStore,
    pub db_manager: DatabaseManager,
}

impl AppState {
    pub fn new(store: DocumentStore, db_manager: DatabaseManager) -> Self {
        Self {
            app_name: "Bills Manager".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store,
            db_manager,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
