//! Route table for the document workflow

use axum::{
    routing::{get, post},
    Router,
};

use super::{documents, health};
use crate::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::show_overview).post(documents::upload_document))
        .route("/health", get(health::handle_health))
        .route("/document/:id", get(documents::show_document))
        .route("/document/:id/delete", get(documents::delete_document))
        .route("/update", post(documents::update_document))
        .route("/files/:id", get(documents::download_document))
}
