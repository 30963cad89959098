use axum::{
    routing::{get, post},
    Router,
};

use crate::{axum::state::AppState, http::controllers::ArchiveController};

pub fn mount() -> Router<AppState> {
    Router::new()
        .route("/indices", get(ArchiveController::indices))
        .route("/indices/:index/facets", get(ArchiveController::facets))
        .route("/search", post(ArchiveController::search))
        .route("/ask", post(ArchiveController::ask))
}
