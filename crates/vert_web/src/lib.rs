use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/news", get(handlers::list_news))
        .route("/api/chat", post(handlers::chat))
        .route("/api/status", get(handlers::status))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use vert_core::{Article, Error, Result};
}
