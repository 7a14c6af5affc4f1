//! HTTP adapters for intFeed.
//!
//! # Responsibility
//! - Route JSON API and server-rendered page requests to the record service.
//! - Keep transport concerns out of `intfeed_core`.

pub mod api;
pub mod config;
pub mod pages;
pub mod render;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use config::{ServeMode, ServerConfig};
pub use state::AppState;

/// Builds the full application router.
pub fn router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(pages::index))
        .route("/save", post(pages::save))
        .route("/list", get(pages::list))
        .route(
            "/api/users",
            get(api::list_users)
                .post(api::create_user)
                .fallback(api::method_not_allowed),
        )
        .route("/health", get(api::health))
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
