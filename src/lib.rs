pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod extractors;
pub mod format;
pub mod forms;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod status;
pub mod views;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The complete dashboard application, ready to serve.
pub fn app(state: AppState) -> Router {
    handlers::router(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
