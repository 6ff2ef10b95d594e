pub mod error;
pub mod handlers;
pub mod state;

pub use error::*;
pub use handlers::*;
pub use state::*;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/generate-label", post(handlers::generate_label))
        .route("/fetch-and-generate", get(handlers::fetch_and_generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
