//! API routes module

pub mod health;
pub mod products;

use axum::{routing::get, Router};
use axum_helpers::server::health_router;

use crate::state::AppState;

/// Create all API routes, including `/health` and `/ready`
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/product", products::router(state))
        .merge(health::router(state.clone()))
        .merge(health_router(state.config.app))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await
}

async fn root() -> &'static str {
    "Server is running"
}
