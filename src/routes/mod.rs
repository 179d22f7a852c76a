//! API Routes
//!
//! - `/` - Greeting
//! - `/api/health` - Health check
//! - `/api/get-presigned-url` - Presigned S3 upload URLs
//! - `/api/products` - Create and list products

pub mod health;
pub mod products;
pub mod uploads;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let router = Router::new()
        .merge(health::router())
        .merge(uploads::router())
        .merge(products::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    apply_cors(router)
}
