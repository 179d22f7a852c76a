// Product Catalog - product metadata API with presigned S3 image uploads

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod storage;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
