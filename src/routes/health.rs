use axum::{extract::State, routing::get, Json, Router};
use tracing::warn;

use crate::models::{AppState, HealthResponse};

pub const GREETING: &str = "hello world";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(greeting))
        .route("/api/health", get(health_check))
}

async fn greeting() -> &'static str {
    GREETING
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.products.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!("Health check could not reach the product store: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: database.to_string(),
    })
}
