use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::models::{ApiMessage, AppState, CreateProductRequest, Product};
use crate::types::AppResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/products", get(list_products).post(create_product))
}

/// POST /api/products
///
/// The new record's id is logged but deliberately not echoed back; clients
/// re-list to see it.
async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<Json<ApiMessage>> {
    let Json(request) = payload?;
    let product = request.into_new_product()?;
    let created = state.products.create(product).await?;

    info!("Product {} added ({})", created.id, created.filename);
    Ok(Json(ApiMessage::ok("product added successfully")))
}

/// GET /api/products
async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.list_all().await?;
    Ok(Json(products))
}
