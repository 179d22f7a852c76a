use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::models::{AppState, PresignRequest, PresignResponse};
use crate::types::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/get-presigned-url", post(get_presigned_url))
}

async fn get_presigned_url(
    State(state): State<AppState>,
    payload: Result<Json<PresignRequest>, JsonRejection>,
) -> AppResult<Json<PresignResponse>> {
    let Json(request) = payload?;
    let mime = request
        .mime
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("provide a mime value".to_string()))?;

    let issued = state.uploads.issue(&mime).await?;
    info!("Presigned upload URL issued for {}", issued.key);

    Ok(Json(PresignResponse {
        url: issued.url,
        final_name: issued.key,
    }))
}
