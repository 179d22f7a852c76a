// CORS: browsers upload straight to the bucket, but still call this API from
// arbitrary origins, so every origin, method and header is allowed.

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn apply_cors(router: Router) -> Router {
    router.layer(cors_layer())
}
