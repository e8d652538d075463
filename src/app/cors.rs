use tower_http::cors::{Any, CorsLayer};

/// Allows every origin, method and header on every path.
///
/// Browsers talk to the API from whatever host serves the client, so no
/// origin list is kept.
pub fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
