use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// `origin` of `*` opens the API to every origin, since voters reach it from
/// arbitrary phones on the venue network.
pub fn init_cors(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!("Invalid CORS_ORIGIN {origin}: {e}, allowing any origin");
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_origin(allow_origin)
}
