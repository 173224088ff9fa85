//! HTTP middleware stack: request tracing and permissive CORS.
//!
//! The ledger API is an internal dashboard backend, so any origin is
//! accepted. Every OPTIONS request is answered by the CORS layer with an
//! empty `204` and never reaches a handler.

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Attach tracing and CORS to a bare router from [`crate::routes::build_router`].
pub fn with_http_layers(router: Router) -> Router {
    router
        .layer(cors_permissive())
        .layer(middleware::from_fn(preflight_no_content))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// CORS: wildcard origin, GET/POST/OPTIONS, `Content-Type` + `Authorization`.
pub fn cors_permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// The CORS layer answers preflights with `200`; clients of this API expect
/// `204 No Content`.
async fn preflight_no_content(req: Request, next: Next) -> Response {
    let is_options = req.method() == Method::OPTIONS;
    let mut resp = next.run(req).await;
    if is_options && resp.status().is_success() {
        *resp.status_mut() = StatusCode::NO_CONTENT;
    }
    resp
}
