// Permissive CORS; every OPTIONS request gets an empty 204.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

pub(super) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Outermost layer: preflights answered by the CORS layer and plain OPTIONS requests that
/// fall through to the router both leave as 204 with no body.
pub(super) async fn options_no_content(req: Request, next: Next) -> Response {
    let is_options = req.method() == Method::OPTIONS;
    let mut res = next.run(req).await;
    if is_options {
        *res.status_mut() = StatusCode::NO_CONTENT;
        res.headers_mut().remove(header::CONTENT_LENGTH);
        res.headers_mut().remove(header::ALLOW);
        *res.body_mut() = Body::empty();
    }
    res
}
