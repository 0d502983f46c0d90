//! HTTP request metrics middleware

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use super::logging::route_of;
use crate::infrastructure::observability::record_http_request;

/// Records count and latency per route template and status
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_owned();
    let route = route_of(&request);

    let response = next.run(request).await;

    record_http_request(&method, &route, response.status().as_u16(), start.elapsed());

    response
}
