//! services/api/src/web/middleware.rs
//!
//! Rate limiting middleware for the AI routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::web::state::AppState;

/// Identifies the caller by the first `x-forwarded-for` hop.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

/// Middleware that rejects callers who exhausted their AI quota for the current window.
pub async fn rate_limit_ai(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(req.headers());

    if !state.rate_limiter.check(&key) {
        warn!("Rate limit exceeded for {} on {}", key, req.uri().path());
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(req).await)
}
