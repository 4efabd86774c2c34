use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::AppConfig;
use crate::error::ApiError;

pub const ADMIN_API_KEY_HEADER: &str = "X-ADM-API-KEY";

/// Gate for admin-only endpoints: the shared admin key must be sent in `X-ADM-API-KEY`
pub async fn require_admin_api_key(
    State(config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(provided) = request.headers().get(ADMIN_API_KEY_HEADER) else {
        warn!("Admin key missing on {}", request.uri().path());
        return Err(ApiError::unauthorized("Invalid api-key or api-key is missing."));
    };

    if !key_matches(provided.as_bytes(), &config.security.admin_api_key) {
        warn!("Admin key mismatch on {}", request.uri().path());
        return Err(ApiError::unauthorized("Invalid api-key."));
    }

    Ok(next.run(request).await)
}

/// An unconfigured key never matches
fn key_matches(provided: &[u8], expected: &str) -> bool {
    !expected.is_empty() && bool::from(provided.ct_eq(expected.as_bytes()))
}
