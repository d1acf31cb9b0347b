use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;

/// Rejects requests without a configured API key, read from `X-API-Key`
/// or `Authorization: Bearer`. Open when no keys are configured.
pub async fn api_key_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let keys = &state.config.config.auth.api_keys;
    if keys.is_empty() {
        return Ok(next.run(request).await);
    }

    let headers = request.headers();
    let presented = headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        });

    match presented {
        Some(key) if keys.iter().any(|k| k == key) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(uri = %request.uri(), "rejected invalid api key");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
