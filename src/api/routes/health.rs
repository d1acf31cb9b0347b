use axum::{extract::State, http::StatusCode, Json};
use deadpool_redis::redis::cmd;
use serde::Serialize;
use serde_json::json;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub redis: String,
    pub knowledge: String,
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "chat": "/api/v1/chat",
            "chat_job": "/api/v1/chat/jobs/{job_id}",
            "sessions": "/api/v1/sessions/{session_id}",
            "quote": "/api/v1/pricing/quote",
            "services": "/api/v1/pricing/services",
            "knowledge": "/api/v1/knowledge",
            "knowledge_search": "/api/v1/knowledge/search"
        }
    }))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let redis_status = match state.redis_pool.get().await {
        Ok(mut conn) => {
            let ping: Result<String, _> = cmd("PING").query_async(&mut *conn).await;
            if ping.is_ok() {
                "connected"
            } else {
                "disconnected"
            }
        }
        Err(_) => "disconnected",
    };

    let knowledge_status = match &state.knowledge {
        None => "disabled",
        Some(knowledge) => match knowledge.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "knowledge index unreachable");
                "disconnected"
            }
        },
    };

    let is_healthy = redis_status == "connected" && knowledge_status != "disconnected";

    let response = ReadinessResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.into(),
        redis: redis_status.into(),
        knowledge: knowledge_status.into(),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
