use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::domain::AgentProfile;
use crate::infrastructure::ProcessChatJob;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub agent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub job_id: Uuid,
    pub session_id: Uuid,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    if request.message.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let profile = match request.agent_id.as_deref() {
        None => AgentProfile::default(),
        Some(id) => AgentProfile::from_id(id).ok_or_else(|| {
            tracing::warn!(agent_id = id, "unknown agent requested");
            StatusCode::BAD_REQUEST
        })?,
    };

    let mut job = ProcessChatJob::new(&request.message).with_agent(profile);
    if let Some(session_id) = request.session_id {
        job = job.with_session(session_id);
    }
    if let Some(user_id) = request.user_id {
        job = job.with_user(user_id);
    }

    let job_id = state.job_producer.push_chat_job(&job).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to queue chat job");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ChatResponse {
        job_id,
        session_id: job.session_id,
        status: "queued".to_string(),
    }))
}

pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, StatusCode> {
    let result = state
        .job_producer
        .get_job_status(&job_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get job status");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    match result {
        Some(job_result) => Ok(Json(JobStatusResponse {
            job_id: job_result.job_id,
            status: job_result.status.as_str().to_string(),
            result: job_result.result,
            error: job_result.error,
        })),
        None => Err(StatusCode::NOT_FOUND),
    }
}
