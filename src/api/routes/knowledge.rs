use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::application::KnowledgeService;
use crate::domain::Citation;
use crate::infrastructure::IngestKnowledgeJob;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
    pub document_id: Uuid,
    pub document_name: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub citations: Vec<Citation>,
}

fn knowledge(state: &AppState) -> Result<&Arc<KnowledgeService>, StatusCode> {
    state.knowledge.as_ref().ok_or_else(|| {
        tracing::warn!("knowledge index not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

/// Accepts a UTF-8 text document in the `file` field and queues it for
/// ingestion.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, StatusCode> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("document.txt").to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        upload = Some((name, bytes));
        break;
    }

    let (name, bytes) = upload.ok_or(StatusCode::BAD_REQUEST)?;
    let content = String::from_utf8(bytes.to_vec()).map_err(|_| {
        tracing::warn!(document = %name, "rejected non-UTF-8 upload");
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    })?;
    if content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let job = IngestKnowledgeJob::new(&name, content);
    let job_id = state.job_producer.push_ingest_job(&job).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to queue ingest job");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(UploadResponse {
        job_id,
        document_id: job.document_id,
        document_name: name,
        status: "queued".to_string(),
    }))
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, StatusCode> {
    let knowledge = knowledge(&state)?;
    let top_k = request.top_k.unwrap_or_else(|| knowledge.default_top_k());

    let citations = knowledge.cite(&request.query, top_k).await.map_err(|e| {
        tracing::error!(error = %e, "Search failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(SearchResponse {
        query: request.query,
        citations,
    }))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    knowledge(&state)?
        .delete_document(document_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to delete document");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(StatusCode::NO_CONTENT)
}
