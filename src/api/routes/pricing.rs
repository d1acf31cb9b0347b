use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::domain::{QuoteRequest, QuoteResult, ServiceCatalogEntry};

/// Quotes directly, outside of any agent run. Unavailable quotes are still
/// a `200`; the body says why.
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Json<QuoteResult> {
    Json(state.quotation.quote(&request))
}

pub async fn list_services(State(state): State<AppState>) -> Json<Vec<ServiceCatalogEntry>> {
    Json(state.quotation.catalog().entries().to_vec())
}
