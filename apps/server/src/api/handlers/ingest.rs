//! Administrative ingestion endpoint

use crate::{
    services::{IngestService, IngestSummary},
    state::AppState,
    Error, Result,
};
use axum::{body::Bytes, extract::State, Json};

/// `POST /admin/ingest` — body is a NAMASTE export CSV.
pub async fn ingest_csv(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestSummary>> {
    if body.is_empty() {
        return Err(Error::Validation("empty request body".to_string()));
    }

    let source_system = state
        .config
        .terminology
        .namaste_systems
        .first()
        .cloned()
        .unwrap_or_default();

    let service = IngestService::new(
        state.terminology.clone(),
        state.mappings.clone(),
        state.semantic.clone(),
        source_system,
        state.config.terminology.icd_system.clone(),
    );

    let summary = service.ingest_csv(&body).await?;
    Ok(Json(summary))
}
