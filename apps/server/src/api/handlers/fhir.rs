//! FHIR resource endpoints
//!
//! The published resources are built on request from the current table
//! contents; there is no resource versioning here.

use crate::{
    db::traits::{MappingStore, TerminologyStore},
    services::fhir::{bundle_ack, code_system, concept_map, CODESYSTEM_ID, CONCEPTMAP_ID},
    state::AppState,
    Error, Result,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value as JsonValue;

/// `GET /fhir/CodeSystem/:id`
pub async fn get_code_system(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>> {
    if id != CODESYSTEM_ID {
        return Err(Error::NotFound(format!("CodeSystem/{id}")));
    }

    let entries = state.terminology.list_all().await?;
    let url = state
        .config
        .terminology
        .namaste_systems
        .first()
        .cloned()
        .unwrap_or_default();

    Ok(Json(code_system(&entries, &url)))
}

/// `GET /fhir/ConceptMap/:id`
pub async fn get_concept_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>> {
    if id != CONCEPTMAP_ID {
        return Err(Error::NotFound(format!("ConceptMap/{id}")));
    }

    let mappings = state.mappings.list_all().await?;
    Ok(Json(concept_map(&mappings)))
}

/// `POST /fhir/Bundle` — validate an encounter bundle and acknowledge it.
/// Forwarding to a downstream FHIR server is handled out of process.
pub async fn post_bundle(
    State(_state): State<AppState>,
    Json(bundle): Json<JsonValue>,
) -> Result<Json<JsonValue>> {
    let ack = bundle_ack(&bundle)?;
    Ok(Json(ack))
}
