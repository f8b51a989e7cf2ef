//! Route definitions
//!
//! Everything here sits behind the auth middleware (when enabled); `/health`
//! and `/` are registered separately as public routes.

use crate::api::handlers::{fhir, ingest, terminology, translate};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn bridge_routes() -> Router<AppState> {
    Router::new()
        // Translation engine
        .route("/translate", post(translate::translate))
        // Terminology lookups
        .route("/terminology/search", get(terminology::search))
        .route("/terminology/code/:code", get(terminology::get_by_code))
        // FHIR resources
        .route("/fhir/CodeSystem/:id", get(fhir::get_code_system))
        .route("/fhir/ConceptMap/:id", get(fhir::get_concept_map))
        .route("/fhir/Bundle", post(fhir::post_bundle))
        // Administration
        .route("/admin/ingest", post(ingest::ingest_csv))
}
