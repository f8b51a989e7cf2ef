//! AYUSH Bridge - NAMASTE ⇄ ICD-11 terminology bridging service
//!
//! Maps India's NAMASTE traditional-medicine morbidity codes (Ayurveda,
//! Siddha, Unani) to WHO ICD-11 through a hybrid engine:
//! - deterministic, human-vetted mappings first,
//! - semantic-similarity fallback against an external embedding engine.
//!
//! Also exposes FHIR CodeSystem/ConceptMap resources over the ingested
//! vocabularies and an administrative CSV ingestion endpoint.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
