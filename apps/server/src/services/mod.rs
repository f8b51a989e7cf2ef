//! Service layer - translation engine, ingestion, FHIR resource builders

pub mod fhir;
pub mod ingest;
pub mod translation;

pub use ingest::{EmbeddingRegistry, IngestService, IngestSummary};
pub use translation::{SemanticSearch, TranslationService};
