//! Request handlers

pub mod fhir;
pub mod ingest;
pub mod terminology;
pub mod translate;
