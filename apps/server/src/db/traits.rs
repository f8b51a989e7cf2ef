//! Storage traits for the terminology bridge
//!
//! The translation engine is generic over these traits: production wires in
//! the Postgres repositories, tests wire in in-memory doubles. This keeps the
//! engine free of ambient database state.

use crate::{
    models::{CodeMapping, TerminologyEntry},
    Result,
};
use async_trait::async_trait;

/// Exact-match lookup and idempotent bulk write for code mappings.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Exact equality match on `source_code`.
    ///
    /// Known scope limitation inherited from the reference deployment: the
    /// source system is not part of the lookup key. The schema stores it, so
    /// the key can be widened later without reingestion.
    async fn lookup(&self, source_code: &str) -> Result<Option<CodeMapping>>;

    /// Insert-or-ignore on the `(source_code, target_code)` pair. First
    /// write wins; a duplicate write is a silent no-op, never an update.
    async fn upsert(&self, mapping: &CodeMapping) -> Result<()>;

    /// Batch [`Self::upsert`] in a single all-or-nothing transaction.
    /// Returns the number of rows actually inserted.
    async fn upsert_batch(&self, mappings: &[CodeMapping]) -> Result<u64>;

    /// All mappings, ordered by source code. Used by the ConceptMap builder.
    async fn list_all(&self) -> Result<Vec<CodeMapping>>;
}

/// Read and bulk-write access to source-vocabulary concepts.
#[async_trait]
pub trait TerminologyStore: Send + Sync {
    async fn get_by_code(&self, code: &str) -> Result<Option<TerminologyEntry>>;

    /// Case-insensitive substring search over display terms.
    async fn search_display(&self, term: &str, limit: i64) -> Result<Vec<TerminologyEntry>>;

    /// All entries, ordered by code. Used by the CodeSystem builder.
    async fn list_all(&self) -> Result<Vec<TerminologyEntry>>;

    /// Batch upsert in a single all-or-nothing transaction. Unlike mapping
    /// upserts, an existing `code` has its display/definition/category
    /// REPLACED by the incoming row.
    async fn upsert_batch(&self, entries: &[TerminologyEntry]) -> Result<u64>;
}

// Forwarding impls so services can borrow a store or share one behind Arc.

#[async_trait]
impl<'a, S: MappingStore + ?Sized> MappingStore for &'a S {
    async fn lookup(&self, source_code: &str) -> Result<Option<CodeMapping>> {
        (**self).lookup(source_code).await
    }

    async fn upsert(&self, mapping: &CodeMapping) -> Result<()> {
        (**self).upsert(mapping).await
    }

    async fn upsert_batch(&self, mappings: &[CodeMapping]) -> Result<u64> {
        (**self).upsert_batch(mappings).await
    }

    async fn list_all(&self) -> Result<Vec<CodeMapping>> {
        (**self).list_all().await
    }
}

#[async_trait]
impl<S: MappingStore + ?Sized + Send + Sync> MappingStore for std::sync::Arc<S> {
    async fn lookup(&self, source_code: &str) -> Result<Option<CodeMapping>> {
        (**self).lookup(source_code).await
    }

    async fn upsert(&self, mapping: &CodeMapping) -> Result<()> {
        (**self).upsert(mapping).await
    }

    async fn upsert_batch(&self, mappings: &[CodeMapping]) -> Result<u64> {
        (**self).upsert_batch(mappings).await
    }

    async fn list_all(&self) -> Result<Vec<CodeMapping>> {
        (**self).list_all().await
    }
}

#[async_trait]
impl<'a, S: TerminologyStore + ?Sized> TerminologyStore for &'a S {
    async fn get_by_code(&self, code: &str) -> Result<Option<TerminologyEntry>> {
        (**self).get_by_code(code).await
    }

    async fn search_display(&self, term: &str, limit: i64) -> Result<Vec<TerminologyEntry>> {
        (**self).search_display(term, limit).await
    }

    async fn list_all(&self) -> Result<Vec<TerminologyEntry>> {
        (**self).list_all().await
    }

    async fn upsert_batch(&self, entries: &[TerminologyEntry]) -> Result<u64> {
        (**self).upsert_batch(entries).await
    }
}

#[async_trait]
impl<S: TerminologyStore + ?Sized + Send + Sync> TerminologyStore for std::sync::Arc<S> {
    async fn get_by_code(&self, code: &str) -> Result<Option<TerminologyEntry>> {
        (**self).get_by_code(code).await
    }

    async fn search_display(&self, term: &str, limit: i64) -> Result<Vec<TerminologyEntry>> {
        (**self).search_display(term, limit).await
    }

    async fn list_all(&self) -> Result<Vec<TerminologyEntry>> {
        (**self).list_all().await
    }

    async fn upsert_batch(&self, entries: &[TerminologyEntry]) -> Result<u64> {
        (**self).upsert_batch(entries).await
    }
}
