//! CSV ingestion for NAMASTE morbidity exports
//!
//! Parses a delimited export into terminology entries and code mappings,
//! writing each as one all-or-nothing batch. The raw ICD-mapping cell goes
//! through the code normalizer, so cells like `"SR11 (AAA-1)"` resolve to a
//! mapping even when the export mixes up token order.
//!
//! After both batches commit, every entry's search text is registered with
//! the semantic engine. The vector index is a rebuildable cache, so a
//! registration failure is logged per row and does not roll back the
//! database batches.

use crate::{
    db::traits::{MappingStore, TerminologyStore},
    models::{CodeMapping, TerminologyEntry},
    Error, Result,
};
use async_trait::async_trait;
use bridge_namaste_codes::extract_mapping_codes;
use bridge_semantic_client::SemanticClient;
use serde::{Deserialize, Serialize};

/// Seam over the engine's administrative embedding registration.
#[async_trait]
pub trait EmbeddingRegistry: Send + Sync {
    async fn register(
        &self,
        id: &str,
        text: &str,
    ) -> std::result::Result<(), bridge_semantic_client::Error>;
}

#[async_trait]
impl EmbeddingRegistry for SemanticClient {
    async fn register(
        &self,
        id: &str,
        text: &str,
    ) -> std::result::Result<(), bridge_semantic_client::Error> {
        self.register_embedding(id, text).await
    }
}

#[async_trait]
impl<'a, E: EmbeddingRegistry + ?Sized> EmbeddingRegistry for &'a E {
    async fn register(
        &self,
        id: &str,
        text: &str,
    ) -> std::result::Result<(), bridge_semantic_client::Error> {
        (**self).register(id, text).await
    }
}

/// One row of a NAMASTE export. Column names vary across exports, hence the
/// aliases.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "namc_code", alias = "NAMC_CODE")]
    code: Option<String>,
    #[serde(alias = "term", alias = "namc_term", alias = "NAMC_TERM")]
    display: Option<String>,
    #[serde(default, alias = "long_definition", alias = "description")]
    definition: Option<String>,
    #[serde(default, alias = "broader_term")]
    category: Option<String>,
    #[serde(default, alias = "icd_mapping", alias = "icd_code", alias = "mapped_icd")]
    icd: Option<String>,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    pub entries_written: u64,
    pub mappings_written: u64,
    pub rows_skipped: usize,
    pub embeddings_registered: usize,
    pub embeddings_failed: usize,
}

pub struct IngestService<T, M, E> {
    terminology: T,
    mappings: M,
    embeddings: E,
    source_system: String,
    target_system: String,
}

impl<T, M, E> IngestService<T, M, E>
where
    T: TerminologyStore,
    M: MappingStore,
    E: EmbeddingRegistry,
{
    pub fn new(
        terminology: T,
        mappings: M,
        embeddings: E,
        source_system: String,
        target_system: String,
    ) -> Self {
        Self {
            terminology,
            mappings,
            embeddings,
            source_system,
            target_system,
        }
    }

    /// Ingest one CSV export.
    ///
    /// A row without a code or display term is skipped (display is required
    /// for a row to be materialized). Database writes are two all-or-nothing
    /// batches: entries first, then mappings.
    pub async fn ingest_csv(&self, data: &[u8]) -> Result<IngestSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data);

        let mut entries = Vec::new();
        let mut mappings = Vec::new();
        let mut skipped = 0usize;

        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| Error::Ingest(format!("malformed CSV row: {e}")))?;

            let (Some(code), Some(display)) = (
                row.code.filter(|c| !c.is_empty()),
                row.display.filter(|d| !d.is_empty()),
            ) else {
                skipped += 1;
                continue;
            };

            if let Some(raw) = row.icd.as_deref() {
                let extracted = extract_mapping_codes(Some(raw));
                if let Some(icd) = extracted.icd {
                    // Prefer the NAMASTE token found in the cell itself;
                    // the row code is the fallback identity.
                    let source_code = extracted.namaste.unwrap_or_else(|| code.clone());
                    mappings.push(CodeMapping::equivalent(
                        self.source_system.clone(),
                        source_code,
                        self.target_system.clone(),
                        icd,
                    ));
                }
            }

            entries.push(TerminologyEntry {
                code,
                display,
                definition: row.definition.filter(|d| !d.is_empty()),
                category: row.category.filter(|c| !c.is_empty()),
                system: self.source_system.clone(),
            });
        }

        if entries.is_empty() {
            return Err(Error::Ingest("no usable rows in upload".to_string()));
        }

        let entries_written = self.terminology.upsert_batch(&entries).await?;
        let mappings_written = self.mappings.upsert_batch(&mappings).await?;

        // Embedding registration is best-effort per row.
        let mut registered = 0usize;
        let mut failed = 0usize;
        for entry in &entries {
            let text = entry.definition.as_deref().unwrap_or(&entry.display);
            match self.embeddings.register(&entry.code, text).await {
                Ok(()) => registered += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(code = %entry.code, error = %e, "Embedding registration failed");
                }
            }
        }

        let summary = IngestSummary {
            entries_written,
            mappings_written,
            rows_skipped: skipped,
            embeddings_registered: registered,
            embeddings_failed: failed,
        };

        tracing::info!(
            entries = summary.entries_written,
            mappings = summary.mappings_written,
            skipped = summary.rows_skipped,
            "Ingestion complete"
        );

        Ok(summary)
    }
}
