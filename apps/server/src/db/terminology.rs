//! Terminology repository - database access for source-vocabulary concepts
//!
//! Owns all queries against the `terminology_entries` table. In contrast to
//! `code_mappings`, upserts here REPLACE the non-key columns of an existing
//! row: re-ingesting a revised export updates displays and definitions.

use crate::{
    db::traits::TerminologyStore,
    models::TerminologyEntry,
    Error, Result,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// Repository for terminology-entry database operations
#[derive(Clone)]
pub struct TerminologyRepository {
    pool: PgPool,
}

impl TerminologyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TerminologyStore for TerminologyRepository {
    async fn get_by_code(&self, code: &str) -> Result<Option<TerminologyEntry>> {
        let row = sqlx::query_as::<_, TerminologyEntry>(
            "SELECT code, display, definition, category, system
             FROM terminology_entries
             WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row)
    }

    async fn search_display(&self, term: &str, limit: i64) -> Result<Vec<TerminologyEntry>> {
        let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
        let rows = sqlx::query_as::<_, TerminologyEntry>(
            "SELECT code, display, definition, category, system
             FROM terminology_entries
             WHERE display ILIKE $1
             ORDER BY display
             LIMIT $2",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<TerminologyEntry>> {
        let rows = sqlx::query_as::<_, TerminologyEntry>(
            "SELECT code, display, definition, category, system
             FROM terminology_entries
             ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows)
    }

    async fn upsert_batch(&self, entries: &[TerminologyEntry]) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut written = 0u64;

        for entry in entries {
            let result = sqlx::query(
                "INSERT INTO terminology_entries (code, display, definition, category, system)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (code) DO UPDATE
                 SET display = EXCLUDED.display,
                     definition = EXCLUDED.definition,
                     category = EXCLUDED.category,
                     system = EXCLUDED.system",
            )
            .bind(&entry.code)
            .bind(&entry.display)
            .bind(&entry.definition)
            .bind(&entry.category)
            .bind(&entry.system)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            written += result.rows_affected();
        }

        tx.commit().await.map_err(Error::Database)?;

        tracing::info!(total = entries.len(), written, "Terminology batch committed");

        Ok(written)
    }
}
