//! Mapping repository - database access for code mappings
//!
//! Owns all queries against the `code_mappings` table. Lookup is an exact
//! match on `source_code`; writes are insert-or-ignore on the
//! `(source_code, target_code)` pair (see `migrations/0001_init.sql`).

use crate::{
    db::traits::MappingStore,
    models::CodeMapping,
    Error, Result,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// Repository for code-mapping database operations
#[derive(Clone)]
pub struct MappingRepository {
    pool: PgPool,
}

impl MappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingStore for MappingRepository {
    async fn lookup(&self, source_code: &str) -> Result<Option<CodeMapping>> {
        let row = sqlx::query_as::<_, CodeMapping>(
            "SELECT source_system, source_code, target_system, target_code, equivalence
             FROM code_mappings
             WHERE source_code = $1
             LIMIT 1",
        )
        .bind(source_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row)
    }

    async fn upsert(&self, mapping: &CodeMapping) -> Result<()> {
        sqlx::query(
            "INSERT INTO code_mappings
                 (source_system, source_code, target_system, target_code, equivalence)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (source_code, target_code) DO NOTHING",
        )
        .bind(&mapping.source_system)
        .bind(&mapping.source_code)
        .bind(&mapping.target_system)
        .bind(&mapping.target_code)
        .bind(&mapping.equivalence)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn upsert_batch(&self, mappings: &[CodeMapping]) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut inserted = 0u64;

        for mapping in mappings {
            let result = sqlx::query(
                "INSERT INTO code_mappings
                     (source_system, source_code, target_system, target_code, equivalence)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (source_code, target_code) DO NOTHING",
            )
            .bind(&mapping.source_system)
            .bind(&mapping.source_code)
            .bind(&mapping.target_system)
            .bind(&mapping.target_code)
            .bind(&mapping.equivalence)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            inserted += result.rows_affected();
        }

        // Any failure above aborts the whole batch; partial writes are never
        // visible to readers.
        tx.commit().await.map_err(Error::Database)?;

        tracing::info!(
            total = mappings.len(),
            inserted,
            "Code mapping batch committed"
        );

        Ok(inserted)
    }

    async fn list_all(&self) -> Result<Vec<CodeMapping>> {
        let rows = sqlx::query_as::<_, CodeMapping>(
            "SELECT source_system, source_code, target_system, target_code, equivalence
             FROM code_mappings
             ORDER BY source_code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows)
    }
}
