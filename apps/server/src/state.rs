//! Application state
//!
//! All long-lived collaborators are constructed once at startup and injected
//! from here: the Postgres pool, the repositories over it, the semantic
//! engine client and the translation engine. Nothing is process-global; the
//! pool closes when the state is dropped at shutdown.

use crate::{
    config::Config,
    db::{MappingRepository, TerminologyRepository},
    services::TranslationService,
};
use anyhow::Context;
use bridge_semantic_client::SemanticClient;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};

/// Concrete engine type wired with the production collaborators.
pub type Translator = TranslationService<MappingRepository, TerminologyRepository, SemanticClient>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub mappings: MappingRepository,
    pub terminology: TerminologyRepository,
    pub semantic: SemanticClient,
    pub translator: Arc<Translator>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.database.pool_timeout_seconds))
            .connect(&config.database.url)
            .await
            .context("Failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        let semantic = SemanticClient::new(
            config.semantic.base_url.clone(),
            Duration::from_secs(config.semantic.timeout_seconds),
        )
        .context("Failed to build semantic engine client")?;

        let mappings = MappingRepository::new(pool.clone());
        let terminology = TerminologyRepository::new(pool.clone());

        let translator = Arc::new(TranslationService::new(
            mappings.clone(),
            terminology.clone(),
            semantic.clone(),
            config.terminology.namaste_systems.clone(),
            config.semantic.top_k,
        ));

        Ok(Self {
            config: Arc::new(config),
            pool,
            mappings,
            terminology,
            semantic,
            translator,
        })
    }

    /// Close the pool explicitly on graceful shutdown.
    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}
