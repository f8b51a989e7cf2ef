//! Configuration for the bridge server
//!
//! Layered: built-in defaults, then an optional file (`BRIDGE_CONFIG` path or
//! `config/default`), then `BRIDGE_`-prefixed environment variables with `__`
//! as the section separator (`BRIDGE_DATABASE__URL`, ...). A `.env` file is
//! honored for local development.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;

/// Canonical ICD-11 MMS system URI, the fixed target of every mapping.
pub const ICD11_SYSTEM: &str = "http://id.who.int/icd/release/11/mms";

/// System URIs recognized as NAMASTE source vocabularies out of the box.
pub const DEFAULT_NAMASTE_SYSTEMS: [&str; 3] = [
    "https://ayush.gov.in/fhir/CodeSystem/namaste-ayurveda",
    "https://ayush.gov.in/fhir/CodeSystem/namaste-siddha",
    "https://ayush.gov.in/fhir/CodeSystem/namaste-unani",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub semantic: SemanticConfig,
    pub terminology: TerminologyConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SemanticConfig {
    /// Base URL of the external embedding engine.
    pub base_url: String,
    /// Per-request timeout; a timeout surfaces as a 502 to the caller.
    pub timeout_seconds: u64,
    /// Candidates requested per semantic search.
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TerminologyConfig {
    /// System URIs that select the deterministic translation stage.
    pub namaste_systems: Vec<String>,
    /// Target system recorded on ingested mappings.
    pub icd_system: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub enabled: bool,
    /// HS256 shared secret. Required when `enabled`.
    pub secret: String,
    /// Paths exempt from the bearer gate even when auth is enabled.
    pub public_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // Local development convenience; absent .env is fine.
        dotenvy::dotenv().ok();

        let config_file =
            std::env::var("BRIDGE_CONFIG").unwrap_or_else(|_| "config/default".to_string());

        let default_systems: Vec<String> = DEFAULT_NAMASTE_SYSTEMS
            .iter()
            .map(|s| s.to_string())
            .collect();

        ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.max_request_body_size", 10 * 1024 * 1024)?
            .set_default("server.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "")?
            .set_default("database.pool_max_size", 10)?
            .set_default("database.pool_timeout_seconds", 30)?
            .set_default("semantic.base_url", "")?
            .set_default("semantic.timeout_seconds", 5)?
            .set_default("semantic.top_k", 3)?
            .set_default("terminology.namaste_systems", default_systems)?
            .set_default("terminology.icd_system", ICD11_SYSTEM)?
            .set_default("auth.enabled", false)?
            .set_default("auth.secret", "")?
            .set_default("auth.public_paths", Vec::<String>::new())?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name(&config_file).required(false))
            .add_source(Environment::with_prefix("BRIDGE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Reject configurations that would only fail later at first use.
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("database.url must be set (BRIDGE_DATABASE__URL)".to_string());
        }
        if self.semantic.base_url.is_empty() {
            return Err("semantic.base_url must be set (BRIDGE_SEMANTIC__BASE_URL)".to_string());
        }
        if self.semantic.top_k == 0 {
            return Err("semantic.top_k must be at least 1".to_string());
        }
        if self.terminology.namaste_systems.is_empty() {
            return Err("terminology.namaste_systems must not be empty".to_string());
        }
        if self.auth.enabled && self.auth.secret.is_empty() {
            return Err("auth.secret must be set when auth is enabled".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port).parse()?;
        Ok(addr)
    }
}
