//! Logging initialization for the bridge server
//!
//! Sets up `tracing` with an `EnvFilter` built from configuration; `RUST_LOG`
//! always takes precedence so operators can raise verbosity without a config
//! change. Output is JSON or human-readable per config.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer()).try_init()?;
    }

    Ok(())
}

fn default_directives(level: &str) -> String {
    // Keep driver-level chatter down unless explicitly requested.
    format!("{level},sqlx=warn,hyper=warn,reqwest=warn")
}
