//! Engine configuration management.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Posting configuration.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Configuration for the ledger posting path.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Maximum attempts for a posting that keeps losing the optimistic
    /// concurrency race before `ConcurrencyConflict` is surfaced.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TRESOR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
