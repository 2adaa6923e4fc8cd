//! Analysis configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MCDA` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use mcda_engine::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Running {} simulations", config.sensitivity.n_simulations);
//! ```

mod ahp;
mod electre;
mod error;
mod logging;
mod sensitivity;

pub use ahp::{AhpConfig, PriorityMethod};
pub use electre::ElectreConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use sensitivity::SensitivityConfig;

use serde::{Deserialize, Serialize};

/// Root analysis configuration
///
/// Every section has defaults, so an empty environment yields the standard
/// MCDA parameters. Load using [`AnalysisConfig::load()`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// AHP weight elicitation (consistency policy, eigenvector method)
    #[serde(default)]
    pub ahp: AhpConfig,

    /// ELECTRE outranking thresholds
    #[serde(default)]
    pub electre: ElectreConfig,

    /// Monte Carlo sensitivity analysis
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Log output for the command-line collaborator
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnalysisConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MCDA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MCDA__ELECTRE__CONCORDANCE_THRESHOLD=0.6` -> `electre.concordance_threshold = 0.6`
    /// - `MCDA__SENSITIVITY__RNG_SEED=42` -> `sensitivity.rng_seed = Some(42)`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MCDA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section holding an invalid value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ahp.validate()?;
        self.electre.validate()?;
        self.sensitivity.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Returns a copy with a fixed sensitivity seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sensitivity.rng_seed = Some(seed);
        self
    }
}
