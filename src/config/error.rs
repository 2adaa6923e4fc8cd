//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Threshold '{0}' must lie within [0, 1]")]
    ThresholdOutOfRange(&'static str),

    #[error("Consistency ratio threshold must be positive")]
    InvalidConsistencyThreshold,

    #[error("Power iteration needs at least one iteration and a positive tolerance")]
    InvalidIterationBudget,

    #[error("Weight variation must lie within [0, 1)")]
    InvalidWeightVariation,

    #[error("Score uncertainty must be finite and non-negative")]
    InvalidScoreUncertainty,

    #[error("Sensitivity analysis needs at least one simulation")]
    ZeroSimulations,

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
