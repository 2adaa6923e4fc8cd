//! Logging configuration

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Log output configuration for the command-line collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Validate the filter directive
    pub fn validate(&self) -> Result<(), ValidationError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidLogLevel(self.level.clone()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_accepts_module_directives() {
        let config = LoggingConfig {
            level: "mcda_engine=debug,warn".to_string(),
            json: true,
        };
        assert!(config.validate().is_ok());
    }
}
