//! ELECTRE outranking configuration

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Outranking thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectreConfig {
    /// Minimum concordance for `a` to outrank `b`
    #[serde(default = "default_concordance_threshold")]
    pub concordance_threshold: f64,

    /// Maximum discordance for `a` to outrank `b`
    #[serde(default = "default_discordance_threshold")]
    pub discordance_threshold: f64,
}

fn default_concordance_threshold() -> f64 {
    0.75
}

fn default_discordance_threshold() -> f64 {
    0.25
}

impl ElectreConfig {
    /// Creates a config with explicit thresholds.
    pub fn new(concordance_threshold: f64, discordance_threshold: f64) -> Self {
        Self {
            concordance_threshold,
            discordance_threshold,
        }
    }

    /// Validate ELECTRE thresholds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.concordance_threshold) {
            return Err(ValidationError::ThresholdOutOfRange("concordance_threshold"));
        }
        if !(0.0..=1.0).contains(&self.discordance_threshold) {
            return Err(ValidationError::ThresholdOutOfRange("discordance_threshold"));
        }
        Ok(())
    }
}

impl Default for ElectreConfig {
    fn default() -> Self {
        Self::new(
            default_concordance_threshold(),
            default_discordance_threshold(),
        )
    }
}
