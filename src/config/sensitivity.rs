//! Monte Carlo sensitivity configuration

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Sensitivity analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Attach a weight-perturbation report to comprehensive analyses
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Also attach a score-perturbation report
    #[serde(default)]
    pub include_score_perturbation: bool,

    /// Number of simulations per stress test
    #[serde(default = "default_n_simulations")]
    pub n_simulations: usize,

    /// Half-width `v` of the uniform weight multiplier `1 + U(-v, v)`
    #[serde(default = "default_weight_variation")]
    pub weight_variation: f64,

    /// Standard deviation `u` of the relative score noise `N(0, u)`
    #[serde(default = "default_score_uncertainty")]
    pub score_uncertainty: f64,

    /// Seed for reproducible runs; drawn from entropy when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Spread simulations across the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_n_simulations() -> usize {
    1000
}

fn default_weight_variation() -> f64 {
    0.2
}

fn default_score_uncertainty() -> f64 {
    0.1
}

fn default_parallel() -> bool {
    true
}

impl SensitivityConfig {
    /// Returns a copy with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Returns a copy with a different simulation count.
    pub fn with_simulations(mut self, n_simulations: usize) -> Self {
        self.n_simulations = n_simulations;
        self
    }

    /// Validate sensitivity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.n_simulations == 0 {
            return Err(ValidationError::ZeroSimulations);
        }
        if !(0.0..1.0).contains(&self.weight_variation) {
            return Err(ValidationError::InvalidWeightVariation);
        }
        if !(self.score_uncertainty.is_finite() && self.score_uncertainty >= 0.0) {
            return Err(ValidationError::InvalidScoreUncertainty);
        }
        Ok(())
    }
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            include_score_perturbation: false,
            n_simulations: default_n_simulations(),
            weight_variation: default_weight_variation(),
            score_uncertainty: default_score_uncertainty(),
            rng_seed: None,
            parallel: default_parallel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_defaults() {
        let config = SensitivityConfig::default();
        assert!(config.enabled);
        assert_eq!(config.n_simulations, 1000);
        assert_eq!(config.weight_variation, 0.2);
        assert_eq!(config.score_uncertainty, 0.1);
        assert_eq!(config.rng_seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_simulations() {
        let config = SensitivityConfig::default().with_simulations(0);
        assert_eq!(config.validate(), Err(ValidationError::ZeroSimulations));
    }

    #[test]
    fn test_rejects_full_weight_variation() {
        let config = SensitivityConfig {
            weight_variation: 1.0,
            ..SensitivityConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWeightVariation));
    }

    #[test]
    fn test_zero_variation_is_valid() {
        let config = SensitivityConfig {
            weight_variation: 0.0,
            score_uncertainty: 0.0,
            ..SensitivityConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seed_deserializes() {
        let config: SensitivityConfig = serde_json::from_str(r#"{"rng_seed": 42}"#).unwrap();
        assert_eq!(config.rng_seed, Some(42));
        assert!(config.parallel);
    }
}
