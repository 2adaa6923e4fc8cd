//! AHP weight elicitation configuration

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// How the principal eigenvector of a comparison matrix is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityMethod {
    /// Repeated multiplication until the eigenvector stops moving
    #[default]
    PowerIteration,
    /// Normalized row geometric means (closed form)
    GeometricMean,
}

/// AHP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpConfig {
    /// Consistency ratio above which judgments are flagged
    #[serde(default = "default_consistency_ratio_threshold")]
    pub consistency_ratio_threshold: f64,

    /// Fail the analysis instead of warning when the threshold is exceeded
    #[serde(default)]
    pub strict_consistency: bool,

    /// Eigenvector method
    #[serde(default)]
    pub method: PriorityMethod,

    /// Power iteration budget
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// L1 convergence tolerance for power iteration
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_consistency_ratio_threshold() -> f64 {
    0.10
}

fn default_max_iterations() -> usize {
    1000
}

fn default_tolerance() -> f64 {
    1e-12
}

impl AhpConfig {
    /// Validate AHP configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.consistency_ratio_threshold.is_finite() && self.consistency_ratio_threshold > 0.0)
        {
            return Err(ValidationError::InvalidConsistencyThreshold);
        }
        if self.max_iterations == 0 || !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ValidationError::InvalidIterationBudget);
        }
        Ok(())
    }

    /// Returns a copy with strict consistency enabled.
    pub fn strict(mut self) -> Self {
        self.strict_consistency = true;
        self
    }
}

impl Default for AhpConfig {
    fn default() -> Self {
        Self {
            consistency_ratio_threshold: default_consistency_ratio_threshold(),
            strict_consistency: false,
            method: PriorityMethod::default(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}
