//! Weight vector value object (non-negative, sums to 1).

use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::AnalysisError;

/// Tolerance on the weight sum.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Normalized criterion weights, one per criterion in criterion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Creates a weight vector by normalizing raw non-negative values to sum 1.
    ///
    /// # Errors
    /// - Empty input
    /// - Any value negative or not finite
    /// - All values zero
    pub fn from_raw(values: Vec<f64>) -> Result<Self, AnalysisError> {
        if values.is_empty() {
            return Err(AnalysisError::EmptyInput { what: "weight" });
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(AnalysisError::invalid_weights(format!(
                "weights must be finite and non-negative, got {}",
                bad
            )));
        }

        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return Err(AnalysisError::invalid_weights("weights sum to zero"));
        }

        Ok(Self(values.into_iter().map(|v| v / total).collect()))
    }

    /// Equal weights over `n` criteria.
    pub fn equal(n: usize) -> Result<Self, AnalysisError> {
        Self::from_raw(vec![1.0; n])
    }

    /// Returns the weights as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the number of weights.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no weights.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the sum of the weights.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Fails unless the vector has exactly `expected` entries.
    pub fn ensure_len(&self, expected: usize) -> Result<(), AnalysisError> {
        if self.0.len() != expected {
            return Err(AnalysisError::dimension_mismatch(
                "weight vector",
                expected,
                self.0.len(),
            ));
        }
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = AnalysisError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_raw(values)
    }
}

impl From<WeightVector> for Vec<f64> {
    fn from(weights: WeightVector) -> Self {
        weights.0
    }
}

impl Index<usize> for WeightVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}
