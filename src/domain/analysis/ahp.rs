//! AHP Weight Engine - principal eigenvector weights and consistency diagnostics.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ComparisonMatrix, PairwiseComparisons};
use crate::config::{AhpConfig, PriorityMethod};
use crate::domain::foundation::{AnalysisError, AnalysisWarning, WeightVector};

/// Saaty random consistency index, indexed by n - 1.
pub const RANDOM_INDEX: [f64; 15] = [
    0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// Consistency indices below this are floating-point noise on a consistent matrix.
const CONSISTENCY_NOISE_FLOOR: f64 = 1e-10;

/// Random index for an n x n matrix. Sizes past the table reuse its last entry.
pub fn random_index(n: usize) -> f64 {
    match n {
        0 => 0.0,
        n if n <= RANDOM_INDEX.len() => RANDOM_INDEX[n - 1],
        _ => RANDOM_INDEX[RANDOM_INDEX.len() - 1],
    }
}

/// Weights and consistency diagnostics derived from a comparison matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpResult {
    pub weights: WeightVector,
    /// Principal eigenvalue estimate.
    pub lambda_max: f64,
    /// CI = (λmax - n) / (n - 1).
    pub consistency_index: f64,
    /// CR = CI / RI(n); 0 for n <= 2.
    pub consistency_ratio: f64,
    /// Power iterations used (0 for the geometric-mean method).
    pub iterations: usize,
    pub converged: bool,
    /// Non-fatal findings (inconsistency, scale, convergence).
    pub warnings: Vec<AnalysisWarning>,
}

impl AhpResult {
    /// Returns true if the consistency ratio is at or below `threshold`.
    pub fn is_consistent(&self, threshold: f64) -> bool {
        self.consistency_ratio <= threshold
    }
}

/// Eigenvector-based weight elicitation.
#[derive(Debug, Clone, Default)]
pub struct AhpWeightEngine {
    config: AhpConfig,
}

impl AhpWeightEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: AhpConfig) -> Self {
        Self { config }
    }

    /// Builds the comparison matrix from judgments and derives weights.
    pub fn weights_from_judgments(
        &self,
        criterion_ids: &[String],
        comparisons: &PairwiseComparisons,
    ) -> Result<AhpResult, AnalysisError> {
        let (matrix, matrix_warnings) = ComparisonMatrix::from_judgments(criterion_ids, comparisons)?;
        let mut result = self.compute(&matrix)?;
        let mut warnings = matrix_warnings;
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        Ok(result)
    }

    /// Derives weights and the consistency ratio from a comparison matrix.
    ///
    /// # Errors
    /// - `InconsistentJudgments` when strict mode is on and CR exceeds the threshold
    pub fn compute(&self, matrix: &ComparisonMatrix) -> Result<AhpResult, AnalysisError> {
        let n = matrix.size();
        if n == 0 {
            return Err(AnalysisError::EmptyInput { what: "criterion" });
        }

        let mut warnings = Vec::new();
        let (priorities, iterations, converged) = match self.config.method {
            PriorityMethod::PowerIteration => {
                let (v, iterations, delta) = self.power_iteration(matrix);
                let converged = delta <= self.config.tolerance;
                if !converged {
                    warn!(iterations, delta, "Power iteration did not converge");
                    warnings.push(AnalysisWarning::PowerIterationNotConverged { iterations, delta });
                }
                (v, iterations, converged)
            }
            PriorityMethod::GeometricMean => (geometric_mean_priorities(matrix), 0, true),
        };

        let weights = WeightVector::from_raw(priorities)?;
        let lambda_max = principal_eigenvalue(matrix, weights.as_slice());
        let (consistency_index, consistency_ratio) = consistency(lambda_max, n);

        debug!(
            criteria = n,
            lambda_max,
            consistency_ratio,
            iterations,
            "Derived AHP weights"
        );

        let threshold = self.config.consistency_ratio_threshold;
        if consistency_ratio > threshold {
            if self.config.strict_consistency {
                return Err(AnalysisError::InconsistentJudgments {
                    consistency_ratio,
                    threshold,
                });
            }
            warn!(consistency_ratio, threshold, "Pairwise judgments are inconsistent");
            warnings.push(AnalysisWarning::InconsistentJudgments {
                consistency_ratio,
                threshold,
            });
        }

        Ok(AhpResult {
            weights,
            lambda_max,
            consistency_index,
            consistency_ratio,
            iterations,
            converged,
            warnings,
        })
    }

    /// Returns (eigenvector, iterations, final L1 delta).
    fn power_iteration(&self, matrix: &ComparisonMatrix) -> (Vec<f64>, usize, f64) {
        let n = matrix.size();
        let mut v = vec![1.0 / n as f64; n];
        let mut delta = f64::INFINITY;

        for iter in 1..=self.config.max_iterations {
            let mut next = matrix.multiply(&v);
            let total: f64 = next.iter().sum();
            for x in next.iter_mut() {
                *x /= total;
            }

            delta = next.iter().zip(&v).map(|(a, b)| (a - b).abs()).sum();
            v = next;
            if delta <= self.config.tolerance {
                return (v, iter, delta);
            }
        }

        (v, self.config.max_iterations, delta)
    }
}

/// Normalized row geometric means.
fn geometric_mean_priorities(matrix: &ComparisonMatrix) -> Vec<f64> {
    let n = matrix.size() as f64;
    matrix
        .rows()
        .iter()
        .map(|row| (row.iter().map(|x| x.ln()).sum::<f64>() / n).exp())
        .collect()
}

/// λmax estimated as the mean of (M w)_i / w_i.
fn principal_eigenvalue(matrix: &ComparisonMatrix, weights: &[f64]) -> f64 {
    let product = matrix.multiply(weights);
    let n = weights.len() as f64;
    product
        .iter()
        .zip(weights)
        .map(|(mw, w)| mw / w)
        .sum::<f64>()
        / n
}

/// Returns (CI, CR). Matrices of size 1 or 2 are always consistent.
fn consistency(lambda_max: f64, n: usize) -> (f64, f64) {
    if n <= 2 {
        return (0.0, 0.0);
    }
    let ci = (lambda_max - n as f64) / (n as f64 - 1.0);
    if ci < CONSISTENCY_NOISE_FLOOR {
        return (0.0, 0.0);
    }
    (ci, ci / random_index(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn ratio_comparisons() -> PairwiseComparisons {
        PairwiseComparisons::new()
            .compare("A", "B", 2.0)
            .compare("B", "C", 2.0)
            .compare("A", "C", 4.0)
    }

    fn cyclic_comparisons() -> PairwiseComparisons {
        PairwiseComparisons::new()
            .compare("A", "B", 9.0)
            .compare("B", "C", 9.0)
            .compare("C", "A", 9.0)
    }

    #[test]
    fn random_index_table_lookup() {
        assert_eq!(random_index(1), 0.0);
        assert_eq!(random_index(2), 0.0);
        assert_eq!(random_index(3), 0.58);
        assert_eq!(random_index(10), 1.49);
        assert_eq!(random_index(40), 1.59);
    }

    #[test]
    fn recovers_true_ratio_vector() {
        let engine = AhpWeightEngine::default();
        let result = engine
            .weights_from_judgments(&criteria(&["A", "B", "C"]), &ratio_comparisons())
            .unwrap();

        let expected = [4.0 / 7.0, 2.0 / 7.0, 1.0 / 7.0];
        for (w, e) in result.weights.as_slice().iter().zip(expected) {
            assert!((w - e).abs() < 1e-3, "weight {} vs {}", w, e);
        }
        assert_eq!(result.consistency_ratio, 0.0);
        assert!(result.converged);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn geometric_mean_matches_on_consistent_matrix() {
        let engine = AhpWeightEngine::new(AhpConfig {
            method: PriorityMethod::GeometricMean,
            ..AhpConfig::default()
        });
        let result = engine
            .weights_from_judgments(&criteria(&["A", "B", "C"]), &ratio_comparisons())
            .unwrap();

        assert!((result.weights[0] - 4.0 / 7.0).abs() < 1e-9);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.consistency_ratio, 0.0);
    }

    #[test]
    fn weights_sum_to_one() {
        let engine = AhpWeightEngine::default();
        let comparisons = PairwiseComparisons::new()
            .compare("A", "B", 3.0)
            .compare("A", "C", 7.0)
            .compare("B", "D", 5.0)
            .compare("C", "D", 0.5);
        let result = engine
            .weights_from_judgments(&criteria(&["A", "B", "C", "D"]), &comparisons)
            .unwrap();
        assert!((result.weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_and_pair_are_always_consistent() {
        let engine = AhpWeightEngine::default();

        let single = engine
            .weights_from_judgments(&criteria(&["A"]), &PairwiseComparisons::new())
            .unwrap();
        assert_eq!(single.weights.as_slice(), &[1.0]);
        assert_eq!(single.consistency_ratio, 0.0);

        let pair = engine
            .weights_from_judgments(
                &criteria(&["A", "B"]),
                &PairwiseComparisons::new().compare("A", "B", 9.0),
            )
            .unwrap();
        assert_eq!(pair.consistency_ratio, 0.0);
        assert!((pair.weights[0] - 0.9).abs() < 1e-9);
    }

    #[test]
    fn cyclic_judgments_are_inconsistent() {
        let engine = AhpWeightEngine::default();
        let result = engine
            .weights_from_judgments(&criteria(&["A", "B", "C"]), &cyclic_comparisons())
            .unwrap();

        assert!(result.consistency_ratio > 0.10);
        assert!(!result.is_consistent(0.10));
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::InconsistentJudgments { .. })));
    }

    #[test]
    fn strict_mode_rejects_inconsistent_judgments() {
        let engine = AhpWeightEngine::new(AhpConfig::default().strict());
        let result = engine.weights_from_judgments(&criteria(&["A", "B", "C"]), &cyclic_comparisons());
        assert!(matches!(
            result,
            Err(AnalysisError::InconsistentJudgments { .. })
        ));
    }

    #[test]
    fn strict_mode_accepts_consistent_judgments() {
        let engine = AhpWeightEngine::new(AhpConfig::default().strict());
        assert!(engine
            .weights_from_judgments(&criteria(&["A", "B", "C"]), &ratio_comparisons())
            .is_ok());
    }

    #[test]
    fn lambda_max_equals_n_when_consistent() {
        let matrix =
            ComparisonMatrix::from_priorities(&criteria(&["A", "B", "C", "D"]), &[8.0, 4.0, 2.0, 1.0])
                .unwrap();
        let result = AhpWeightEngine::default().compute(&matrix).unwrap();
        assert!((result.lambda_max - 4.0).abs() < 1e-9);
    }

    #[test]
    fn exhausted_budget_reports_warning() {
        let engine = AhpWeightEngine::new(AhpConfig {
            max_iterations: 1,
            ..AhpConfig::default()
        });
        let comparisons = PairwiseComparisons::new()
            .compare("A", "B", 3.0)
            .compare("A", "C", 5.0)
            .compare("B", "C", 2.0);
        let result = engine
            .weights_from_judgments(&criteria(&["A", "B", "C"]), &comparisons)
            .unwrap();

        assert!(!result.converged);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::PowerIterationNotConverged { .. })));
    }
}
