//! Pairwise comparisons and the reciprocal comparison matrix built from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::foundation::{AnalysisError, AnalysisWarning, Intensity};

/// One stakeholder judgment: how much more important `row` is than `column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseJudgment {
    pub row: String,
    pub column: String,
    pub value: f64,
}

impl PairwiseJudgment {
    /// Creates a new judgment.
    pub fn new(row: impl Into<String>, column: impl Into<String>, value: f64) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
            value,
        }
    }
}

/// Sparse set of pairwise judgments keyed by ordered criterion pair.
///
/// Later judgments on the same ordered pair replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairwiseComparisons {
    judgments: Vec<PairwiseJudgment>,
}

impl PairwiseComparisons {
    /// Creates an empty set of comparisons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `row` is `value` times as important as `column`.
    pub fn compare(mut self, row: impl Into<String>, column: impl Into<String>, value: f64) -> Self {
        self.judgments.push(PairwiseJudgment::new(row, column, value));
        self
    }

    /// Records a judgment using a verbal anchor of the Saaty scale.
    pub fn prefer(
        self,
        row: impl Into<String>,
        column: impl Into<String>,
        intensity: Intensity,
    ) -> Self {
        self.compare(row, column, intensity.ratio())
    }

    /// Judgments in insertion order.
    pub fn judgments(&self) -> &[PairwiseJudgment] {
        &self.judgments
    }

    /// Returns the number of recorded judgments.
    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    /// Returns true if no judgments were recorded.
    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }
}

/// Tolerance on `m[i][j] * m[j][i] == 1` for matrices supplied whole.
pub const RECIPROCAL_TOLERANCE: f64 = 1e-9;

/// Complete n x n positive reciprocal matrix.
///
/// Invariants: `m[i][i] == 1` and `m[i][j] * m[j][i] == 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComparisonMatrix")]
pub struct ComparisonMatrix {
    criterion_ids: Vec<String>,
    values: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawComparisonMatrix {
    criterion_ids: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl TryFrom<RawComparisonMatrix> for ComparisonMatrix {
    type Error = AnalysisError;

    fn try_from(raw: RawComparisonMatrix) -> Result<Self, Self::Error> {
        Self::from_values(raw.criterion_ids, raw.values)
    }
}

impl ComparisonMatrix {
    /// Builds the reciprocal matrix from sparse judgments.
    ///
    /// # Algorithm
    /// For each unordered pair (a, b) with a before b in criterion order:
    /// - (a, b) given: use it, set (b, a) = 1 / value
    /// - only (b, a) given: invert it for (a, b)
    /// - neither given: 1 (indifference)
    ///
    /// # Errors
    /// - Value non-positive or not finite
    /// - Self-comparison other than 1
    /// - Unknown criterion
    pub fn from_judgments(
        criterion_ids: &[String],
        comparisons: &PairwiseComparisons,
    ) -> Result<(Self, Vec<AnalysisWarning>), AnalysisError> {
        let n = criterion_ids.len();
        if n == 0 {
            return Err(AnalysisError::EmptyInput { what: "criterion" });
        }

        let index: HashMap<&str, usize> = criterion_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut given: HashMap<(usize, usize), f64> = HashMap::new();
        let mut warnings = Vec::new();

        for judgment in comparisons.judgments() {
            let i = lookup(&index, &judgment.row)?;
            let j = lookup(&index, &judgment.column)?;
            let value = judgment.value;

            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::invalid_comparison(
                    &judgment.row,
                    &judgment.column,
                    format!("value must be positive and finite, got {}", value),
                ));
            }

            if i == j {
                if (value - 1.0).abs() > f64::EPSILON {
                    return Err(AnalysisError::invalid_comparison(
                        &judgment.row,
                        &judgment.column,
                        format!("a criterion compared with itself must be 1, got {}", value),
                    ));
                }
                continue;
            }

            if !Intensity::is_on_scale(value) {
                warn!(
                    row = %judgment.row,
                    column = %judgment.column,
                    value,
                    "Judgment outside the Saaty 1-9 scale"
                );
                warnings.push(AnalysisWarning::JudgmentOutsideSaatyScale {
                    row: judgment.row.clone(),
                    column: judgment.column.clone(),
                    value,
                });
            }

            given.insert((i, j), value);
        }

        let mut values = vec![vec![1.0; n]; n];
        let mut defaulted = 0usize;

        for i in 0..n {
            for j in (i + 1)..n {
                let forward = match (given.get(&(i, j)), given.get(&(j, i))) {
                    (Some(&v), _) => v,
                    (None, Some(&v)) => 1.0 / v,
                    (None, None) => {
                        defaulted += 1;
                        1.0
                    }
                };
                values[i][j] = forward;
                values[j][i] = 1.0 / forward;
            }
        }

        debug!(
            criteria = n,
            judgments = comparisons.len(),
            defaulted_pairs = defaulted,
            "Built pairwise comparison matrix"
        );

        Ok((
            Self {
                criterion_ids: criterion_ids.to_vec(),
                values,
            },
            warnings,
        ))
    }

    /// Builds a perfectly consistent matrix from a ratio vector: `m[i][j] = w[i] / w[j]`.
    pub fn from_priorities(
        criterion_ids: &[String],
        priorities: &[f64],
    ) -> Result<Self, AnalysisError> {
        if criterion_ids.len() != priorities.len() {
            return Err(AnalysisError::dimension_mismatch(
                "priority vector",
                criterion_ids.len(),
                priorities.len(),
            ));
        }
        if priorities.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(AnalysisError::invalid_weights(
                "priorities must be positive and finite",
            ));
        }

        let values = priorities
            .iter()
            .map(|wi| priorities.iter().map(|wj| wi / wj).collect())
            .collect();

        Ok(Self {
            criterion_ids: criterion_ids.to_vec(),
            values,
        })
    }

    /// Accepts a complete matrix after checking every invariant.
    ///
    /// # Errors
    /// - `DimensionMismatch` unless the matrix is n x n for n criteria
    /// - `InvalidComparison` for a non-positive or non-finite entry, a
    ///   diagonal other than 1, or a pair that is not reciprocal
    pub fn from_values(
        criterion_ids: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, AnalysisError> {
        let n = criterion_ids.len();
        if n == 0 {
            return Err(AnalysisError::EmptyInput { what: "criterion" });
        }
        if values.len() != n {
            return Err(AnalysisError::dimension_mismatch(
                "comparison matrix rows",
                n,
                values.len(),
            ));
        }
        for row in &values {
            if row.len() != n {
                return Err(AnalysisError::dimension_mismatch(
                    "comparison matrix columns",
                    n,
                    row.len(),
                ));
            }
        }

        for i in 0..n {
            for j in 0..n {
                let value = values[i][j];
                let (row, column) = (&criterion_ids[i], &criterion_ids[j]);
                if !value.is_finite() || value <= 0.0 {
                    return Err(AnalysisError::invalid_comparison(
                        row,
                        column,
                        format!("value must be positive and finite, got {}", value),
                    ));
                }
                if i == j && (value - 1.0).abs() > RECIPROCAL_TOLERANCE {
                    return Err(AnalysisError::invalid_comparison(
                        row,
                        column,
                        format!("a criterion compared with itself must be 1, got {}", value),
                    ));
                }
                if (value * values[j][i] - 1.0).abs() > RECIPROCAL_TOLERANCE {
                    return Err(AnalysisError::invalid_comparison(
                        row,
                        column,
                        format!("{} is not the reciprocal of {}", value, values[j][i]),
                    ));
                }
            }
        }

        Ok(Self {
            criterion_ids,
            values,
        })
    }

    /// Ordered criterion identifiers labelling rows and columns.
    pub fn criterion_ids(&self) -> &[String] {
        &self.criterion_ids
    }

    /// Matrix dimension n.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Entry at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Matrix rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Matrix-vector product `M v`.
    pub fn multiply(&self, v: &[f64]) -> Vec<f64> {
        self.values
            .iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Returns true if the reciprocal invariants hold within `tolerance`.
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (self.values[i][i] - 1.0).abs() <= tolerance
                && (0..n).all(|j| (self.values[i][j] * self.values[j][i] - 1.0).abs() <= tolerance)
        })
    }
}

fn lookup(index: &HashMap<&str, usize>, criterion_id: &str) -> Result<usize, AnalysisError> {
    index
        .get(criterion_id)
        .copied()
        .ok_or_else(|| AnalysisError::UnknownCriterion {
            criterion_id: criterion_id.to_string(),
        })
}
