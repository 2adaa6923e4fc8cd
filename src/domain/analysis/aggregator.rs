//! Score Aggregator - min-max normalization and weighted-sum scoring.

use serde::{Deserialize, Serialize};

use super::CriteriaScoreMatrix;
use crate::domain::foundation::{AnalysisError, AnalysisWarning, WeightVector};

/// Normalized value assigned to every cell of a zero-variance column.
pub const DEGENERATE_NORMALIZED_VALUE: f64 = 0.5;

/// Score matrix with every column min-max scaled to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMatrix {
    values: Vec<Vec<f64>>,
    /// Column indices whose max equals their min.
    degenerate_columns: Vec<usize>,
}

impl NormalizedMatrix {
    /// Normalized value of alternative `row` on criterion `column`.
    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.values[row][column]
    }

    /// Normalized rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Columns that carried no variance.
    pub fn degenerate_columns(&self) -> &[usize] {
        &self.degenerate_columns
    }

    /// Largest max - min over all normalized columns (1 unless every column is degenerate).
    pub fn max_range(&self) -> f64 {
        let columns = self.values.first().map(|r| r.len()).unwrap_or(0);
        (0..columns)
            .map(|k| {
                let (lo, hi) = self
                    .values
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                        (lo.min(row[k]), hi.max(row[k]))
                    });
                hi - lo
            })
            .fold(0.0, f64::max)
    }
}

/// Weighted-sum scoring functions.
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Min-max normalizes every column of the observed scores.
    ///
    /// # Edge Cases
    /// - Zero-variance column: every value becomes 0.5
    /// - Single alternative: every column is zero-variance
    pub fn normalize(matrix: &CriteriaScoreMatrix) -> NormalizedMatrix {
        let rows = matrix.rows();
        let columns = matrix.criterion_count();
        let mut values = vec![vec![0.0; columns]; rows.len()];
        let mut degenerate_columns = Vec::new();

        for k in 0..columns {
            let (min, max) = rows
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                    (lo.min(row[k]), hi.max(row[k]))
                });
            let span = max - min;

            if span == 0.0 {
                degenerate_columns.push(k);
                for row in values.iter_mut() {
                    row[k] = DEGENERATE_NORMALIZED_VALUE;
                }
                continue;
            }

            for (out, row) in values.iter_mut().zip(rows) {
                out[k] = (row[k] - min) / span;
            }
        }

        NormalizedMatrix {
            values,
            degenerate_columns,
        }
    }

    /// Normalized weighted-sum score per alternative, in input order.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the weight count differs from the criterion count
    pub fn weighted_scores(
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
    ) -> Result<Vec<f64>, AnalysisError> {
        weights.ensure_len(matrix.criterion_count())?;
        let normalized = Self::normalize(matrix);
        Ok(Self::dot_rows(normalized.rows(), weights.as_slice()))
    }

    /// Weighted sum of the raw, unnormalized scores.
    pub fn raw_weighted_scores(
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
    ) -> Result<Vec<f64>, AnalysisError> {
        weights.ensure_len(matrix.criterion_count())?;
        Ok(Self::dot_rows(matrix.rows(), weights.as_slice()))
    }

    /// Warnings for zero-variance columns.
    pub fn degenerate_warnings(
        matrix: &CriteriaScoreMatrix,
        normalized: &NormalizedMatrix,
    ) -> Vec<AnalysisWarning> {
        normalized
            .degenerate_columns()
            .iter()
            .map(|&k| AnalysisWarning::DegenerateCriterion {
                criterion_id: matrix.criterion_ids()[k].clone(),
                value: matrix.score(0, k),
            })
            .collect()
    }

    pub(crate) fn dot_rows(rows: &[Vec<f64>], weights: &[f64]) -> Vec<f64> {
        rows.iter()
            .map(|row| row.iter().zip(weights).map(|(x, w)| x * w).sum())
            .collect()
    }
}
