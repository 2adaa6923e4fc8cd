//! Criteria Score Matrix - alternatives x criteria table of raw scores.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::AnalysisError;

/// Inclusive bounds of a criterion's score scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// Creates a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamps a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Returns true if the value lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Validated m alternatives x n criteria score table.
///
/// Rows follow `alternative_ids`, columns follow `criterion_ids`. Higher
/// scores are better on every criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaScoreMatrix {
    alternative_ids: Vec<String>,
    criterion_ids: Vec<String>,
    scores: Vec<Vec<f64>>,
    ranges: Vec<ScoreRange>,
}

impl CriteriaScoreMatrix {
    /// Creates a matrix from rows, deriving each column's range from the data.
    pub fn new(
        alternative_ids: Vec<impl Into<String>>,
        criterion_ids: Vec<impl Into<String>>,
        scores: Vec<Vec<f64>>,
    ) -> Result<Self, AnalysisError> {
        Self::with_ranges(alternative_ids, criterion_ids, scores, None)
    }

    /// Creates a matrix with optional declared per-column ranges.
    ///
    /// # Errors
    /// - No alternatives or no criteria
    /// - Duplicate identifiers
    /// - Row count or row length not matching the identifiers
    /// - Non-finite scores
    /// - Declared range inverted, not finite, or excluding observed data
    pub fn with_ranges(
        alternative_ids: Vec<impl Into<String>>,
        criterion_ids: Vec<impl Into<String>>,
        scores: Vec<Vec<f64>>,
        declared_ranges: Option<Vec<ScoreRange>>,
    ) -> Result<Self, AnalysisError> {
        let alternative_ids: Vec<String> = alternative_ids.into_iter().map(Into::into).collect();
        let criterion_ids: Vec<String> = criterion_ids.into_iter().map(Into::into).collect();

        if alternative_ids.is_empty() {
            return Err(AnalysisError::EmptyInput {
                what: "alternative",
            });
        }
        if criterion_ids.is_empty() {
            return Err(AnalysisError::EmptyInput { what: "criterion" });
        }
        ensure_unique("alternative", &alternative_ids)?;
        ensure_unique("criterion", &criterion_ids)?;

        if scores.len() != alternative_ids.len() {
            return Err(AnalysisError::dimension_mismatch(
                "score matrix rows",
                alternative_ids.len(),
                scores.len(),
            ));
        }

        for (alt_id, row) in alternative_ids.iter().zip(&scores) {
            if row.len() != criterion_ids.len() {
                return Err(AnalysisError::dimension_mismatch(
                    format!("score matrix columns for '{}'", alt_id),
                    criterion_ids.len(),
                    row.len(),
                ));
            }
            for (crit_id, value) in criterion_ids.iter().zip(row) {
                if !value.is_finite() {
                    return Err(AnalysisError::NonFiniteScore {
                        alternative_id: alt_id.clone(),
                        criterion_id: crit_id.clone(),
                    });
                }
            }
        }

        let observed = observed_ranges(&scores, criterion_ids.len());
        let ranges = match declared_ranges {
            None => observed,
            Some(declared) => {
                if declared.len() != criterion_ids.len() {
                    return Err(AnalysisError::dimension_mismatch(
                        "declared score ranges",
                        criterion_ids.len(),
                        declared.len(),
                    ));
                }
                for ((crit_id, range), seen) in criterion_ids.iter().zip(&declared).zip(&observed) {
                    check_declared_range(crit_id, range, seen)?;
                }
                declared
            }
        };

        Ok(Self {
            alternative_ids,
            criterion_ids,
            scores,
            ranges,
        })
    }

    /// Creates a builder for constructing a score matrix.
    pub fn builder() -> CriteriaScoreMatrixBuilder {
        CriteriaScoreMatrixBuilder::default()
    }

    /// Ordered alternative identifiers.
    pub fn alternative_ids(&self) -> &[String] {
        &self.alternative_ids
    }

    /// Ordered criterion identifiers.
    pub fn criterion_ids(&self) -> &[String] {
        &self.criterion_ids
    }

    /// Raw score rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.scores
    }

    /// Valid score range per criterion (declared, or observed min/max).
    pub fn ranges(&self) -> &[ScoreRange] {
        &self.ranges
    }

    /// Score of alternative `row` on criterion `column`.
    pub fn score(&self, row: usize, column: usize) -> f64 {
        self.scores[row][column]
    }

    /// Looks up a score by identifiers.
    pub fn get(&self, alternative_id: &str, criterion_id: &str) -> Option<f64> {
        let row = self.alternative_index(alternative_id)?;
        let column = self.criterion_ids.iter().position(|c| c == criterion_id)?;
        Some(self.scores[row][column])
    }

    /// Position of an alternative in input order.
    pub fn alternative_index(&self, alternative_id: &str) -> Option<usize> {
        self.alternative_ids.iter().position(|a| a == alternative_id)
    }

    /// Returns the number of alternatives.
    pub fn alternative_count(&self) -> usize {
        self.alternative_ids.len()
    }

    /// Returns the number of criteria.
    pub fn criterion_count(&self) -> usize {
        self.criterion_ids.len()
    }

    /// Returns a copy with the same identifiers and ranges but new scores.
    ///
    /// Callers guarantee the shape matches; used for perturbed replicas.
    pub(crate) fn with_scores(&self, scores: Vec<Vec<f64>>) -> Self {
        Self {
            alternative_ids: self.alternative_ids.clone(),
            criterion_ids: self.criterion_ids.clone(),
            scores,
            ranges: self.ranges.clone(),
        }
    }
}

fn ensure_unique(what: &'static str, ids: &[String]) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(AnalysisError::DuplicateIdentifier {
                what,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

fn observed_ranges(scores: &[Vec<f64>], columns: usize) -> Vec<ScoreRange> {
    (0..columns)
        .map(|k| {
            let (min, max) = scores.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                (lo.min(row[k]), hi.max(row[k]))
            });
            ScoreRange::new(min, max)
        })
        .collect()
}

fn check_declared_range(
    criterion_id: &str,
    declared: &ScoreRange,
    observed: &ScoreRange,
) -> Result<(), AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidScoreRange {
        criterion_id: criterion_id.to_string(),
        reason,
    };

    if !(declared.min.is_finite() && declared.max.is_finite()) || declared.min > declared.max {
        return Err(invalid(format!(
            "range [{}, {}] is not a finite interval",
            declared.min, declared.max
        )));
    }
    if !declared.contains(observed.min) || !declared.contains(observed.max) {
        return Err(invalid(format!(
            "observed scores [{}, {}] fall outside [{}, {}]",
            observed.min, observed.max, declared.min, declared.max
        )));
    }
    Ok(())
}

/// Builder for constructing CriteriaScoreMatrix instances.
#[derive(Debug, Default)]
pub struct CriteriaScoreMatrixBuilder {
    alternative_ids: Vec<String>,
    criterion_ids: Vec<String>,
    scores: Vec<Vec<f64>>,
    ranges: Option<Vec<ScoreRange>>,
}

impl CriteriaScoreMatrixBuilder {
    /// Sets the criteria.
    pub fn criteria(mut self, ids: Vec<impl Into<String>>) -> Self {
        self.criterion_ids = ids.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Adds an alternative with its scores in criterion order.
    pub fn row(mut self, alternative_id: impl Into<String>, scores: Vec<f64>) -> Self {
        self.alternative_ids.push(alternative_id.into());
        self.scores.push(scores);
        self
    }

    /// Declares the same score scale for every criterion.
    pub fn uniform_range(mut self, min: f64, max: f64) -> Self {
        self.ranges = Some(vec![ScoreRange::new(min, max); self.criterion_ids.len()]);
        self
    }

    /// Builds and validates the matrix.
    pub fn build(self) -> Result<CriteriaScoreMatrix, AnalysisError> {
        CriteriaScoreMatrix::with_ranges(
            self.alternative_ids,
            self.criterion_ids,
            self.scores,
            self.ranges,
        )
    }
}
