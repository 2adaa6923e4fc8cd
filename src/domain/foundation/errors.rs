//! Error and warning types for the analysis engines.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ValidationError;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Input structure errors
    InvalidComparison,
    DimensionMismatch,
    EmptyInput,
    DuplicateIdentifier,
    InvalidScore,
    InvalidWeights,

    // Judgment quality
    InconsistentJudgments,

    // Configuration
    InvalidConfig,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidComparison => "INVALID_COMPARISON",
            ErrorCode::DimensionMismatch => "DIMENSION_MISMATCH",
            ErrorCode::EmptyInput => "EMPTY_INPUT",
            ErrorCode::DuplicateIdentifier => "DUPLICATE_IDENTIFIER",
            ErrorCode::InvalidScore => "INVALID_SCORE",
            ErrorCode::InvalidWeights => "INVALID_WEIGHTS",
            ErrorCode::InconsistentJudgments => "INCONSISTENT_JUDGMENTS",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
        };
        write!(f, "{}", s)
    }
}

/// Errors raised at the engine boundary before any computation proceeds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid comparison {row} vs {column}: {reason}")]
    InvalidComparison {
        row: String,
        column: String,
        reason: String,
    },

    #[error("Comparison references unknown criterion '{criterion_id}'")]
    UnknownCriterion { criterion_id: String },

    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Analysis requires at least one {what}")]
    EmptyInput { what: &'static str },

    #[error("Duplicate {what} identifier '{id}'")]
    DuplicateIdentifier { what: &'static str, id: String },

    #[error("Score for {alternative_id}/{criterion_id} is not finite")]
    NonFiniteScore {
        alternative_id: String,
        criterion_id: String,
    },

    #[error("Invalid score range for '{criterion_id}': {reason}")]
    InvalidScoreRange { criterion_id: String, reason: String },

    #[error("Invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("Consistency ratio {consistency_ratio:.4} exceeds threshold {threshold:.4}")]
    InconsistentJudgments {
        consistency_ratio: f64,
        threshold: f64,
    },

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
}

impl AnalysisError {
    /// Creates an invalid comparison error for a criterion pair.
    pub fn invalid_comparison(
        row: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AnalysisError::InvalidComparison {
            row: row.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        AnalysisError::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Creates an invalid weights error.
    pub fn invalid_weights(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidWeights {
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::InvalidComparison { .. } | AnalysisError::UnknownCriterion { .. } => {
                ErrorCode::InvalidComparison
            }
            AnalysisError::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            AnalysisError::EmptyInput { .. } => ErrorCode::EmptyInput,
            AnalysisError::DuplicateIdentifier { .. } => ErrorCode::DuplicateIdentifier,
            AnalysisError::NonFiniteScore { .. } | AnalysisError::InvalidScoreRange { .. } => {
                ErrorCode::InvalidScore
            }
            AnalysisError::InvalidWeights { .. } => ErrorCode::InvalidWeights,
            AnalysisError::InconsistentJudgments { .. } => ErrorCode::InconsistentJudgments,
            AnalysisError::InvalidConfig(_) => ErrorCode::InvalidConfig,
        }
    }
}

/// Recoverable conditions reported on a result instead of being raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// Consistency ratio above the configured threshold.
    InconsistentJudgments {
        consistency_ratio: f64,
        threshold: f64,
    },
    /// Every alternative scores the same on this criterion; normalized to 0.5.
    DegenerateCriterion { criterion_id: String, value: f64 },
    /// A pairwise ratio above 9 was accepted as given.
    JudgmentOutsideSaatyScale {
        row: String,
        column: String,
        value: f64,
    },
    /// Power iteration stopped at its iteration budget.
    PowerIterationNotConverged { iterations: usize, delta: f64 },
}
