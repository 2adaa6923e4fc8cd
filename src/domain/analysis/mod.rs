//! Analysis Module - Pure engines for multi-criteria decision analysis.
//!
//! This module contains stateless engines that turn a score matrix and
//! stakeholder judgments into weights, rankings, and robustness estimates.
//!
//! # Components
//!
//! - `CriteriaScoreMatrix` - Validated alternatives x criteria score table
//! - `ComparisonMatrix` - Reciprocal matrix built from sparse pairwise judgments
//! - `AhpWeightEngine` - Principal eigenvector weights and consistency ratio
//! - `ScoreAggregator` - Min-max normalization and weighted-sum scoring
//! - `ElectreEngine` - Concordance/discordance outranking and net-flow ranking
//! - `SensitivityEngine` - Monte Carlo weight and score perturbation
//! - `McdaAnalyzer` - One-call comprehensive analysis and method comparison
//!
//! # Design Philosophy
//!
//! All computation is synchronous and free of I/O. The only randomness is
//! Monte Carlo sampling, driven by an explicit seed.

mod aggregator;
mod ahp;
mod electre;
mod orchestrator;
mod pairwise;
pub mod ranking;
mod result;
mod score_matrix;
mod sensitivity;

// Re-export all public types
pub use aggregator::{NormalizedMatrix, ScoreAggregator, DEGENERATE_NORMALIZED_VALUE};
pub use ahp::{random_index, AhpResult, AhpWeightEngine, RANDOM_INDEX};
pub use electre::{ElectreEngine, ElectreResult};
pub use orchestrator::{McdaAnalyzer, WeightSource};
pub use pairwise::{ComparisonMatrix, PairwiseComparisons, PairwiseJudgment, RECIPROCAL_TOLERANCE};
pub use result::{McdaResult, MethodComparison, MethodRanking, RankCorrelation, RankingMethod};
pub use score_matrix::{CriteriaScoreMatrix, CriteriaScoreMatrixBuilder, ScoreRange};
pub use sensitivity::{
    ConfidenceInterval, PerturbationKind, PerturbationParameters, SensitivityEngine,
    SensitivityReport,
};
