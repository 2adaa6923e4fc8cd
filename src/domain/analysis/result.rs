//! Result records returned by the orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::SensitivityReport;
use crate::domain::foundation::AnalysisWarning;

/// Outcome of one comprehensive analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McdaResult {
    /// Normalized weighted-sum score per alternative.
    pub scores: BTreeMap<String, f64>,
    /// 1 = best; dense permutation of 1..=m, ties by input order.
    pub rankings: BTreeMap<String, usize>,
    /// Alternatives from best to worst.
    pub ranked_alternatives: Vec<String>,
    /// Weight per criterion.
    pub weights: BTreeMap<String, f64>,
    /// Present when weights came from pairwise judgments.
    pub consistency_ratio: Option<f64>,
    /// Weight-perturbation report.
    pub sensitivity: Option<SensitivityReport>,
    /// Score-perturbation report, when requested.
    pub score_sensitivity: Option<SensitivityReport>,
    pub warnings: Vec<AnalysisWarning>,
}

impl McdaResult {
    /// The top-ranked alternative.
    pub fn best(&self) -> Option<&str> {
        self.ranked_alternatives.first().map(String::as_str)
    }

    /// Rank of an alternative.
    pub fn rank_of(&self, alternative_id: &str) -> Option<usize> {
        self.rankings.get(alternative_id).copied()
    }

    /// Returns true if the consistency ratio exceeded its threshold.
    pub fn has_inconsistent_judgments(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::InconsistentJudgments { .. }))
    }
}

/// Ranking method compared by `compare_methods`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMethod {
    /// Weighted sum over min-max normalized scores.
    AhpWeighted,
    /// ELECTRE net flow.
    Electre,
    /// Weighted sum over raw scores.
    WeightedSum,
}

/// One method's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRanking {
    pub method: RankingMethod,
    pub rankings: BTreeMap<String, usize>,
    pub top: String,
}

/// Spearman correlation between two methods' rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankCorrelation {
    pub first: RankingMethod,
    pub second: RankingMethod,
    pub spearman: f64,
}

/// Side-by-side comparison of ranking methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub methods: Vec<MethodRanking>,
    pub correlations: Vec<RankCorrelation>,
    /// True when every method ranks the same alternative first.
    pub top_choice_agreement: bool,
}

impl MethodComparison {
    /// Correlation between two methods, in either order.
    pub fn correlation(&self, a: RankingMethod, b: RankingMethod) -> Option<f64> {
        self.correlations
            .iter()
            .find(|c| (c.first == a && c.second == b) || (c.first == b && c.second == a))
            .map(|c| c.spearman)
    }

    /// Ranking produced by one method.
    pub fn ranking(&self, method: RankingMethod) -> Option<&MethodRanking> {
        self.methods.iter().find(|m| m.method == method)
    }
}
