//! MCDA Orchestrator - composes weight elicitation, scoring, and stress testing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::ranking::{rank_descending, spearman_correlation, top_index};
use super::{
    AhpWeightEngine, CriteriaScoreMatrix, ElectreEngine, McdaResult, MethodComparison,
    MethodRanking, PairwiseComparisons, RankCorrelation, RankingMethod, ScoreAggregator,
    SensitivityEngine,
};
use crate::config::AnalysisConfig;
use crate::domain::foundation::{AnalysisError, WeightVector};

/// Where criterion weights come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Stakeholder judgments, turned into weights by AHP.
    Pairwise(PairwiseComparisons),
    /// Weights supplied directly by the caller.
    Direct(WeightVector),
}

/// Entry point for complete analyses.
#[derive(Debug, Clone)]
pub struct McdaAnalyzer {
    config: AnalysisConfig,
}

impl McdaAnalyzer {
    /// Creates an analyzer after validating the configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs weights -> scores -> rankings -> sensitivity in one call.
    ///
    /// # Errors
    /// - Structural input errors (`InvalidComparison`, `DimensionMismatch`, ...)
    /// - `InconsistentJudgments` only in strict consistency mode
    pub fn comprehensive_analysis(
        &self,
        matrix: &CriteriaScoreMatrix,
        source: &WeightSource,
    ) -> Result<McdaResult, AnalysisError> {
        info!(
            alternatives = matrix.alternative_count(),
            criteria = matrix.criterion_count(),
            "Starting comprehensive analysis"
        );

        let mut warnings = Vec::new();
        let (weights, consistency_ratio) = match source {
            WeightSource::Pairwise(comparisons) => {
                let ahp = AhpWeightEngine::new(self.config.ahp.clone())
                    .weights_from_judgments(matrix.criterion_ids(), comparisons)?;
                warnings.extend(ahp.warnings);
                (ahp.weights, Some(ahp.consistency_ratio))
            }
            WeightSource::Direct(weights) => {
                weights.ensure_len(matrix.criterion_count())?;
                (weights.clone(), None)
            }
        };

        let normalized = ScoreAggregator::normalize(matrix);
        warnings.extend(ScoreAggregator::degenerate_warnings(matrix, &normalized));
        let scores = ScoreAggregator::weighted_scores(matrix, &weights)?;
        let ranks = rank_descending(&scores);

        let sensitivity_engine = SensitivityEngine::new(self.config.sensitivity.clone());
        let sensitivity = if self.config.sensitivity.enabled {
            Some(sensitivity_engine.weight_perturbation(matrix, &weights)?)
        } else {
            None
        };
        let score_sensitivity = if self.config.sensitivity.include_score_perturbation {
            Some(sensitivity_engine.score_perturbation(matrix, &weights)?)
        } else {
            None
        };

        let alternative_ids = matrix.alternative_ids();
        let mut ranked_alternatives = alternative_ids.to_vec();
        ranked_alternatives.sort_by_key(|id| {
            matrix
                .alternative_index(id)
                .map(|i| ranks[i])
                .unwrap_or(usize::MAX)
        });

        debug!(
            best = ranked_alternatives.first().map(String::as_str).unwrap_or(""),
            consistency_ratio = consistency_ratio.unwrap_or(0.0),
            warnings = warnings.len(),
            "Comprehensive analysis complete"
        );

        Ok(McdaResult {
            scores: zip_ids(alternative_ids, scores.iter().copied()),
            rankings: zip_ids(alternative_ids, ranks.iter().copied()),
            ranked_alternatives,
            weights: zip_ids(matrix.criterion_ids(), weights.as_slice().iter().copied()),
            consistency_ratio,
            sensitivity,
            score_sensitivity,
            warnings,
        })
    }

    /// Ranks with normalized weighted sum, ELECTRE net flow, and raw weighted
    /// sum, and reports pairwise Spearman correlations between them.
    pub fn compare_methods(
        &self,
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
    ) -> Result<MethodComparison, AnalysisError> {
        let ahp_ranks = rank_descending(&ScoreAggregator::weighted_scores(matrix, weights)?);
        let electre_ranks = ElectreEngine::new(self.config.electre.clone())
            .analyze(matrix, weights)?
            .rankings;
        let sum_ranks = rank_descending(&ScoreAggregator::raw_weighted_scores(matrix, weights)?);

        let ranked = [
            (RankingMethod::AhpWeighted, &ahp_ranks),
            (RankingMethod::Electre, &electre_ranks),
            (RankingMethod::WeightedSum, &sum_ranks),
        ];

        let mut correlations = Vec::new();
        for (i, (first, a)) in ranked.iter().enumerate() {
            for (second, b) in ranked.iter().skip(i + 1) {
                correlations.push(RankCorrelation {
                    first: *first,
                    second: *second,
                    spearman: spearman_correlation(a, b)?,
                });
            }
        }

        let alternative_ids = matrix.alternative_ids();
        let methods: Vec<MethodRanking> = ranked
            .iter()
            .map(|(method, ranks)| MethodRanking {
                method: *method,
                rankings: zip_ids(alternative_ids, ranks.iter().copied()),
                top: top_index(ranks)
                    .map(|i| alternative_ids[i].clone())
                    .unwrap_or_default(),
            })
            .collect();

        let top_choice_agreement = methods.windows(2).all(|w| w[0].top == w[1].top);

        debug!(top_choice_agreement, "Compared ranking methods");

        Ok(MethodComparison {
            methods,
            correlations,
            top_choice_agreement,
        })
    }
}

fn zip_ids<T>(ids: &[String], values: impl Iterator<Item = T>) -> BTreeMap<String, T> {
    ids.iter().cloned().zip(values).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AnalysisWarning;

    fn scenario_matrix() -> CriteriaScoreMatrix {
        CriteriaScoreMatrix::builder()
            .criteria(vec!["c1", "c2", "c3"])
            .row("A1", vec![5.0, 3.0, 4.0])
            .row("A2", vec![2.0, 5.0, 3.0])
            .row("A3", vec![4.0, 4.0, 5.0])
            .build()
            .unwrap()
    }

    fn analyzer() -> McdaAnalyzer {
        let mut config = AnalysisConfig::default().with_seed(17);
        config.sensitivity.n_simulations = 100;
        McdaAnalyzer::new(config).unwrap()
    }

    #[test]
    fn direct_weights_skip_consistency() {
        let source = WeightSource::Direct(WeightVector::equal(3).unwrap());
        let result = analyzer()
            .comprehensive_analysis(&scenario_matrix(), &source)
            .unwrap();

        assert_eq!(result.consistency_ratio, None);
        assert_eq!(result.best(), Some("A3"));
        assert_eq!(result.rank_of("A1"), Some(2));
        assert_eq!(result.rank_of("A2"), Some(3));
        assert!((result.scores["A3"] - 0.722).abs() < 1e-3);
        assert!(result.sensitivity.is_some());
        assert!(result.score_sensitivity.is_none());
    }

    #[test]
    fn equal_judgments_give_equal_weights() {
        let source = WeightSource::Pairwise(PairwiseComparisons::new());
        let result = analyzer()
            .comprehensive_analysis(&scenario_matrix(), &source)
            .unwrap();

        assert_eq!(result.consistency_ratio, Some(0.0));
        for w in result.weights.values() {
            assert!((w - 1.0 / 3.0).abs() < 1e-9);
        }
        assert_eq!(result.ranked_alternatives, vec!["A3", "A1", "A2"]);
    }

    #[test]
    fn inconsistent_judgments_warn_by_default() {
        let comparisons = PairwiseComparisons::new()
            .compare("c1", "c2", 9.0)
            .compare("c2", "c3", 9.0)
            .compare("c3", "c1", 9.0);
        let result = analyzer()
            .comprehensive_analysis(&scenario_matrix(), &WeightSource::Pairwise(comparisons))
            .unwrap();

        assert!(result.consistency_ratio.unwrap() > 0.10);
        assert!(result.has_inconsistent_judgments());
    }

    #[test]
    fn strict_mode_fails_on_inconsistency() {
        let mut config = AnalysisConfig::default();
        config.ahp.strict_consistency = true;
        let analyzer = McdaAnalyzer::new(config).unwrap();
        let comparisons = PairwiseComparisons::new()
            .compare("c1", "c2", 9.0)
            .compare("c2", "c3", 9.0)
            .compare("c3", "c1", 9.0);

        let result =
            analyzer.comprehensive_analysis(&scenario_matrix(), &WeightSource::Pairwise(comparisons));
        assert!(matches!(
            result,
            Err(AnalysisError::InconsistentJudgments { .. })
        ));
    }

    #[test]
    fn degenerate_column_is_reported_not_raised() {
        let matrix = CriteriaScoreMatrix::new(
            vec!["X", "Y"],
            vec!["flat", "varied"],
            vec![vec![3.0, 1.0], vec![3.0, 4.0]],
        )
        .unwrap();
        let source = WeightSource::Direct(WeightVector::equal(2).unwrap());
        let result = analyzer().comprehensive_analysis(&matrix, &source).unwrap();

        assert_eq!(result.best(), Some("Y"));
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::DegenerateCriterion { .. })));
    }

    #[test]
    fn direct_weight_mismatch_is_rejected() {
        let source = WeightSource::Direct(WeightVector::equal(2).unwrap());
        let result = analyzer().comprehensive_analysis(&scenario_matrix(), &source);
        assert!(matches!(result, Err(AnalysisError::DimensionMismatch { .. })));
    }

    #[test]
    fn unknown_criterion_in_judgments_is_rejected() {
        let comparisons = PairwiseComparisons::new().compare("c1", "speed", 3.0);
        let result = analyzer()
            .comprehensive_analysis(&scenario_matrix(), &WeightSource::Pairwise(comparisons));
        assert!(matches!(result, Err(AnalysisError::UnknownCriterion { .. })));
    }

    #[test]
    fn score_sensitivity_attached_on_request() {
        let mut config = AnalysisConfig::default().with_seed(3);
        config.sensitivity.n_simulations = 50;
        config.sensitivity.include_score_perturbation = true;
        config.sensitivity.enabled = false;
        let analyzer = McdaAnalyzer::new(config).unwrap();

        let source = WeightSource::Direct(WeightVector::equal(3).unwrap());
        let result = analyzer
            .comprehensive_analysis(&scenario_matrix(), &source)
            .unwrap();
        assert!(result.sensitivity.is_none());
        assert_eq!(result.score_sensitivity.unwrap().simulations_run, 50);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = AnalysisConfig::default();
        config.electre.concordance_threshold = -0.1;
        assert!(matches!(
            McdaAnalyzer::new(config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn compare_methods_reports_three_correlations() {
        let weights = WeightVector::equal(3).unwrap();
        let comparison = analyzer()
            .compare_methods(&scenario_matrix(), &weights)
            .unwrap();

        assert_eq!(comparison.methods.len(), 3);
        assert_eq!(comparison.correlations.len(), 3);
        for c in &comparison.correlations {
            assert!((-1.0..=1.0).contains(&c.spearman));
        }
        let ahp = comparison.ranking(RankingMethod::AhpWeighted).unwrap();
        assert_eq!(ahp.top, "A3");
    }

    #[test]
    fn compare_methods_agree_under_dominance() {
        let matrix = CriteriaScoreMatrix::new(
            vec!["best", "middle", "worst"],
            vec!["c1", "c2"],
            vec![vec![5.0, 5.0], vec![3.0, 3.0], vec![1.0, 1.0]],
        )
        .unwrap();
        let weights = WeightVector::equal(2).unwrap();
        let comparison = analyzer().compare_methods(&matrix, &weights).unwrap();

        assert!(comparison.top_choice_agreement);
        for c in &comparison.correlations {
            assert_eq!(c.spearman, 1.0);
        }
    }
}
