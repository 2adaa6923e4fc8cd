//! ELECTRE Outranking Engine - concordance, discordance, and net-flow ranking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ranking::{rank_with_tiebreak, TIE_TOLERANCE};
use super::{CriteriaScoreMatrix, ScoreAggregator};
use crate::config::ElectreConfig;
use crate::domain::foundation::{AnalysisError, WeightVector};

/// Full outranking analysis for one score matrix.
///
/// Matrices are indexed `[a][b]` in alternative input order; diagonal
/// entries are zero / false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectreResult {
    pub alternative_ids: Vec<String>,
    pub concordance: Vec<Vec<f64>>,
    pub discordance: Vec<Vec<f64>>,
    pub outranks: Vec<Vec<bool>>,
    /// Outranking count minus being-outranked count.
    pub net_flows: Vec<i64>,
    /// Normalized weighted-sum score used to break net-flow ties.
    pub weighted_scores: Vec<f64>,
    /// 1 = best; ties by weighted score, then input order.
    pub rankings: Vec<usize>,
}

impl ElectreResult {
    /// Returns true if alternative `a` outranks alternative `b`.
    pub fn outranks(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.outranks[i][j],
            _ => false,
        }
    }

    /// Net flow of an alternative.
    pub fn net_flow(&self, alternative_id: &str) -> Option<i64> {
        self.index_of(alternative_id).map(|i| self.net_flows[i])
    }

    /// Alternatives that no other alternative outranks (the ELECTRE I kernel candidates).
    pub fn non_outranked(&self) -> Vec<&str> {
        let n = self.alternative_ids.len();
        (0..n)
            .filter(|&b| (0..n).all(|a| !self.outranks[a][b]))
            .map(|b| self.alternative_ids[b].as_str())
            .collect()
    }

    fn index_of(&self, alternative_id: &str) -> Option<usize> {
        self.alternative_ids.iter().position(|id| id == alternative_id)
    }
}

/// Outranking relation builder.
#[derive(Debug, Clone, Default)]
pub struct ElectreEngine {
    config: ElectreConfig,
}

impl ElectreEngine {
    /// Creates an engine with the given thresholds.
    pub fn new(config: ElectreConfig) -> Self {
        Self { config }
    }

    /// Runs the outranking analysis.
    ///
    /// # Algorithm
    /// - c(a,b) = Σ weight[k] over criteria where score(a,k) >= score(b,k)
    /// - d(a,b) = max normalized gap where b beats a, divided by the largest
    ///   normalized column range; 0 when b beats a nowhere
    /// - a outranks b iff c(a,b) >= concordance threshold and d(a,b) <= discordance threshold,
    ///   both within `TIE_TOLERANCE`
    /// - flow(a) = #outranked by a - #outranking a
    ///
    /// # Errors
    /// - `DimensionMismatch` if the weight count differs from the criterion count
    /// - `InvalidConfig` for thresholds outside [0, 1]
    pub fn analyze(
        &self,
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
    ) -> Result<ElectreResult, AnalysisError> {
        self.config.validate()?;
        weights.ensure_len(matrix.criterion_count())?;

        let m = matrix.alternative_count();
        let n = matrix.criterion_count();
        let normalized = ScoreAggregator::normalize(matrix);
        let max_range = normalized.max_range();

        let mut concordance = vec![vec![0.0; m]; m];
        let mut discordance = vec![vec![0.0; m]; m];
        let mut outranks = vec![vec![false; m]; m];

        for a in 0..m {
            for b in 0..m {
                if a == b {
                    continue;
                }

                let mut c = 0.0;
                let mut worst_gap: Option<f64> = None;
                for k in 0..n {
                    let sa = matrix.score(a, k);
                    let sb = matrix.score(b, k);
                    if sa >= sb {
                        c += weights[k];
                    } else {
                        let gap = normalized.value(b, k) - normalized.value(a, k);
                        worst_gap = Some(worst_gap.map_or(gap, |g| g.max(gap)));
                    }
                }

                let d = match worst_gap {
                    Some(gap) if max_range > 0.0 => gap / max_range,
                    _ => 0.0,
                };

                concordance[a][b] = c;
                discordance[a][b] = d;
                // summed weights carry rounding noise
                outranks[a][b] = c + TIE_TOLERANCE >= self.config.concordance_threshold
                    && d <= self.config.discordance_threshold + TIE_TOLERANCE;
            }
        }

        let net_flows: Vec<i64> = (0..m)
            .map(|a| {
                let wins = (0..m).filter(|&b| outranks[a][b]).count() as i64;
                let losses = (0..m).filter(|&b| outranks[b][a]).count() as i64;
                wins - losses
            })
            .collect();

        let weighted_scores = ScoreAggregator::dot_rows(normalized.rows(), weights.as_slice());
        let flows_f64: Vec<f64> = net_flows.iter().map(|&f| f as f64).collect();
        let rankings = rank_with_tiebreak(&flows_f64, &weighted_scores);

        debug!(
            alternatives = m,
            concordance_threshold = self.config.concordance_threshold,
            discordance_threshold = self.config.discordance_threshold,
            relations = outranks.iter().flatten().filter(|&&o| o).count(),
            "Built ELECTRE outranking relation"
        );

        Ok(ElectreResult {
            alternative_ids: matrix.alternative_ids().to_vec(),
            concordance,
            discordance,
            outranks,
            net_flows,
            weighted_scores,
            rankings,
        })
    }
}
