//! Sensitivity Engine - Monte Carlo perturbation of weights and scores.
//!
//! Each simulation draws from its own `StdRng` seeded by the run seed and the
//! simulation index, and outcomes are accumulated in index order. A fixed
//! seed therefore reproduces a report bit for bit, sequential or parallel.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ranking::{rank_descending, top_index};
use super::{CriteriaScoreMatrix, ScoreAggregator};
use crate::config::SensitivityConfig;
use crate::domain::foundation::{AnalysisError, WeightVector};

/// Odd 64-bit constant spreading simulation indices across the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Which input a stress test perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerturbationKind {
    /// w_k * (1 + U(-v, v)), renormalized.
    Weights,
    /// x * (1 + N(0, u)), clipped to the criterion's score range.
    Scores,
}

/// Parameters a report was produced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationParameters {
    pub kind: PerturbationKind,
    pub n_simulations: usize,
    pub weight_variation: f64,
    pub score_uncertainty: f64,
    /// Run seed; pass it back as `rng_seed` to replay the report.
    pub seed: u64,
}

/// Empirical score distribution of one alternative across simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub alternative_id: String,
    pub baseline_score: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// 2.5th percentile.
    pub lower: f64,
    /// 97.5th percentile.
    pub upper: f64,
    pub mean_rank: f64,
    /// Fraction of simulations in which this alternative ranked first.
    pub top_rank_frequency: f64,
}

/// Robustness summary of one stress test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    /// Fraction of simulations whose top alternative matches the baseline's.
    pub ranking_stability: f64,
    pub baseline_top: String,
    pub intervals: Vec<ConfidenceInterval>,
    pub simulations_run: usize,
    pub parameters: PerturbationParameters,
}

impl SensitivityReport {
    /// Interval for one alternative.
    pub fn interval(&self, alternative_id: &str) -> Option<&ConfidenceInterval> {
        self.intervals
            .iter()
            .find(|i| i.alternative_id == alternative_id)
    }
}

/// Repeated-perturbation stress tests.
#[derive(Debug, Clone, Default)]
pub struct SensitivityEngine {
    config: SensitivityConfig,
}

impl SensitivityEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: SensitivityConfig) -> Self {
        Self { config }
    }

    /// Multiplies each weight by `1 + U(-v, v)`, renormalizes, and rescores.
    pub fn weight_perturbation(
        &self,
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
    ) -> Result<SensitivityReport, AnalysisError> {
        self.config.validate()?;
        weights.ensure_len(matrix.criterion_count())?;

        let normalized = ScoreAggregator::normalize(matrix);
        let variation = self.config.weight_variation;

        self.run(PerturbationKind::Weights, matrix, weights, |rng| {
            let perturbed: Vec<f64> = weights
                .as_slice()
                .iter()
                .map(|&w| {
                    if variation > 0.0 {
                        w * (1.0 + rng.gen_range(-variation..variation))
                    } else {
                        w
                    }
                })
                .collect();
            // variation < 1 keeps at least one weight positive
            let perturbed = WeightVector::from_raw(perturbed).unwrap_or_else(|_| weights.clone());
            ScoreAggregator::dot_rows(normalized.rows(), perturbed.as_slice())
        })
    }

    /// Adds relative Gaussian noise to every raw score, clips, and rescores.
    pub fn score_perturbation(
        &self,
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
    ) -> Result<SensitivityReport, AnalysisError> {
        self.config.validate()?;
        weights.ensure_len(matrix.criterion_count())?;

        let uncertainty = self.config.score_uncertainty;

        self.run(PerturbationKind::Scores, matrix, weights, |rng| {
            let replica = matrix.with_scores(perturb_scores(matrix, uncertainty, rng));
            let normalized = ScoreAggregator::normalize(&replica);
            ScoreAggregator::dot_rows(normalized.rows(), weights.as_slice())
        })
    }

    fn run<F>(
        &self,
        kind: PerturbationKind,
        matrix: &CriteriaScoreMatrix,
        weights: &WeightVector,
        simulate: F,
    ) -> Result<SensitivityReport, AnalysisError>
    where
        F: Fn(&mut StdRng) -> Vec<f64> + Sync,
    {
        let n_simulations = self.config.n_simulations;
        let seed = self.config.rng_seed.unwrap_or_else(rand::random);

        info!(?kind, n_simulations, seed, "Running sensitivity analysis");

        let baseline = ScoreAggregator::weighted_scores(matrix, weights)?;
        let baseline_ranks = rank_descending(&baseline);
        let baseline_top = top_index(&baseline_ranks).unwrap_or(0);

        let one = |index: usize| {
            let stream = seed.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE));
            let mut rng = StdRng::seed_from_u64(stream);
            let scores = simulate(&mut rng);
            let ranks = rank_descending(&scores);
            (scores, ranks)
        };

        let outcomes: Vec<(Vec<f64>, Vec<usize>)> = if self.config.parallel {
            (0..n_simulations).into_par_iter().map(one).collect()
        } else {
            (0..n_simulations).map(one).collect()
        };

        let stable = outcomes
            .iter()
            .filter(|(_, ranks)| top_index(ranks) == Some(baseline_top))
            .count();
        let ranking_stability = stable as f64 / n_simulations as f64;

        let intervals = matrix
            .alternative_ids()
            .iter()
            .enumerate()
            .map(|(i, alt_id)| {
                let mut samples: Vec<f64> = outcomes.iter().map(|(s, _)| s[i]).collect();
                let ranks: Vec<usize> = outcomes.iter().map(|(_, r)| r[i]).collect();
                let (mean, std_dev) = mean_and_std(&samples);
                samples.sort_by(f64::total_cmp);

                ConfidenceInterval {
                    alternative_id: alt_id.clone(),
                    baseline_score: baseline[i],
                    mean,
                    std_dev,
                    lower: percentile(&samples, 2.5),
                    upper: percentile(&samples, 97.5),
                    mean_rank: ranks.iter().sum::<usize>() as f64 / n_simulations as f64,
                    top_rank_frequency: ranks.iter().filter(|&&r| r == 1).count() as f64
                        / n_simulations as f64,
                }
            })
            .collect();

        debug!(?kind, ranking_stability, "Sensitivity analysis complete");

        Ok(SensitivityReport {
            ranking_stability,
            baseline_top: matrix.alternative_ids()[baseline_top].clone(),
            intervals,
            simulations_run: n_simulations,
            parameters: PerturbationParameters {
                kind,
                n_simulations,
                weight_variation: self.config.weight_variation,
                score_uncertainty: self.config.score_uncertainty,
                seed,
            },
        })
    }
}

/// Raw scores times `1 + u * N(0, 1)`, clipped to each criterion's range.
fn perturb_scores(matrix: &CriteriaScoreMatrix, uncertainty: f64, rng: &mut StdRng) -> Vec<Vec<f64>> {
    matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(matrix.ranges())
                .map(|(&x, range)| {
                    if uncertainty > 0.0 {
                        range.clamp(x * (1.0 + uncertainty * standard_normal(rng)))
                    } else {
                        x
                    }
                })
                .collect()
        })
        .collect()
}

/// Standard normal draw via the Box-Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    // 1 - [0, 1) keeps u1 away from zero
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Population mean and standard deviation.
fn mean_and_std(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Linear-interpolation percentile of sorted samples, `p` in [0, 100].
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let position = p / 100.0 * (len - 1) as f64;
            let lo = position.floor() as usize;
            let hi = position.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (position - lo as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_matrix() -> CriteriaScoreMatrix {
        CriteriaScoreMatrix::builder()
            .criteria(vec!["c1", "c2", "c3"])
            .row("A1", vec![5.0, 3.0, 4.0])
            .row("A2", vec![2.0, 5.0, 3.0])
            .row("A3", vec![4.0, 4.0, 5.0])
            .uniform_range(1.0, 5.0)
            .build()
            .unwrap()
    }

    fn config(seed: u64) -> SensitivityConfig {
        SensitivityConfig::default()
            .with_seed(seed)
            .with_simulations(200)
    }

    #[test]
    fn zero_weight_variation_is_perfectly_stable() {
        let engine = SensitivityEngine::new(SensitivityConfig {
            weight_variation: 0.0,
            ..config(1)
        });
        let weights = WeightVector::equal(3).unwrap();
        let report = engine.weight_perturbation(&scenario_matrix(), &weights).unwrap();

        assert_eq!(report.ranking_stability, 1.0);
        assert_eq!(report.baseline_top, "A3");
        let top = report.interval("A3").unwrap();
        assert!(top.std_dev < 1e-12);
        assert_eq!(top.top_rank_frequency, 1.0);
        assert_eq!(top.mean_rank, 1.0);
    }

    #[test]
    fn zero_score_uncertainty_is_perfectly_stable() {
        let engine = SensitivityEngine::new(SensitivityConfig {
            score_uncertainty: 0.0,
            ..config(2)
        });
        let weights = WeightVector::equal(3).unwrap();
        let report = engine.score_perturbation(&scenario_matrix(), &weights).unwrap();
        assert_eq!(report.ranking_stability, 1.0);
        assert_eq!(report.parameters.kind, PerturbationKind::Scores);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let weights = WeightVector::equal(3).unwrap();
        let first = SensitivityEngine::new(config(42))
            .weight_perturbation(&scenario_matrix(), &weights)
            .unwrap();
        let second = SensitivityEngine::new(config(42))
            .weight_perturbation(&scenario_matrix(), &weights)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let weights = WeightVector::equal(3).unwrap();
        let parallel = SensitivityEngine::new(config(9))
            .score_perturbation(&scenario_matrix(), &weights)
            .unwrap();
        let sequential = SensitivityEngine::new(SensitivityConfig {
            parallel: false,
            ..config(9)
        })
        .score_perturbation(&scenario_matrix(), &weights)
        .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn intervals_bracket_the_mean() {
        let weights = WeightVector::equal(3).unwrap();
        let report = SensitivityEngine::new(config(5))
            .score_perturbation(&scenario_matrix(), &weights)
            .unwrap();

        assert_eq!(report.simulations_run, 200);
        assert_eq!(report.intervals.len(), 3);
        for interval in &report.intervals {
            assert!(interval.lower <= interval.mean + 1e-12);
            assert!(interval.mean <= interval.upper + 1e-12);
            assert!(interval.std_dev >= 0.0);
            assert!((1.0..=3.0).contains(&interval.mean_rank));
        }
        let total_top: f64 = report.intervals.iter().map(|i| i.top_rank_frequency).sum();
        assert!((total_top - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&report.ranking_stability));
    }

    #[test]
    fn perturbed_weights_keep_scores_in_unit_interval() {
        let weights = WeightVector::equal(3).unwrap();
        let report = SensitivityEngine::new(config(11))
            .weight_perturbation(&scenario_matrix(), &weights)
            .unwrap();
        for interval in &report.intervals {
            assert!(interval.lower >= 0.0 && interval.upper <= 1.0);
        }
    }

    #[test]
    fn report_records_parameters() {
        let weights = WeightVector::equal(3).unwrap();
        let report = SensitivityEngine::new(config(3))
            .weight_perturbation(&scenario_matrix(), &weights)
            .unwrap();
        assert_eq!(report.parameters.seed, 3);
        assert_eq!(report.parameters.n_simulations, 200);
        assert_eq!(report.parameters.weight_variation, 0.2);
        assert_eq!(report.parameters.kind, PerturbationKind::Weights);
    }

    #[test]
    fn rejects_invalid_config() {
        let engine = SensitivityEngine::new(SensitivityConfig::default().with_simulations(0));
        let weights = WeightVector::equal(3).unwrap();
        let result = engine.weight_perturbation(&scenario_matrix(), &weights);
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn noisy_scores_stay_inside_declared_range() {
        let matrix = scenario_matrix();
        let mut rng = StdRng::seed_from_u64(77);
        let mut clipped_low = false;
        let mut clipped_high = false;

        for _ in 0..200 {
            for row in perturb_scores(&matrix, 5.0, &mut rng) {
                for x in row {
                    assert!((1.0..=5.0).contains(&x), "score {} escaped [1, 5]", x);
                    clipped_low |= x == 1.0;
                    clipped_high |= x == 5.0;
                }
            }
        }
        assert!(clipped_low && clipped_high);
    }

    #[test]
    fn noisy_scores_fall_back_to_observed_range() {
        let matrix = CriteriaScoreMatrix::new(
            vec!["A", "B"],
            vec!["c"],
            vec![vec![2.0], vec![8.0]],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            for row in perturb_scores(&matrix, 5.0, &mut rng) {
                assert!((2.0..=8.0).contains(&row[0]));
            }
        }
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&sorted, 0.0), 0.0);
        assert_eq!(percentile(&sorted, 50.0), 20.0);
        assert_eq!(percentile(&sorted, 100.0), 40.0);
        assert!((percentile(&sorted, 2.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mean_and_std_are_population_statistics() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
    }
}
