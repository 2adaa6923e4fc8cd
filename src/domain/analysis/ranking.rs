//! Ranking helpers - dense ranking with deterministic tie-breaks and rank correlation.

use std::cmp::Ordering;

use crate::domain::foundation::AnalysisError;

/// Scores closer than this are ties.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Ranks alternatives by descending score (1 = best).
///
/// Scores within [`TIE_TOLERANCE`] of each other tie, and ties keep input
/// order, so the result is always a permutation of 1..=m.
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let scores = snap_ties(scores);
    rank_by(scores.len(), |a, b| scores[b].total_cmp(&scores[a]))
}

/// Ranks by descending `primary`, ties by descending `secondary`, then input order.
pub fn rank_with_tiebreak(primary: &[f64], secondary: &[f64]) -> Vec<usize> {
    let primary = snap_ties(primary);
    let secondary = snap_ties(secondary);
    rank_by(primary.len(), |a, b| {
        primary[b]
            .total_cmp(&primary[a])
            .then_with(|| secondary[b].total_cmp(&secondary[a]))
    })
}

/// Replaces every value within `TIE_TOLERANCE` of a larger group leader by
/// that leader, so near-equal scores compare exactly equal.
fn snap_ties(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut snapped = values.to_vec();
    let mut leader: Option<f64> = None;
    for index in order {
        match leader {
            Some(top) if top - values[index] <= TIE_TOLERANCE => snapped[index] = top,
            _ => leader = Some(values[index]),
        }
    }
    snapped
}

fn rank_by(len: usize, compare: impl Fn(usize, usize) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    // sort_by is stable: equal keys stay in input order
    order.sort_by(|&a, &b| compare(a, b));

    let mut ranks = vec![0; len];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

/// Index of the alternative ranked first.
pub fn top_index(ranks: &[usize]) -> Option<usize> {
    ranks.iter().position(|&r| r == 1)
}

/// Spearman rank correlation between two rankings without ties.
///
/// Always within [-1, 1]; exactly 1.0 for identical rankings. Fewer than two
/// alternatives are trivially in agreement.
pub fn spearman_correlation(a: &[usize], b: &[usize]) -> Result<f64, AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::dimension_mismatch(
            "rank correlation",
            a.len(),
            b.len(),
        ));
    }

    let n = a.len();
    if n < 2 {
        return Ok(1.0);
    }

    let sum_sq: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u64;
            d * d
        })
        .sum();

    let n = n as f64;
    let rho = 1.0 - 6.0 * sum_sq as f64 / (n * (n * n - 1.0));
    Ok(rho.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_highest_score_first() {
        assert_eq!(rank_descending(&[0.5, 0.333, 0.722]), vec![2, 3, 1]);
    }

    #[test]
    fn ties_keep_input_order() {
        assert_eq!(rank_descending(&[1.0, 2.0, 1.0, 2.0]), vec![3, 1, 4, 2]);
    }

    #[test]
    fn rounding_noise_does_not_break_ties() {
        // 0.1 summed ten times vs 0.5 exactly
        let scores = [0.49999999999999994, 0.5, 0.0, 0.9999999999999999];
        assert_eq!(rank_descending(&scores), vec![2, 3, 4, 1]);
    }

    #[test]
    fn scores_beyond_tolerance_stay_ordered() {
        assert_eq!(rank_descending(&[0.5, 0.5 + 1e-6]), vec![2, 1]);
    }

    #[test]
    fn near_equal_secondary_falls_back_to_input_order() {
        let flows = [0.0, 0.0];
        let scores = [0.49999999999999994, 0.5];
        assert_eq!(rank_with_tiebreak(&flows, &scores), vec![1, 2]);
    }

    #[test]
    fn secondary_key_breaks_ties_before_input_order() {
        let flows = [1.0, 1.0, -2.0];
        let scores = [0.2, 0.9, 0.5];
        assert_eq!(rank_with_tiebreak(&flows, &scores), vec![2, 1, 3]);
    }

    #[test]
    fn top_index_finds_rank_one() {
        assert_eq!(top_index(&[2, 3, 1]), Some(2));
        assert_eq!(top_index(&[]), None);
    }

    #[test]
    fn identical_rankings_correlate_perfectly() {
        assert_eq!(spearman_correlation(&[1, 2, 3, 4], &[1, 2, 3, 4]).unwrap(), 1.0);
    }

    #[test]
    fn reversed_rankings_correlate_negatively() {
        assert_eq!(spearman_correlation(&[1, 2, 3], &[3, 2, 1]).unwrap(), -1.0);
    }

    #[test]
    fn single_alternative_is_trivial_agreement() {
        assert_eq!(spearman_correlation(&[1], &[1]).unwrap(), 1.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(spearman_correlation(&[1, 2], &[1]).is_err());
    }
}
