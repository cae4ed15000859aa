//! Fractional ranking.
//!
//! Ranks are 1-based and returned in input order. Values that compare exactly
//! equal share the average of the positions they jointly occupy, so a tie
//! group spanning sorted positions `i..j` (0-based, exclusive end) gets
//! `(i + 1 + j) / 2`. This is the "average" tie convention; min-rank and
//! ordinal conventions give different rank sums on tied data.
//!
//! Callers must pass finite values. The engine validates before ranking.
//!
//! statrs' `OrderStatistics::ranks(RankTieBreaker::Average)` computes the same
//! ranks, but it needs an owned, mutable `Data` copy of the column, and it
//! would turn statrs into a runtime dependency of the engine for one
//! function. statrs stays a dev-dependency and is the reference for these
//! ranks in the tests below.

use std::cmp::Ordering;

/// Ascending fractional ranks: the smallest value gets rank 1.
pub fn ascending_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Descending fractional ranks: the largest value gets rank 1.
///
/// Equivalent to `N + 1 - ascending_rank`, which keeps ties averaged.
pub fn descending_ranks(values: &[f64]) -> Vec<f64> {
    let top = (values.len() + 1) as f64;
    ascending_ranks(values)
        .into_iter()
        .map(|r| top - r)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

    #[test]
    fn test_ascending_distinct() {
        assert_eq!(ascending_ranks(&[30.0, 10.0, 20.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_descending_distinct() {
        assert_eq!(descending_ranks(&[30.0, 10.0, 20.0]), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_ties_share_average() {
        // Sorted: 1, 2, 2, 2, 5 -> the three 2s occupy positions 2..=4.
        let ranks = ascending_ranks(&[2.0, 5.0, 2.0, 1.0, 2.0]);
        assert_eq!(ranks, vec![3.0, 5.0, 3.0, 1.0, 3.0]);

        let desc = descending_ranks(&[2.0, 5.0, 2.0, 1.0, 2.0]);
        assert_eq!(desc, vec![3.0, 1.0, 3.0, 5.0, 3.0]);
    }

    #[test]
    fn test_all_tied() {
        let ranks = descending_ranks(&[4.0; 6]);
        assert!(ranks.iter().all(|&r| r == 3.5));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(ascending_ranks(&[]).is_empty());
        assert_eq!(descending_ranks(&[7.0]), vec![1.0]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let ranks = ascending_ranks(&[0.0, -0.0, -1.0]);
        assert_eq!(ranks, vec![2.5, 2.5, 1.0]);
    }

    #[test]
    fn test_rank_sum_invariant() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0];
        let n = values.len() as f64;
        let sum: f64 = descending_ranks(&values).iter().sum();
        assert!((sum - n * (n + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_descending_matches_statrs_on_heavy_ties() {
        let values: Vec<f64> = (0..40).map(|i| ((i * 7) % 5) as f64 - 2.0).collect();
        let n = values.len() as f64;
        let ours = descending_ranks(&values);
        let reference = Data::new(values).ranks(RankTieBreaker::Average);
        for (a, b) in ours.iter().zip(reference.iter()) {
            assert!((a - (n + 1.0 - b)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_matches_statrs_average_ranks() {
        let values = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0];
        let ours = ascending_ranks(&values);
        let mut data = Data::new(values);
        let reference = data.ranks(RankTieBreaker::Average);
        assert_eq!(ours.len(), reference.len());
        for (a, b) in ours.iter().zip(reference.iter()) {
            assert!((a - b).abs() < 1e-12, "ours={a}, statrs={b}");
        }
    }
}
