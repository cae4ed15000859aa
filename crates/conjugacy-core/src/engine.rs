//! Monotonic conjugacy engine.
//!
//! Given N paired observations:
//!
//! 1. order the pairs by ascending x (ties resolved by [`TieBreak`]),
//! 2. rank the y values in that order, descending, with average tie-ranks,
//! 3. take `p = floor(N / 3)` and sum the ranks of the first p (R1) and last p
//!    (R2) positions; the middle `N - 2p` are ignored,
//! 4. report `delta = R1 - R2`, `sigma = (N + 0.5) * sqrt(p / 6)` and
//!    `conjugacy = delta / (p * (N - p))`.
//!
//! Perfectly decreasing y gives conjugacy -1, perfectly increasing y gives +1,
//! for every N >= 3.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Axis, ConjugacyError};
use crate::rank::descending_ranks;

/// Smallest sample the method accepts.
pub const MIN_OBSERVATIONS: usize = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single (x, y) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

impl Observation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Observation {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// How pairs with equal x are ordered before ranking.
///
/// The choice decides which y values land in the leading and trailing thirds
/// when a tie straddles a partition boundary, so it changes results on such
/// inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Stable sort: equal x keep their input order.
    #[default]
    InputOrder,
    /// Equal x are ordered by ascending y. Output no longer depends on row order.
    AscendingY,
}

impl TieBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            TieBreak::InputOrder => "input-order",
            TieBreak::AscendingY => "ascending-y",
        }
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input-order" | "input_order" | "stable" => Ok(TieBreak::InputOrder),
            "ascending-y" | "ascending_y" | "y" => Ok(TieBreak::AscendingY),
            other => Err(format!(
                "unknown tie-break '{other}' (expected input-order or ascending-y)"
            )),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tie_break: TieBreak,
}

/// Result of one conjugacy computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conjugacy {
    /// Number of observations.
    pub n: usize,
    /// Size of each extreme group, `floor(n / 3)`.
    pub partition_size: usize,
    /// R1: rank sum of the leading third (smallest x).
    pub leading_rank_sum: f64,
    /// R2: rank sum of the trailing third (largest x).
    pub trailing_rank_sum: f64,
    /// `R1 - R2`.
    pub delta: f64,
    /// Fixed scale `(n + 0.5) * sqrt(p / 6)`; depends only on n and p.
    pub sigma: f64,
    /// `delta / (p * (n - p))`.
    pub conjugacy: f64,
}

impl Conjugacy {
    /// `(delta, sigma, conjugacy)`, the three numbers the output sink writes.
    pub fn triple(&self) -> (f64, f64, f64) {
        (self.delta, self.sigma, self.conjugacy)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// `floor(n / 3)`.
pub fn partition_size(n: usize) -> usize {
    n / 3
}

/// Stateless engine bound to a configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConjugacyEngine {
    config: EngineConfig,
}

impl ConjugacyEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Compute the statistic for `pairs`. Pure; the input is not modified.
    pub fn compute(&self, pairs: &[Observation]) -> Result<Conjugacy, ConjugacyError> {
        let n = pairs.len();
        let p = partition_size(n);
        if n < MIN_OBSERVATIONS || p == 0 || n < 2 * p {
            return Err(ConjugacyError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: n,
            });
        }
        check_finite(pairs)?;

        let y_sorted = self.y_in_x_order(pairs);
        let ranks = descending_ranks(&y_sorted);

        let r1: f64 = ranks[..p].iter().sum();
        let r2: f64 = ranks[n - p..].iter().sum();
        let delta = r1 - r2;
        let sigma = (n as f64 + 0.5) * (p as f64 / 6.0).sqrt();
        let conjugacy = delta / (p * (n - p)) as f64;

        log::debug!("conjugacy: n={n} p={p} R1={r1} R2={r2} delta={delta}");

        Ok(Conjugacy {
            n,
            partition_size: p,
            leading_rank_sum: r1,
            trailing_rank_sum: r2,
            delta,
            sigma,
            conjugacy,
        })
    }

    /// y values reordered by ascending x.
    fn y_in_x_order(&self, pairs: &[Observation]) -> Vec<f64> {
        let mut sorted = pairs.to_vec();
        match self.config.tie_break {
            // `sort_by` is stable, so equal x keep their input order.
            TieBreak::InputOrder => sorted.sort_by(|a, b| cmp_f64(a.x, b.x)),
            TieBreak::AscendingY => {
                sorted.sort_by(|a, b| cmp_f64(a.x, b.x).then_with(|| cmp_f64(a.y, b.y)))
            }
        }
        sorted.into_iter().map(|o| o.y).collect()
    }
}

/// Compute with the default configuration (stable input-order tie-break).
pub fn compute(pairs: &[Observation]) -> Result<Conjugacy, ConjugacyError> {
    ConjugacyEngine::default().compute(pairs)
}

fn check_finite(pairs: &[Observation]) -> Result<(), ConjugacyError> {
    for (row, o) in pairs.iter().enumerate() {
        if !o.x.is_finite() {
            return Err(ConjugacyError::NonFinite { row, axis: Axis::X });
        }
        if !o.y.is_finite() {
            return Err(ConjugacyError::NonFinite { row, axis: Axis::Y });
        }
    }
    Ok(())
}

// Values are finite by the time we sort, so `partial_cmp` never fails.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(x: &[f64], y: &[f64]) -> Vec<Observation> {
        x.iter()
            .zip(y.iter())
            .map(|(&x, &y)| Observation::new(x, y))
            .collect()
    }

    fn seq(range: std::ops::RangeInclusive<i32>) -> Vec<f64> {
        range.map(f64::from).collect()
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    #[test]
    fn test_too_few_observations() {
        for n in 0..3 {
            let data = pairs(&vec![1.0; n], &vec![1.0; n]);
            assert_eq!(
                compute(&data),
                Err(ConjugacyError::InsufficientData { needed: 3, got: n })
            );
        }
    }

    #[test]
    fn test_three_is_enough() {
        let r = compute(&pairs(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0])).unwrap();
        assert_eq!(r.partition_size, 1);
        assert_eq!(r.delta, -2.0);
        assert_eq!(r.conjugacy, -1.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let data = pairs(&[1.0, 2.0, f64::NAN], &[1.0, 2.0, 3.0]);
        assert_eq!(
            compute(&data),
            Err(ConjugacyError::NonFinite {
                row: 2,
                axis: Axis::X
            })
        );

        let data = pairs(&[1.0, 2.0, 3.0], &[1.0, f64::INFINITY, 3.0]);
        assert_eq!(
            compute(&data),
            Err(ConjugacyError::NonFinite {
                row: 1,
                axis: Axis::Y
            })
        );
    }

    #[test]
    fn test_partition_size() {
        assert_eq!(partition_size(2), 0);
        assert_eq!(partition_size(3), 1);
        assert_eq!(partition_size(8), 2);
        assert_eq!(partition_size(9), 3);
        assert_eq!(partition_size(10), 3);
    }

    // -----------------------------------------------------------------------
    // Reference values
    // -----------------------------------------------------------------------

    #[test]
    fn test_nine_decreasing() {
        let r = compute(&pairs(&seq(1..=9), &seq(1..=9).into_iter().rev().collect::<Vec<_>>()))
            .unwrap();
        assert_eq!(r.partition_size, 3);
        assert_eq!(r.leading_rank_sum, 6.0);
        assert_eq!(r.trailing_rank_sum, 24.0);
        assert_eq!(r.delta, -18.0);
        assert!((r.sigma - 9.5 * 0.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(r.conjugacy, -1.0);
    }

    #[test]
    fn test_nine_increasing() {
        let r = compute(&pairs(&seq(1..=9), &seq(1..=9))).unwrap();
        assert_eq!(r.leading_rank_sum, 24.0);
        assert_eq!(r.trailing_rank_sum, 6.0);
        assert_eq!(r.delta, 18.0);
        assert_eq!(r.conjugacy, 1.0);
    }

    #[test]
    fn test_six_hand_computed() {
        // y decreasing: descending ranks in x order are 1..=6, p = 2.
        // R1 = 1 + 2 = 3, R2 = 5 + 6 = 11, delta = -8, p(N-p) = 8.
        let r = compute(&pairs(&seq(1..=6), &[60.0, 50.0, 40.0, 30.0, 20.0, 10.0])).unwrap();
        assert_eq!(r.delta, -8.0);
        assert_eq!(r.conjugacy, -1.0);
        assert!((r.sigma - 6.5 * (2.0_f64 / 6.0).sqrt()).abs() < 1e-12);

        let r = compute(&pairs(&seq(1..=6), &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0])).unwrap();
        assert_eq!(r.delta, 8.0);
        assert_eq!(r.conjugacy, 1.0);
    }

    #[test]
    fn test_monotone_extremes_for_every_n() {
        for n in 3..40 {
            let x = seq(1..=n);
            let up = compute(&pairs(&x, &x)).unwrap();
            let down: Vec<f64> = x.iter().map(|v| -v).collect();
            let down = compute(&pairs(&x, &down)).unwrap();
            assert!((up.conjugacy - 1.0).abs() < 1e-12, "n={n}");
            assert!((down.conjugacy + 1.0).abs() < 1e-12, "n={n}");
        }
    }

    #[test]
    fn test_middle_third_ignored() {
        // N = 7, p = 2: positions 2..5 are excluded, so shuffling them is a no-op.
        let x = seq(1..=7);
        let a = compute(&pairs(&x, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])).unwrap();
        let b = compute(&pairs(&x, &[1.0, 2.0, 5.0, 3.0, 4.0, 6.0, 7.0])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constant_y_is_zero() {
        let r = compute(&pairs(&seq(1..=10), &[5.0; 10])).unwrap();
        assert_eq!(r.delta, 0.0);
        assert_eq!(r.conjugacy, 0.0);
    }

    #[test]
    fn test_sigma_independent_of_values() {
        let x = seq(1..=12);
        let a = compute(&pairs(&x, &x)).unwrap();
        let b = compute(&pairs(&x, &[3.0; 12])).unwrap();
        assert_eq!(a.sigma, b.sigma);
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_x() {
        let sorted = compute(&pairs(&seq(1..=6), &seq(1..=6))).unwrap();
        let shuffled = compute(&pairs(
            &[4.0, 1.0, 6.0, 2.0, 5.0, 3.0],
            &[4.0, 1.0, 6.0, 2.0, 5.0, 3.0],
        ))
        .unwrap();
        assert_eq!(sorted, shuffled);
    }

    // -----------------------------------------------------------------------
    // Tie-break on x
    // -----------------------------------------------------------------------

    #[test]
    fn test_input_order_tie_break_is_stable() {
        // Tie fully inside the trailing third (p = 2): row order cannot matter.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 5.0];
        let a = compute(&pairs(&x, &[1.0, 2.0, 3.0, 4.0, 10.0, 0.0])).unwrap();
        let b = compute(&pairs(&x, &[1.0, 2.0, 3.0, 4.0, 0.0, 10.0])).unwrap();
        assert_eq!(a, b);

        // Tie straddling the boundary: x=2 appears at positions 1 and 2 (p = 2).
        let x = [1.0, 2.0, 2.0, 3.0, 4.0, 5.0];
        let first = compute(&pairs(&x, &[6.0, 1.0, 5.0, 4.0, 3.0, 2.0])).unwrap();
        let swapped = compute(&pairs(&x, &[6.0, 5.0, 1.0, 4.0, 3.0, 2.0])).unwrap();
        // Descending ranks: 6->1, 5->2, 4->3, 3->4, 2->5, 1->6.
        // Input order keeps y=1 at position 1 in `first`, y=5 in `swapped`.
        assert_eq!(first.leading_rank_sum, 1.0 + 6.0);
        assert_eq!(swapped.leading_rank_sum, 1.0 + 2.0);
    }

    #[test]
    fn test_ascending_y_tie_break_ignores_row_order() {
        let engine = ConjugacyEngine::new(EngineConfig {
            tie_break: TieBreak::AscendingY,
        });
        let x = [1.0, 2.0, 2.0, 3.0, 4.0, 5.0];
        let first = engine
            .compute(&pairs(&x, &[6.0, 1.0, 5.0, 4.0, 3.0, 2.0]))
            .unwrap();
        let swapped = engine
            .compute(&pairs(&x, &[6.0, 5.0, 1.0, 4.0, 3.0, 2.0]))
            .unwrap();
        assert_eq!(first, swapped);
        // y=1 sorts ahead of y=5 within x=2.
        assert_eq!(first.leading_rank_sum, 1.0 + 6.0);
    }

    #[test]
    fn test_tie_break_parse() {
        assert_eq!("input-order".parse::<TieBreak>(), Ok(TieBreak::InputOrder));
        assert_eq!("ascending_y".parse::<TieBreak>(), Ok(TieBreak::AscendingY));
        assert!("random".parse::<TieBreak>().is_err());
        assert_eq!(TieBreak::default(), TieBreak::InputOrder);
    }

    #[test]
    fn test_input_not_modified() {
        let data = pairs(&[3.0, 1.0, 2.0], &[1.0, 2.0, 3.0]);
        let copy = data.clone();
        let _ = compute(&data).unwrap();
        assert_eq!(data, copy);
    }
}
