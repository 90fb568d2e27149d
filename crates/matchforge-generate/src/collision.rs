//! Accidental-match arithmetic for dataset sizing.
//!
//! Two synthesized records collide when their (name, date_of_birth, country)
//! triples are equal. With independent uniform draws every cross-dataset pair
//! collides with probability `1 / universe_size`, so the chance of at least
//! one accidental match grows with the number of pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::DateRange;
use crate::pools::{AttributePools, PoolKind};
use crate::records::FixtureRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEstimate {
    /// Distinct (name, date_of_birth, country) triples the synthesizer can emit.
    pub universe_size: u64,
    /// Cross-dataset pairs with at least one synthesized side.
    pub random_pairs: u64,
    pub expected_collisions: f64,
    /// Probability of one or more accidental matches.
    pub probability_any: f64,
}

impl CollisionEstimate {
    /// `anchored` removes the anchor/anchor pair, which is a designed match.
    pub fn compute(
        pools: &AttributePools,
        date_range: &DateRange,
        subject_count: u64,
        watchlist_count: u64,
        anchored: bool,
    ) -> Self {
        let universe_size = universe_size(pools, date_range);
        let mut random_pairs = subject_count.saturating_mul(watchlist_count);
        if anchored && random_pairs > 0 {
            random_pairs -= 1;
        }
        Self::from_parts(universe_size, random_pairs)
    }

    pub fn from_parts(universe_size: u64, random_pairs: u64) -> Self {
        let (expected_collisions, probability_any) = if universe_size == 0 {
            (0.0, 0.0)
        } else {
            let per_pair = 1.0 / universe_size as f64;
            let pairs = random_pairs as f64;
            (pairs * per_pair, -(pairs * (-per_pair).ln_1p()).exp_m1())
        };
        Self {
            universe_size,
            random_pairs,
            expected_collisions,
            probability_any,
        }
    }

    pub fn exceeds(&self, max_probability: f64) -> bool {
        self.probability_any > max_probability
    }
}

/// given names × family names × countries × days in range.
pub fn universe_size(pools: &AttributePools, date_range: &DateRange) -> u64 {
    [
        PoolKind::GivenNames,
        PoolKind::FamilyNames,
        PoolKind::Countries,
    ]
    .into_iter()
    .map(|kind| pools.len(kind) as u64)
    .fold(date_range.day_count(), u64::saturating_mul)
}

/// Smallest universe keeping `pairs` random pairs at or under `max_probability`.
pub fn minimum_universe_for(pairs: u64, max_probability: f64) -> u64 {
    if pairs == 0 || max_probability >= 1.0 {
        return 1;
    }
    if max_probability <= 0.0 {
        return u64::MAX;
    }
    // 1 - (1 - 1/U)^pairs <= p  <=>  1/U <= 1 - (1 - p)^(1/pairs)
    let per_pair = -((-max_probability).ln_1p() / pairs as f64).exp_m1();
    let universe = (1.0 / per_pair).ceil();
    if universe >= u64::MAX as f64 {
        u64::MAX
    } else {
        universe as u64
    }
}

/// Largest `n` such that two datasets of `n` records each stay at or under
/// `max_probability` for the given universe.
pub fn max_balanced_count(universe_size: u64, max_probability: f64) -> u64 {
    if universe_size <= 1 || max_probability <= 0.0 {
        return 1;
    }
    if max_probability >= 1.0 {
        return u64::MAX;
    }
    let per_pair = 1.0 / universe_size as f64;
    let max_pairs = ((-max_probability).ln_1p() / (-per_pair).ln_1p()).floor();
    max_pairs.sqrt().floor() as u64
}

/// Distinct match triples present in both datasets. The anchor, when present
/// on both sides, counts once.
pub fn count_matches<A: FixtureRecord, B: FixtureRecord>(left: &[A], right: &[B]) -> u64 {
    let left_keys: HashSet<_> = left.iter().map(|record| record.match_key()).collect();
    let matched: HashSet<_> = right
        .iter()
        .map(|record| record.match_key())
        .filter(|key| left_keys.contains(key))
        .collect();
    matched.len() as u64
}
