//! Designated charging capacity per candidate and the capacity penalty.

use super::weights::{minmax_normalize, normalize};

/// Running designated capacity (kW) per candidate index.
///
/// Capacity only ever accumulates; processes finishing do not release it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignatedCapacity {
    kw: Vec<f64>,
}

impl DesignatedCapacity {
    /// Creates a zeroed table for `candidates` candidates.
    pub fn new(candidates: usize) -> Self {
        Self {
            kw: vec![0.0; candidates],
        }
    }

    pub fn get(&self, index: usize) -> f64 {
        self.kw.get(index).copied().unwrap_or(0.0)
    }

    /// Adds `kw` to the candidate's designated capacity. Negative amounts are ignored.
    pub fn add(&mut self, index: usize, kw: f64) {
        if index >= self.kw.len() {
            self.kw.resize(index + 1, 0.0);
        }
        self.kw[index] += kw.max(0.0);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.kw
    }

    /// Sum of designated capacity over all candidates.
    pub fn total_kw(&self) -> f64 {
        self.kw.iter().sum()
    }

    /// `1 - minmax(capacity)` over `subset`.
    ///
    /// The least loaded candidates get 1, the most loaded 0. When every
    /// member carries the same capacity all penalties are 1.
    pub fn penalty(&self, subset: &[usize]) -> Vec<f64> {
        let values: Vec<f64> = subset.iter().map(|&i| self.get(i)).collect();
        minmax_normalize(&values)
            .into_iter()
            .map(|v| 1.0 - v)
            .collect()
    }

    /// Base weights of `subset` plus the capacity penalty, normalized to sum 1.
    ///
    /// `base_weights` is indexed by candidate index.
    pub fn combined_weights(&self, subset: &[usize], base_weights: &[f64]) -> Vec<f64> {
        let combined: Vec<f64> = subset
            .iter()
            .zip(self.penalty(subset))
            .map(|(&i, p)| base_weights.get(i).copied().unwrap_or(0.0) + p)
            .collect();
        normalize(&combined)
    }
}

/// Grid connection capacity (kW) needed for a park with `total_kw` of
/// charging points.
///
/// The simultaneity curve is defined in MW: parks up to 0.3 MW connect at
/// full power, parks from 1 MW at 45%, with the factor falling linearly in
/// between.
pub fn grid_connection_capacity(total_kw: f64) -> f64 {
    grid_connection_capacity_with(total_kw / KW_PER_MW, 0.3, 1.0, 0.45) * KW_PER_MW
}

const KW_PER_MW: f64 = 1e3;

/// Simultaneity curve on `total_mw` with explicit breakpoints (MW).
pub fn grid_connection_capacity_with(
    total_mw: f64,
    lower_limit: f64,
    upper_limit: f64,
    minimum_factor: f64,
) -> f64 {
    if total_mw <= lower_limit {
        total_mw
    } else if total_mw >= upper_limit {
        minimum_factor * total_mw
    } else {
        let slope = (minimum_factor - 1.0) / (upper_limit - lower_limit);
        (slope * (total_mw - lower_limit) + 1.0) * total_mw
    }
}
