//! Selection weights for candidate charging points and weighted drawing.

use std::fmt;
use std::str::FromStr;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;

use super::error::AllocationError;
use crate::model::{CandidatePool, GridTopology};

/// How candidate weights are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    /// Only the static user-centric weight counts.
    UserFriendly,
    /// User-centric weight blended with a grid-friendliness score.
    GridFriendly,
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightMode::UserFriendly => f.write_str("user_friendly"),
            WeightMode::GridFriendly => f.write_str("grid_friendly"),
        }
    }
}

impl FromStr for WeightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_friendly" => Ok(WeightMode::UserFriendly),
            "grid_friendly" => Ok(WeightMode::GridFriendly),
            other => Err(format!("unknown weight mode \"{other}\"")),
        }
    }
}

/// Parameters of the weight model. All factors lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightParams {
    pub mode: WeightMode,
    /// Share of the user-centric weight against the grid-friendly score.
    pub user_friendly_weight: f64,
    /// Share of the substation distance within the grid-friendly score.
    pub distance_weight: f64,
    /// Share of the generation weight against the load weight of an LV grid.
    pub generators_weight_factor: f64,
}

impl Default for WeightParams {
    fn default() -> Self {
        Self {
            mode: WeightMode::UserFriendly,
            user_friendly_weight: 0.5,
            distance_weight: 1.0 / 3.0,
            generators_weight_factor: 0.5,
        }
    }
}

impl WeightParams {
    /// Default parameters with only the user-centric weight in play.
    pub fn user_friendly() -> Self {
        Self::default()
    }

    /// Default parameters in grid-aware mode.
    pub fn grid_friendly() -> Self {
        Self {
            mode: WeightMode::GridFriendly,
            ..Self::default()
        }
    }
}

/// Computes the raw weight of every candidate in `pool`.
///
/// The result is aligned to candidate index order and not normalized.
/// In grid-friendly mode a candidate's score is
///
/// ```text
/// balance  = g * generators_weight + (1 - g) * loads_weight
/// grid     = (1 - d) * balance + d * distance_weight
/// weight   = (1 - u) * grid + u * user_centric_weight
/// ```
///
/// Candidates whose LV grid is unknown get a balance of 0.
pub fn candidate_weights(
    pool: &CandidatePool,
    topology: &GridTopology,
    params: &WeightParams,
) -> Vec<f64> {
    match params.mode {
        WeightMode::UserFriendly => pool
            .points()
            .iter()
            .map(|p| p.user_centric_weight.max(0.0))
            .collect(),
        WeightMode::GridFriendly => {
            let g = params.generators_weight_factor;
            let d = params.distance_weight;
            let u = params.user_friendly_weight;
            pool.points()
                .iter()
                .map(|p| {
                    let balance = p
                        .lv_grid_id
                        .and_then(|id| topology.lv_grids.get(&id))
                        .map_or(0.0, |w| g * w.generators_weight + (1.0 - g) * w.loads_weight);
                    let grid = (1.0 - d) * balance + d * p.distance_weight;
                    ((1.0 - u) * grid + u * p.user_centric_weight).max(0.0)
                })
                .collect()
        }
    }
}

/// Scales `weights` so they sum to 1.
///
/// A vector summing to zero yields the uniform distribution.
pub fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        let n = weights.len() as f64;
        return vec![1.0 / n; weights.len()];
    }
    weights.iter().map(|w| w / total).collect()
}

/// Min-max scales `values` to `[0, 1]`.
///
/// A constant vector maps to all zeros.
pub fn minmax_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Draws a position from `probabilities` with the run generator.
///
/// # Errors
///
/// Returns `AllocationError::InvalidWeights` if the vector is empty or
/// contains negative or non-finite entries.
pub fn weighted_choice(rng: &mut StdRng, probabilities: &[f64]) -> Result<usize, AllocationError> {
    let dist = WeightedIndex::<f64>::new(probabilities)
        .map_err(|e| AllocationError::InvalidWeights(e.to_string()))?;
    Ok(dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;

    use super::*;
    use crate::model::{CandidateChargingPoint, LvGridWeights, UseCase};

    fn pool() -> CandidatePool {
        CandidatePool::new(vec![
            CandidateChargingPoint::new(1, UseCase::Public, 1.0).with_grid(10, 0.0),
            CandidateChargingPoint::new(1, UseCase::Public, 0.0).with_grid(11, 1.0),
            CandidateChargingPoint::new(1, UseCase::Public, 0.5),
        ])
    }

    fn topology() -> GridTopology {
        let mut lv = HashMap::new();
        lv.insert(
            10,
            LvGridWeights {
                generators_weight: 1.0,
                loads_weight: 0.0,
            },
        );
        lv.insert(
            11,
            LvGridWeights {
                generators_weight: 0.0,
                loads_weight: 1.0,
            },
        );
        GridTopology::new(Some(1)).with_lv_grids(lv)
    }

    #[test]
    fn user_friendly_weights_are_static_weights() {
        let w = candidate_weights(&pool(), &topology(), &WeightParams::user_friendly());
        assert_eq!(w, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn grid_friendly_weights_blend_scores() {
        let params = WeightParams::grid_friendly();
        let w = candidate_weights(&pool(), &topology(), &params);
        // candidate 0: balance 0.5, grid = 2/3 * 0.5 = 1/3, weight = 0.5/3 + 0.5
        assert!((w[0] - (0.5 / 3.0 + 0.5)).abs() < 1e-12);
        // candidate 1: balance 0.5, grid = 1/3 + 1/3, weight = 0.5 * 2/3
        assert!((w[1] - 1.0 / 3.0).abs() < 1e-12);
        // candidate 2: no LV grid, no distance, only the user share remains
        assert!((w[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn grid_friendly_with_full_user_share_matches_user_mode() {
        let params = WeightParams {
            user_friendly_weight: 1.0,
            ..WeightParams::grid_friendly()
        };
        let w = candidate_weights(&pool(), &topology(), &params);
        assert_eq!(w, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn normalize_sums_to_one() {
        let n = normalize(&[0.2, 0.3, 1.5, 0.0]);
        assert!((n.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((n[2] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn normalize_all_zero_is_uniform() {
        let n = normalize(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(n, vec![0.25; 4]);
    }

    #[test]
    fn minmax_scales_and_handles_constants() {
        assert_eq!(minmax_normalize(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(minmax_normalize(&[7.0, 7.0]), vec![0.0, 0.0]);
        assert!(minmax_normalize(&[]).is_empty());
    }

    #[test]
    fn weighted_choice_never_picks_zero_weight() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let i = weighted_choice(&mut rng, &[0.0, 1.0, 0.0]).ok();
            assert_eq!(i, Some(1));
        }
    }

    #[test]
    fn weighted_choice_rejects_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(weighted_choice(&mut rng, &[]).is_err());
    }
}
