//! Preparation of the candidate charging point pool before allocation.
//!
//! Guarantees a minimum number of grid connections per car for every
//! use-case, orders the pool and scales user-centric weights per use-case.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::alloc::weights::minmax_normalize;
use crate::model::{CandidateChargingPoint, CandidatePool, UseCase};

/// Upper bound on resize rounds per use-case. Every round at least doubles
/// the group or closes the gap, so any reachable ratio needs far fewer.
pub const MAX_RESIZE_ROUNDS: usize = 64;

/// Largest accepted grid connection to car ratio.
pub const MAX_GC_TO_CAR_RATE: f64 = 10.0;

/// Minimum ratio of grid connections to cars per use-case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolRates {
    pub home: f64,
    pub work: f64,
    pub public: f64,
    pub hpc: f64,
}

impl Default for PoolRates {
    fn default() -> Self {
        Self {
            home: 0.5,
            work: 0.25,
            public: 0.1,
            hpc: 0.005,
        }
    }
}

impl PoolRates {
    pub fn for_use_case(&self, use_case: UseCase) -> f64 {
        match use_case {
            UseCase::Home => self.home,
            UseCase::Work => self.work,
            UseCase::Public => self.public,
            UseCase::Hpc => self.hpc,
        }
    }
}

/// Builds the candidate pool used by the allocation engine.
///
/// For each use-case, in [`UseCase::ALL`] order:
/// - an empty group is seeded with a random tenth (rounded up) of the public
///   candidates, relabelled to the use-case;
/// - an under-supplied group is doubled while doubling still falls short of
///   the target ratio, then topped up with a random sample of its members.
///
/// Afterwards candidates are sorted by use-case, region and descending weight
/// and the user-centric weights are min-max scaled within each use-case.
/// `seed` drives the sampling.
pub fn prepare_pool(
    mut points: Vec<CandidateChargingPoint>,
    num_cars: usize,
    rates: &PoolRates,
    seed: u64,
) -> CandidatePool {
    let mut rng = StdRng::seed_from_u64(seed);

    for use_case in UseCase::ALL {
        if !points.iter().any(|p| p.use_case == use_case) {
            seed_from_public(&mut points, use_case, &mut rng);
        }
        if num_cars > 0 {
            ensure_rate(
                &mut points,
                use_case,
                rates.for_use_case(use_case),
                num_cars,
                &mut rng,
            );
        }
    }

    points.sort_by(|a, b| {
        a.use_case
            .cmp(&b.use_case)
            .then(a.region.cmp(&b.region))
            .then(b.user_centric_weight.total_cmp(&a.user_centric_weight))
    });
    normalize_weights(&mut points);

    CandidatePool::new(points)
}

fn group(points: &[CandidateChargingPoint], use_case: UseCase) -> Vec<CandidateChargingPoint> {
    points
        .iter()
        .filter(|p| p.use_case == use_case)
        .cloned()
        .collect()
}

fn seed_from_public(points: &mut Vec<CandidateChargingPoint>, use_case: UseCase, rng: &mut StdRng) {
    let public = group(points, UseCase::Public);
    let amount = public.len().div_ceil(10);
    tracing::warn!(
        %use_case,
        duplicated = amount,
        "no grid connections for use-case, duplicating 10% of public grid connections"
    );
    let extra: Vec<CandidateChargingPoint> = public
        .choose_multiple(rng, amount)
        .map(|p| CandidateChargingPoint {
            use_case,
            ..p.clone()
        })
        .collect();
    points.extend(extra);
}

fn ensure_rate(
    points: &mut Vec<CandidateChargingPoint>,
    use_case: UseCase,
    target: f64,
    num_cars: usize,
    rng: &mut StdRng,
) {
    let target = if target > MAX_GC_TO_CAR_RATE {
        tracing::warn!(
            %use_case,
            requested = target,
            max = MAX_GC_TO_CAR_RATE,
            "grid connection rate capped"
        );
        MAX_GC_TO_CAR_RATE
    } else {
        target
    };

    for _ in 0..MAX_RESIZE_ROUNDS {
        let members = group(points, use_case);
        let n = members.len();
        if n == 0 {
            tracing::warn!(%use_case, "cannot reach grid connection rate without any candidates");
            return;
        }
        let actual = n as f64 / num_cars as f64;
        if actual >= target {
            return;
        }

        if actual * 2.0 < target {
            points.extend(members);
        } else {
            let wanted = (target * num_cars as f64).ceil() as usize;
            let extra = wanted.saturating_sub(n).clamp(1, n);
            points.extend(members.choose_multiple(rng, extra).cloned());
        }
    }
    tracing::warn!(
        %use_case,
        rounds = MAX_RESIZE_ROUNDS,
        "grid connection rate not reached within resize bound"
    );
}

fn normalize_weights(points: &mut [CandidateChargingPoint]) {
    for use_case in UseCase::ALL {
        let rows: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.use_case == use_case)
            .map(|(i, _)| i)
            .collect();
        let raw: Vec<f64> = rows.iter().map(|&i| points[i].user_centric_weight).collect();
        for (&i, w) in rows.iter().zip(minmax_normalize(&raw)) {
            points[i].user_centric_weight = w;
        }
    }
}
