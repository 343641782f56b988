//! Distribution of public charging demand with charging point reuse.

use rand::rngs::StdRng;

use super::availability::{AvailabilityIndex, AvailabilityRecord};
use super::capacity::DesignatedCapacity;
use super::error::AllocationError;
use super::weights::{normalize, weighted_choice};
use crate::model::{CandidatePool, ChargingProcess, DemandClass, UseCase};

/// Outcome of the public pass.
#[derive(Debug, Clone)]
pub struct PublicAllocation {
    pub capacity: DesignatedCapacity,
    pub availability: AvailabilityIndex,
    /// Processes served by a newly minted point.
    pub minted: usize,
    /// Processes served by an already existing point.
    pub reused: usize,
}

/// Assigns every public process a charging park and charging point.
///
/// Processes are visited by (park start, park end). A process reuses an
/// existing point of its use-case that is free before the process ends and
/// charges with the same power (0.1 kW resolution); among several such points
/// the park weights decide. Otherwise a park is drawn from all candidates of
/// the use-case with the capacity penalty applied, and a new point id is
/// minted one above the highest id already assigned in `processes`.
///
/// # Errors
///
/// Returns `AllocationError::UnknownDestination` for trip purposes without a
/// public use-case and `AllocationError::NoCandidates` if a use-case has no
/// candidates.
pub fn distribute_public(
    processes: &mut [ChargingProcess],
    pool: &CandidatePool,
    base_weights: &[f64],
    rng: &mut StdRng,
) -> Result<PublicAllocation, AllocationError> {
    let mut order: Vec<usize> = processes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.demand == DemandClass::Public)
        .map(|(row, _)| row)
        .collect();
    order.sort_by_key(|&row| (processes[row].park_start, processes[row].park_end));

    let mut next_point_id = processes
        .iter()
        .filter_map(|p| p.charging_point_id)
        .max()
        .map_or(0, |id| id + 1);

    let mut capacity = DesignatedCapacity::new(pool.len());
    let mut availability = AvailabilityIndex::new();
    let mut minted = 0_usize;
    let mut reused = 0_usize;

    for row in order {
        let process = &processes[row];
        let use_case = UseCase::for_public_destination(&process.destination).ok_or_else(|| {
            AllocationError::UnknownDestination {
                destination: process.destination.clone(),
                demand: DemandClass::Public.to_string(),
            }
        })?;
        let park_end = process.park_end;
        let power_kw = process.charging_power_kw;

        let matching = availability.matching(park_end, power_kw, use_case);
        if !matching.is_empty() {
            let parks: Vec<usize> = matching
                .iter()
                .filter_map(|id| availability.get(*id).map(|r| r.charging_park_id))
                .collect();
            let weights: Vec<f64> = parks
                .iter()
                .map(|&park| base_weights.get(park).copied().unwrap_or(0.0))
                .collect();
            let pos = weighted_choice(rng, &normalize(&weights))?;
            let point_id = matching[pos];
            availability.occupy(point_id, park_end);
            processes[row].assign(parks[pos], point_id);
            tracing::debug!(
                point_id,
                park = parks[pos],
                candidates = matching.len(),
                "charging point reused"
            );
            reused += 1;
            continue;
        }

        let subset = pool.indices(use_case, None);
        if subset.is_empty() {
            return Err(AllocationError::NoCandidates {
                use_case,
                region: None,
            });
        }
        let weights = capacity.combined_weights(&subset, base_weights);
        let park = subset[weighted_choice(rng, &weights)?];
        let point_id = next_point_id;
        next_point_id += 1;

        availability.insert(
            point_id,
            AvailabilityRecord {
                park_end,
                charging_power_kw: power_kw,
                charging_park_id: park,
                use_case,
            },
        );
        capacity.add(park, power_kw);
        processes[row].assign(park, point_id);
        tracing::debug!(point_id, park, %use_case, "charging point minted");
        minted += 1;
    }

    tracing::info!(
        minted,
        reused,
        designated_kw = capacity.total_kw(),
        "public charging demand distributed"
    );

    Ok(PublicAllocation {
        capacity,
        availability,
        minted,
        reused,
    })
}
