//! Distribution of private (home and work) charging demand.
//!
//! Every car gets its own charging point per private destination. Work points
//! are drawn from all work candidates, home points from the home candidates
//! of the car's region.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use super::capacity::DesignatedCapacity;
use super::error::AllocationError;
use super::weights::weighted_choice;
use crate::model::{CandidatePool, ChargingProcess, DemandClass, UseCase};

/// Outcome of the private pass.
#[derive(Debug, Clone)]
pub struct PrivateAllocation {
    pub capacity: DesignatedCapacity,
    /// Number of private charging points created.
    pub charging_points: usize,
    /// Number of private processes assigned.
    pub processes: usize,
}

/// Assigns every private process a charging park and charging point.
///
/// Destinations are handled in ascending code order, cars in ascending id
/// order (home: grouped by region first). For each car one candidate is drawn
/// from `base_weights` plus the capacity penalty; all of the car's processes at
/// that destination share the drawn point. Work demand is divided by `eta_cp`
/// before it is booked as designated capacity.
///
/// # Errors
///
/// Returns `AllocationError::UnknownDestination` for destinations without a
/// private use-case and `AllocationError::NoCandidates` if a car has nowhere
/// to charge.
pub fn distribute_private(
    processes: &mut [ChargingProcess],
    pool: &CandidatePool,
    base_weights: &[f64],
    eta_cp: f64,
    rng: &mut StdRng,
) -> Result<PrivateAllocation, AllocationError> {
    // destination -> (region, car) -> process rows
    let mut by_destination: BTreeMap<String, BTreeMap<(u32, u32), Vec<usize>>> = BTreeMap::new();
    for (row, p) in processes.iter().enumerate() {
        if p.demand != DemandClass::Private {
            continue;
        }
        by_destination
            .entry(p.destination.clone())
            .or_default()
            .entry((p.region, p.car_id))
            .or_default()
            .push(row);
    }

    let mut capacity = DesignatedCapacity::new(pool.len());
    let mut charging_point_id = 0_usize;
    let mut assigned = 0_usize;

    for (destination, cars) in &by_destination {
        let use_case = UseCase::for_private_destination(destination).ok_or_else(|| {
            AllocationError::UnknownDestination {
                destination: destination.clone(),
                demand: DemandClass::Private.to_string(),
            }
        })?;

        match use_case {
            UseCase::Work => {
                let subset = pool.indices(UseCase::Work, None);
                if subset.is_empty() {
                    return Err(AllocationError::NoCandidates {
                        use_case,
                        region: None,
                    });
                }

                // work points are region-independent: merge a car's rows across regions
                let mut by_car: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
                for ((_, car_id), rows) in cars {
                    by_car.entry(*car_id).or_default().extend(rows);
                }

                for rows in by_car.into_values() {
                    let park = draw(&subset, &capacity, base_weights, rng)?;
                    capacity.add(park, processes[rows[0]].charging_power_kw / eta_cp);
                    assigned += assign_rows(processes, &rows, park, charging_point_id);
                    charging_point_id += 1;
                }
            }
            UseCase::Home => {
                let mut region_subset: Option<(u32, Vec<usize>)> = None;
                for ((region, _), rows) in cars {
                    if region_subset.as_ref().is_none_or(|(r, _)| r != region) {
                        let subset = pool.indices(UseCase::Home, Some(*region));
                        if subset.is_empty() {
                            return Err(AllocationError::NoCandidates {
                                use_case,
                                region: Some(*region),
                            });
                        }
                        region_subset = Some((*region, subset));
                    }
                    let Some((_, subset)) = &region_subset else {
                        continue;
                    };

                    let park = draw(subset, &capacity, base_weights, rng)?;
                    capacity.add(park, processes[rows[0]].charging_power_kw);
                    assigned += assign_rows(processes, rows, park, charging_point_id);
                    charging_point_id += 1;
                }
            }
            // the private table only yields home and work
            UseCase::Public | UseCase::Hpc => {
                return Err(AllocationError::UnknownDestination {
                    destination: destination.clone(),
                    demand: DemandClass::Private.to_string(),
                });
            }
        }
    }

    tracing::info!(
        charging_points = charging_point_id,
        processes = assigned,
        designated_kw = capacity.total_kw(),
        "private charging demand distributed"
    );

    Ok(PrivateAllocation {
        capacity,
        charging_points: charging_point_id,
        processes: assigned,
    })
}

fn draw(
    subset: &[usize],
    capacity: &DesignatedCapacity,
    base_weights: &[f64],
    rng: &mut StdRng,
) -> Result<usize, AllocationError> {
    let weights = capacity.combined_weights(subset, base_weights);
    let pos = weighted_choice(rng, &weights)?;
    Ok(subset[pos])
}

fn assign_rows(processes: &mut [ChargingProcess], rows: &[usize], park: usize, point: usize) -> usize {
    for &row in rows {
        processes[row].assign(park, point);
    }
    rows.len()
}
