//! Charging demand allocation: weights, capacity penalty, point reuse and
//! the private and public distribution passes.

pub mod availability;
pub mod capacity;
pub mod error;
pub mod private;
pub mod public;
/// Post-hoc run summary.
pub mod report;
pub mod weights;

use rand::SeedableRng;
use rand::rngs::StdRng;

pub use availability::{AvailabilityIndex, AvailabilityRecord};
pub use capacity::DesignatedCapacity;
pub use error::AllocationError;
pub use report::AllocationReport;
pub use weights::{WeightMode, WeightParams};

use crate::model::{CandidatePool, ChargingProcess, GridTopology, RunParameters};

/// Everything an allocation run hands back besides the mutated process table.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// Designated capacity from private charging.
    pub private_capacity: DesignatedCapacity,
    /// Designated capacity from public charging, used for grid reinforcement.
    pub public_capacity: DesignatedCapacity,
    pub availability: AvailabilityIndex,
    pub report: AllocationReport,
}

/// Creates the run-scoped generator.
///
/// Without a seed the generator is seeded from the OS and the run is not
/// reproducible.
pub fn run_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            tracing::warn!("no grid seed available, allocation is not reproducible");
            StdRng::from_os_rng()
        }
    }
}

/// Distributes all charging processes onto the candidate pool.
///
/// Private demand is placed first with user-centric weights only, then public
/// demand with weights from `weight_params`. A single generator seeded from
/// `topology.seed` drives every draw in that order, so identical inputs yield
/// identical assignments.
///
/// # Errors
///
/// Returns an `AllocationError` on unknown destination codes or when a
/// use-case (or region, for home charging) has no candidates.
pub fn distribute_charging_demand(
    processes: &mut [ChargingProcess],
    pool: &CandidatePool,
    topology: &GridTopology,
    weight_params: &WeightParams,
    run: &RunParameters,
) -> Result<AllocationOutcome, AllocationError> {
    let mut rng = run_rng(topology.seed);

    let user_weights = weights::candidate_weights(pool, topology, &WeightParams::user_friendly());
    let private = private::distribute_private(processes, pool, &user_weights, run.eta_cp, &mut rng)?;

    let public_weights = weights::candidate_weights(pool, topology, weight_params);
    let public = public::distribute_public(processes, pool, &public_weights, &mut rng)?;

    let mut report = AllocationReport::from_processes(processes);
    report.private_processes = private.processes;
    report.private_charging_points = private.charging_points;
    report.private_designated_kw = private.capacity.total_kw();
    report.public_processes = public.minted + public.reused;
    report.public_points_minted = public.minted;
    report.public_points_reused = public.reused;
    report.public_designated_kw = public.capacity.total_kw();
    report.reproducible = topology.seed.is_some();

    Ok(AllocationOutcome {
        private_capacity: private.capacity,
        public_capacity: public.capacity,
        availability: public.availability,
        report,
    })
}
