//! End-to-end allocation run: import, pool preparation, distribution.

use std::fmt;
use std::path::Path;

use crate::alloc::{AllocationError, AllocationOutcome, distribute_charging_demand};
use crate::config::AllocationConfig;
use crate::io::import::{
    ImportError, read_charging_processes, read_grid_connections, read_lv_grids,
    read_run_parameters,
};
use crate::model::process::count_cars;
use crate::model::{
    CandidateChargingPoint, CandidatePool, ChargingProcess, GridTopology, RunParameters,
};
use crate::pool::prepare_pool;

/// Seed for pool sampling when the run has no grid seed.
const UNSEEDED_POOL_SEED: u64 = 0;

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Process table with assignment columns populated.
    pub processes: Vec<ChargingProcess>,
    pub pool: CandidatePool,
    pub run: RunParameters,
    pub outcome: AllocationOutcome,
}

/// Failure of a complete run.
#[derive(Debug)]
pub enum RunError {
    Import(ImportError),
    Allocation(AllocationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Import(e) => write!(f, "{e}"),
            RunError::Allocation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Import(e) => Some(e),
            RunError::Allocation(e) => Some(e),
        }
    }
}

impl From<ImportError> for RunError {
    fn from(e: ImportError) -> Self {
        RunError::Import(e)
    }
}

impl From<AllocationError> for RunError {
    fn from(e: AllocationError) -> Self {
        RunError::Allocation(e)
    }
}

/// Imports the demand simulation output in `data_dir` and allocates it.
///
/// # Errors
///
/// Returns a `RunError` if a required input cannot be imported or the
/// allocation hits malformed data.
pub fn run(config: &AllocationConfig, data_dir: &Path) -> Result<RunOutput, RunError> {
    let r = &config.run;

    let processes = read_charging_processes(
        &data_dir.join(&r.processes_dir),
        config.parking_times_mode(),
    )?;
    let run = read_run_parameters(&data_dir.join(&r.run_config_file), &processes);

    let candidates = read_grid_connections(&data_dir.join(&r.grid_connections_dir))?;
    let lv_grids = match &r.lv_grids_file {
        Some(file) => read_lv_grids(&data_dir.join(file))?,
        None => Default::default(),
    };
    let topology = GridTopology::new(r.seed).with_lv_grids(lv_grids);

    run_with(config, processes, candidates, topology, run)
}

/// Allocates already imported data.
///
/// # Errors
///
/// Returns a `RunError` if the allocation hits malformed data.
pub fn run_with(
    config: &AllocationConfig,
    mut processes: Vec<ChargingProcess>,
    candidates: Vec<CandidateChargingPoint>,
    topology: GridTopology,
    run: RunParameters,
) -> Result<RunOutput, RunError> {
    let pool = prepare_pool(
        candidates,
        count_cars(&processes),
        &config.pool_rates(),
        topology.seed.unwrap_or(UNSEEDED_POOL_SEED),
    );

    let outcome = distribute_charging_demand(
        &mut processes,
        &pool,
        &topology,
        &config.weight_params(),
        &run,
    )?;

    Ok(RunOutput {
        processes,
        pool,
        run,
        outcome,
    })
}
