//! Grid and run context supplied by collaborators of the allocation engine.

use std::collections::HashMap;

/// Normalized generation and load weights of one low-voltage grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LvGridWeights {
    pub generators_weight: f64,
    pub loads_weight: f64,
}

/// Topology-derived inputs of an allocation run.
#[derive(Debug, Clone, Default)]
pub struct GridTopology {
    /// Grid identifier used as the run seed. `None` makes the run
    /// non-reproducible.
    pub seed: Option<u64>,
    /// Aggregate weights keyed by low-voltage grid id.
    pub lv_grids: HashMap<u32, LvGridWeights>,
}

impl GridTopology {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            lv_grids: HashMap::new(),
        }
    }

    pub fn with_lv_grids(mut self, lv_grids: HashMap<u32, LvGridWeights>) -> Self {
        self.lv_grids = lv_grids;
        self
    }
}

/// Parameters of the demand simulation that produced the charging processes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunParameters {
    /// Charging point efficiency (0..1].
    pub eta_cp: f64,
    /// Time step length in minutes.
    pub stepsize_min: u32,
    pub simulated_days: u32,
}

impl RunParameters {
    /// Default time step length when no run configuration is available.
    pub const FALLBACK_STEPSIZE_MIN: u32 = 15;

    /// Fallback used when the run configuration cannot be read: full
    /// efficiency, 15 minute steps, and enough days to cover `last_step`.
    pub fn fallback(last_step: u32) -> Self {
        let steps_per_day = 24 * 60 / Self::FALLBACK_STEPSIZE_MIN;
        Self {
            eta_cp: 1.0,
            stepsize_min: Self::FALLBACK_STEPSIZE_MIN,
            simulated_days: last_step.div_ceil(steps_per_day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_estimates_days_from_last_step() {
        assert_eq!(RunParameters::fallback(0).simulated_days, 0);
        assert_eq!(RunParameters::fallback(96).simulated_days, 1);
        assert_eq!(RunParameters::fallback(97).simulated_days, 2);
        let p = RunParameters::fallback(700);
        assert_eq!(p.eta_cp, 1.0);
        assert_eq!(p.stepsize_min, 15);
        assert_eq!(p.simulated_days, 8);
    }
}
