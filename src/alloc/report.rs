//! Post-hoc summary of an allocation run.

use std::fmt;

use crate::model::ChargingProcess;

/// Aggregate figures of one allocation run, derived from the mutated
/// process table and the pass outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    /// Number of charging processes in the table.
    pub processes: usize,
    /// Processes left without an assignment (expected 0).
    pub unassigned: usize,
    pub private_processes: usize,
    pub private_charging_points: usize,
    /// Designated private capacity (kW, efficiency adjusted for work).
    pub private_designated_kw: f64,
    pub public_processes: usize,
    /// Public processes that triggered a new charging point.
    pub public_points_minted: usize,
    /// Public processes served by an existing point.
    pub public_points_reused: usize,
    pub public_designated_kw: f64,
    /// Whether the run used a seeded generator.
    pub reproducible: bool,
}

impl AllocationReport {
    /// Counts assigned and unassigned processes; pass figures are filled by the engine.
    pub fn from_processes(processes: &[ChargingProcess]) -> Self {
        let unassigned = processes.iter().filter(|p| !p.is_assigned()).count();
        Self {
            processes: processes.len(),
            unassigned,
            private_processes: 0,
            private_charging_points: 0,
            private_designated_kw: 0.0,
            public_processes: 0,
            public_points_minted: 0,
            public_points_reused: 0,
            public_designated_kw: 0.0,
            reproducible: false,
        }
    }

    /// Share of public processes served by reused points, in percent.
    pub fn reuse_pct(&self) -> f64 {
        if self.public_processes == 0 {
            return 0.0;
        }
        100.0 * self.public_points_reused as f64 / self.public_processes as f64
    }
}

impl fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Allocation Report ---")?;
        writeln!(
            f,
            "Charging processes:    {} ({} unassigned)",
            self.processes, self.unassigned
        )?;
        writeln!(
            f,
            "Private:               {} processes on {} points, {:.1} kW designated",
            self.private_processes, self.private_charging_points, self.private_designated_kw
        )?;
        writeln!(
            f,
            "Public:                {} processes on {} points, {:.1} kW designated",
            self.public_processes, self.public_points_minted, self.public_designated_kw
        )?;
        writeln!(f, "Public point reuse:    {:.1}%", self.reuse_pct())?;
        write!(
            f,
            "Reproducible:          {}",
            if self.reproducible { "yes" } else { "no (unseeded)" }
        )
    }
}
