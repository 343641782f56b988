//! Tabular records consumed and produced by the allocation engine.

/// Candidate grid connections and the prepared candidate pool.
pub mod candidate;
/// Charging processes and their demand classes.
pub mod process;
pub mod topology;
/// Charging use-cases and trip-destination lookup tables.
pub mod use_case;

// Re-export the main types for convenience
pub use candidate::{CandidateChargingPoint, CandidatePool};
pub use process::{ChargingProcess, DemandClass};
pub use topology::{GridTopology, LvGridWeights, RunParameters};
pub use use_case::UseCase;
