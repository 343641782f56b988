//! Electromobility charging demand allocation for distribution grids.

/// Weight model, capacity tracking, point reuse and the allocation passes.
pub mod alloc;
pub mod cli;
pub mod config;
pub mod io;
pub mod model;
/// Candidate pool preparation.
pub mod pool;
pub mod runner;
