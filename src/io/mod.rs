//! CSV input and output.

/// Assignment and designated capacity export.
pub mod export;
/// Charging process, run parameter and grid connection import.
pub mod import;
