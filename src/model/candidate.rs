use super::use_case::UseCase;

/// A location where a charging point may be installed.
///
/// Identified by its position in the [`CandidatePool`] it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateChargingPoint {
    /// Region code (AGS) of the location.
    pub region: u32,
    pub use_case: UseCase,
    /// Attractiveness of the location for users, 0..1 within its use-case
    /// once the pool is prepared.
    pub user_centric_weight: f64,
    /// Low-voltage grid hosting the location, if known.
    pub lv_grid_id: Option<u32>,
    /// Normalized distance score towards the nearest substation (0..1).
    pub distance_weight: f64,
}

impl CandidateChargingPoint {
    pub fn new(region: u32, use_case: UseCase, user_centric_weight: f64) -> Self {
        Self {
            region,
            use_case,
            user_centric_weight,
            lv_grid_id: None,
            distance_weight: 0.0,
        }
    }

    /// Attaches the candidate to a low-voltage grid with the given distance score.
    pub fn with_grid(mut self, lv_grid_id: u32, distance_weight: f64) -> Self {
        self.lv_grid_id = Some(lv_grid_id);
        self.distance_weight = distance_weight;
        self
    }
}

/// Immutable, indexed table of candidate charging points.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    points: Vec<CandidateChargingPoint>,
}

impl CandidatePool {
    /// Wraps an already ordered candidate table; indices follow vector order.
    pub fn new(points: Vec<CandidateChargingPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CandidateChargingPoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[CandidateChargingPoint] {
        &self.points
    }

    /// Indices of all candidates of `use_case`, optionally restricted to a region.
    pub fn indices(&self, use_case: UseCase, region: Option<u32>) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.use_case == use_case && region.is_none_or(|r| p.region == r))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of candidates of `use_case`.
    pub fn count(&self, use_case: UseCase) -> usize {
        self.points.iter().filter(|p| p.use_case == use_case).count()
    }
}
