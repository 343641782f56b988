//! Reuse bookkeeping for public charging points.

use std::collections::BTreeMap;

use crate::model::UseCase;

/// State of one minted public charging point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailabilityRecord {
    /// Time step until which the point is occupied.
    pub park_end: u32,
    /// Charging power of the point (kW).
    pub charging_power_kw: f64,
    /// Candidate index of the park the point belongs to.
    pub charging_park_id: usize,
    pub use_case: UseCase,
}

/// Public charging points keyed by charging point id.
///
/// Records are never removed; reuse only moves `park_end` forward.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    records: BTreeMap<usize, AvailabilityRecord>,
}

/// Power rounded to one decimal (ties to even), as an integer count of 0.1 kW.
fn power_key(kw: f64) -> i64 {
    (kw * 10.0).round_ties_even() as i64
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, charging_point_id: usize) -> Option<&AvailabilityRecord> {
        self.records.get(&charging_point_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AvailabilityRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    /// Registers a newly minted point.
    pub fn insert(&mut self, charging_point_id: usize, record: AvailabilityRecord) {
        self.records.insert(charging_point_id, record);
    }

    /// Ids of points that are free before `park_end` and charge with the
    /// same power (rounded to 0.1 kW), in ascending id order.
    pub fn matching(&self, park_end: u32, charging_power_kw: f64, use_case: UseCase) -> Vec<usize> {
        let key = power_key(charging_power_kw);
        self.records
            .iter()
            .filter(|(_, r)| {
                r.park_end < park_end
                    && power_key(r.charging_power_kw) == key
                    && r.use_case == use_case
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Marks a point as occupied until `park_end`.
    ///
    /// Returns `false` if the point is unknown.
    pub fn occupy(&mut self, charging_point_id: usize, park_end: u32) -> bool {
        match self.records.get_mut(&charging_point_id) {
            Some(record) => {
                record.park_end = park_end;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(park_end: u32, kw: f64) -> AvailabilityRecord {
        AvailabilityRecord {
            park_end,
            charging_power_kw: kw,
            charging_park_id: 0,
            use_case: UseCase::Public,
        }
    }

    #[test]
    fn free_time_must_be_strictly_earlier() {
        let mut idx = AvailabilityIndex::new();
        idx.insert(0, record(10, 11.0));
        assert!(idx.matching(10, 11.0, UseCase::Public).is_empty());
        assert_eq!(idx.matching(11, 11.0, UseCase::Public), vec![0]);
    }

    #[test]
    fn power_compared_at_one_decimal() {
        let mut idx = AvailabilityIndex::new();
        idx.insert(0, record(1, 11.04));
        idx.insert(1, record(1, 3.7));
        assert_eq!(idx.matching(5, 10.96, UseCase::Public), vec![0]);
        assert!(idx.matching(5, 11.2, UseCase::Public).is_empty());
        assert_eq!(idx.matching(5, 3.7, UseCase::Public), vec![1]);
    }

    #[test]
    fn power_ties_round_to_even() {
        let mut idx = AvailabilityIndex::new();
        idx.insert(0, record(1, 3.2));
        idx.insert(1, record(1, 3.4));
        // 3.25 lies exactly on the tie and rounds to 3.2
        assert_eq!(idx.matching(5, 3.25, UseCase::Public), vec![0]);
        assert!(idx.matching(5, 3.3, UseCase::Public).is_empty());
    }

    #[test]
    fn use_case_must_match() {
        let mut idx = AvailabilityIndex::new();
        idx.insert(4, record(1, 50.0));
        assert!(idx.matching(5, 50.0, UseCase::Hpc).is_empty());
    }

    #[test]
    fn occupy_moves_free_time_forward() {
        let mut idx = AvailabilityIndex::new();
        idx.insert(2, record(3, 11.0));
        assert!(idx.occupy(2, 8));
        assert_eq!(idx.get(2).map(|r| r.park_end), Some(8));
        assert!(!idx.occupy(9, 8));
        assert_eq!(idx.len(), 1);
    }
}
