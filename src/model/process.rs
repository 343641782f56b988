use std::fmt;
use std::str::FromStr;

/// Whether a charging process takes place at a private or a public point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemandClass {
    Private,
    Public,
}

impl DemandClass {
    pub fn as_str(self) -> &'static str {
        match self {
            DemandClass::Private => "private",
            DemandClass::Public => "public",
        }
    }
}

impl fmt::Display for DemandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemandClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(DemandClass::Private),
            "public" => Ok(DemandClass::Public),
            other => Err(format!("unknown demand class \"{other}\"")),
        }
    }
}

/// One EV's parking and charging event.
///
/// The allocation engine fills in `charging_park_id` (index of the chosen
/// candidate grid connection) and `charging_point_id` (synthetic point id).
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingProcess {
    /// Region code (AGS) the car belongs to.
    pub region: u32,
    pub car_id: u32,
    /// Trip destination code, e.g. `"6_home"`.
    pub destination: String,
    pub demand: DemandClass,
    /// Requested grid charging power (kW).
    pub charging_power_kw: f64,
    /// Energy demand of the process (kWh).
    pub energy_demand_kwh: f64,
    /// First parking time step.
    pub park_start: u32,
    /// Last parking time step.
    pub park_end: u32,
    pub charging_park_id: Option<usize>,
    pub charging_point_id: Option<usize>,
}

impl ChargingProcess {
    /// Creates an unassigned charging process.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        region: u32,
        car_id: u32,
        destination: impl Into<String>,
        demand: DemandClass,
        charging_power_kw: f64,
        energy_demand_kwh: f64,
        park_start: u32,
        park_end: u32,
    ) -> Self {
        Self {
            region,
            car_id,
            destination: destination.into(),
            demand,
            charging_power_kw,
            energy_demand_kwh,
            park_start,
            park_end,
            charging_park_id: None,
            charging_point_id: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.charging_park_id.is_some() && self.charging_point_id.is_some()
    }

    pub(crate) fn assign(&mut self, charging_park_id: usize, charging_point_id: usize) {
        self.charging_park_id = Some(charging_park_id);
        self.charging_point_id = Some(charging_point_id);
    }
}

/// Number of distinct cars in a process table.
pub fn count_cars(processes: &[ChargingProcess]) -> usize {
    let mut ids: Vec<u32> = processes.iter().map(|p| p.car_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

/// Largest park end step in a process table, or 0 for an empty table.
pub fn last_time_step(processes: &[ChargingProcess]) -> u32 {
    processes.iter().map(|p| p.park_end).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_process_is_unassigned() {
        let p = ChargingProcess::new(1, 0, "6_home", DemandClass::Private, 11.0, 5.0, 0, 4);
        assert!(!p.is_assigned());
    }

    #[test]
    fn counts_distinct_cars() {
        let processes = vec![
            ChargingProcess::new(1, 3, "6_home", DemandClass::Private, 11.0, 5.0, 0, 4),
            ChargingProcess::new(1, 3, "0_work", DemandClass::Private, 11.0, 5.0, 5, 9),
            ChargingProcess::new(1, 7, "6_home", DemandClass::Private, 11.0, 5.0, 0, 4),
        ];
        assert_eq!(count_cars(&processes), 2);
        assert_eq!(last_time_step(&processes), 9);
        assert_eq!(last_time_step(&[]), 0);
    }

    #[test]
    fn parses_demand_class() {
        assert_eq!("private".parse::<DemandClass>(), Ok(DemandClass::Private));
        assert_eq!("public".parse::<DemandClass>(), Ok(DemandClass::Public));
        assert!("hpc".parse::<DemandClass>().is_err());
    }
}
