//! CSV export of assignments and designated capacity.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::alloc::DesignatedCapacity;
use crate::alloc::capacity::grid_connection_capacity;
use crate::model::{CandidatePool, ChargingProcess};

/// Column header of the assignment export.
const ASSIGNMENT_HEADER: &str = "ags,car_id,destination,use_case,\
                                 grid_charging_capacity_kW,chargingdemand_kWh,\
                                 park_start_timesteps,park_end_timesteps,\
                                 charging_park_id,charging_point_id";

/// Column header of the designated capacity export.
const CAPACITY_HEADER: &str = "charging_park_id,use_case,ags,\
                               designated_charging_point_capacity_kW,\
                               grid_connection_capacity_kW";

fn optional(id: Option<usize>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

/// Exports the process table with its assignment columns to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_assignments(processes: &[ChargingProcess], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_assignments(processes, io::BufWriter::new(file))
}

/// Writes the process table with its assignment columns as CSV.
///
/// Unassigned processes have empty id columns.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_assignments(processes: &[ChargingProcess], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(ASSIGNMENT_HEADER.split(',').map(str::trim))?;

    for p in processes {
        wtr.write_record(&[
            p.region.to_string(),
            p.car_id.to_string(),
            p.destination.clone(),
            p.demand.to_string(),
            format!("{:.4}", p.charging_power_kw),
            format!("{:.4}", p.energy_demand_kwh),
            p.park_start.to_string(),
            p.park_end.to_string(),
            optional(p.charging_park_id),
            optional(p.charging_point_id),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports designated capacity per candidate to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_designated_capacity(
    pool: &CandidatePool,
    capacity: &DesignatedCapacity,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_designated_capacity(pool, capacity, io::BufWriter::new(file))
}

/// Writes one row per candidate carrying designated capacity, together with
/// the grid connection capacity that capacity requires.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_designated_capacity(
    pool: &CandidatePool,
    capacity: &DesignatedCapacity,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(CAPACITY_HEADER.split(',').map(str::trim))?;

    for (index, point) in pool.points().iter().enumerate() {
        let kw = capacity.get(index);
        if kw <= 0.0 {
            continue;
        }
        wtr.write_record(&[
            index.to_string(),
            point.use_case.to_string(),
            point.region.to_string(),
            format!("{kw:.4}"),
            format!("{:.4}", grid_connection_capacity(kw)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateChargingPoint, DemandClass, UseCase};

    fn processes() -> Vec<ChargingProcess> {
        let mut a = ChargingProcess::new(5, 0, "6_home", DemandClass::Private, 11.0, 8.5, 0, 12);
        a.assign(1, 0);
        let b = ChargingProcess::new(5, 1, "3_shopping", DemandClass::Public, 22.0, 4.0, 3, 5);
        vec![a, b]
    }

    #[test]
    fn assignment_header_and_rows() {
        let mut buf = Vec::new();
        write_assignments(&processes(), &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "ags,car_id,destination,use_case,grid_charging_capacity_kW,chargingdemand_kWh,\
             park_start_timesteps,park_end_timesteps,charging_park_id,charging_point_id"
        );
        assert_eq!(lines[1], "5,0,6_home,private,11.0000,8.5000,0,12,1,0");
        // unassigned ids stay empty
        assert!(lines[2].ends_with(",,"));
    }

    #[test]
    fn capacity_rows_skip_unused_candidates() {
        let pool = CandidatePool::new(vec![
            CandidateChargingPoint::new(5, UseCase::Public, 1.0),
            CandidateChargingPoint::new(5, UseCase::Public, 0.5),
        ]);
        let mut capacity = DesignatedCapacity::new(2);
        capacity.add(1, 650.0);

        let mut buf = Vec::new();
        write_designated_capacity(&pool, &capacity, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "1,public,5,650.0000,471.2500");
    }

    #[test]
    fn deterministic_output() {
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_assignments(&processes(), &mut buf1).ok();
        write_assignments(&processes(), &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn assignments_are_parseable() {
        let mut buf = Vec::new();
        write_assignments(&processes(), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(10));
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(8), Some("1"));
        assert_eq!(rows[1].get(9), Some(""));
    }
}
