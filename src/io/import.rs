//! CSV import of charging processes, demand simulation parameters, candidate
//! grid connections and LV grid weights.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::model::{
    CandidateChargingPoint, ChargingProcess, DemandClass, LvGridWeights, RunParameters, UseCase,
    process::last_time_step,
};

/// Which parking events are imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkingTimesMode {
    /// Only parking events with a positive charging demand.
    Frugal,
    /// Every parking event.
    Full,
}

impl FromStr for ParkingTimesMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frugal" => Ok(ParkingTimesMode::Frugal),
            "full" => Ok(ParkingTimesMode::Full),
            other => Err(format!("unknown parking times mode \"{other}\"")),
        }
    }
}

/// Import failure.
#[derive(Debug)]
pub enum ImportError {
    /// The process directory holds no CSV files.
    NoProcessFiles(PathBuf),
    Io { path: PathBuf, source: io::Error },
    Csv { path: PathBuf, source: csv::Error },
    /// A file name or field could not be interpreted.
    Malformed { path: PathBuf, message: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoProcessFiles(path) => {
                write!(f, "import error: no CSV files found in \"{}\"", path.display())
            }
            ImportError::Io { path, source } => {
                write!(f, "import error: cannot read \"{}\": {source}", path.display())
            }
            ImportError::Csv { path, source } => {
                write!(f, "import error: invalid CSV \"{}\": {source}", path.display())
            }
            ImportError::Malformed { path, message } => {
                write!(f, "import error: \"{}\": {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io { source, .. } => Some(source),
            ImportError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One row of a demand simulation output file.
#[derive(Debug, Deserialize)]
struct ProcessRow {
    #[serde(alias = "location")]
    destination: String,
    use_case: String,
    #[serde(rename = "grid_charging_capacity_kW", alias = "netto_charging_capacity")]
    charging_power_kw: f64,
    #[serde(rename = "chargingdemand_kWh")]
    energy_demand_kwh: f64,
    park_start_timesteps: u32,
    park_end_timesteps: u32,
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(default)]
    user_centric_weight: f64,
    #[serde(default)]
    lv_grid_id: Option<u32>,
    #[serde(default)]
    distance_weight: f64,
}

#[derive(Debug, Deserialize)]
struct LvGridRow {
    lv_grid_id: u32,
    generators_weight: f64,
    loads_weight: f64,
}

fn collect_csv_files(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_csv_files(&path, true, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "csv") {
            out.push(path);
        }
    }
    Ok(())
}

/// Region code of a process file: the directory two levels above the file.
fn region_of(path: &Path) -> Result<u32, ImportError> {
    path.parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| ImportError::Malformed {
            path: path.to_path_buf(),
            message: "no numeric region directory two levels above the file".to_string(),
        })
}

fn read_process_file(
    path: &Path,
    car_id: u32,
    mode: ParkingTimesMode,
) -> Result<Vec<ChargingProcess>, ImportError> {
    let region = region_of(path)?;
    let mut rdr = csv::Reader::from_path(path).map_err(|source| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let mut processes = Vec::new();
    for row in rdr.deserialize::<ProcessRow>() {
        let row = row.map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if mode == ParkingTimesMode::Frugal && row.energy_demand_kwh <= 0.0 {
            continue;
        }
        let demand = row
            .use_case
            .parse::<DemandClass>()
            .map_err(|message| ImportError::Malformed {
                path: path.to_path_buf(),
                message,
            })?;
        processes.push(ChargingProcess::new(
            region,
            car_id,
            row.destination,
            demand,
            row.charging_power_kw,
            row.energy_demand_kwh,
            row.park_start_timesteps,
            row.park_end_timesteps,
        ));
    }
    Ok(processes)
}

/// Reads all charging process CSVs below `dir`.
///
/// Files are visited in path order and each file is one car; its position is
/// the car id. The region code is the directory two levels above the file.
/// Files that fail to parse are skipped with a warning.
///
/// # Errors
///
/// Returns `ImportError::NoProcessFiles` if `dir` holds no CSV files and
/// `ImportError::Io` if the directory cannot be listed.
pub fn read_charging_processes(
    dir: &Path,
    mode: ParkingTimesMode,
) -> Result<Vec<ChargingProcess>, ImportError> {
    let mut files = Vec::new();
    collect_csv_files(dir, true, &mut files).map_err(|source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if files.is_empty() {
        return Err(ImportError::NoProcessFiles(dir.to_path_buf()));
    }
    files.sort();

    let mut processes = Vec::new();
    for (car_id, file) in files.iter().enumerate() {
        match read_process_file(file, car_id as u32, mode) {
            Ok(mut rows) => processes.append(&mut rows),
            Err(e) => tracing::warn!(file = %file.display(), error = %e, "file couldn't be read and is skipped"),
        }
    }
    tracing::info!(files = files.len(), processes = processes.len(), "charging processes imported");
    Ok(processes)
}

fn parse_run_parameters(path: &Path, last_step: u32) -> Result<RunParameters, ImportError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|source| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let mut params = RunParameters::fallback(last_step);
    for record in rdr.records() {
        let record = record.map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let (Some(key), Some(value)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let malformed = |message: String| ImportError::Malformed {
            path: path.to_path_buf(),
            message,
        };
        let value = value.trim();
        match key.trim() {
            "eta_cp" => {
                params.eta_cp = value
                    .parse()
                    .map_err(|e| malformed(format!("eta_cp \"{value}\": {e}")))?;
            }
            "stepsize" => {
                params.stepsize_min = value
                    .parse()
                    .map_err(|e| malformed(format!("stepsize \"{value}\": {e}")))?;
            }
            "simulated_days" => {
                params.simulated_days = value
                    .parse()
                    .map_err(|e| malformed(format!("simulated_days \"{value}\": {e}")))?;
            }
            _ => {}
        }
    }
    if !(params.eta_cp > 0.0 && params.eta_cp <= 1.0) {
        return Err(malformed_eta(path, params.eta_cp));
    }
    Ok(params)
}

fn malformed_eta(path: &Path, eta_cp: f64) -> ImportError {
    ImportError::Malformed {
        path: path.to_path_buf(),
        message: format!("eta_cp {eta_cp} is outside (0, 1]"),
    }
}

/// Reads the demand simulation parameters from a `key,value` CSV.
///
/// Never fails: an unreadable file falls back to full efficiency, 15 minute
/// steps and a day count estimated from the processes, with a warning.
/// Keys missing from a readable file take the same fallback values.
pub fn read_run_parameters(path: &Path, processes: &[ChargingProcess]) -> RunParameters {
    let last_step = last_time_step(processes);
    match parse_run_parameters(path, last_step) {
        Ok(params) => params,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "run config could not be imported, charging point efficiency is set to 100%, \
                 the stepsize to 15 minutes and the simulated days are estimated from the \
                 charging processes"
            );
            RunParameters::fallback(last_step)
        }
    }
}

/// Use-case and region encoded in a grid connection file name
/// `<prefix>_<use_case>_<region>.csv`.
fn candidate_file_info(path: &Path) -> Result<(UseCase, u32), ImportError> {
    let malformed = |message: String| ImportError::Malformed {
        path: path.to_path_buf(),
        message,
    };
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| malformed("file name is not valid UTF-8".to_string()))?;
    let parts: Vec<&str> = stem.split('_').collect();
    let (Some(use_case), Some(region)) = (parts.get(1), parts.get(2)) else {
        return Err(malformed(
            "expected a file name like <prefix>_<use_case>_<region>.csv".to_string(),
        ));
    };
    let use_case = use_case.parse::<UseCase>().map_err(malformed)?;
    let region = region
        .parse::<u32>()
        .map_err(|e| malformed(format!("region \"{region}\": {e}")))?;
    Ok((use_case, region))
}

/// Reads all candidate grid connection CSVs in `dir` (not recursive).
///
/// # Errors
///
/// Returns an `ImportError` if the directory cannot be listed, a file name
/// does not follow `<prefix>_<use_case>_<region>.csv` or a file is not valid CSV.
pub fn read_grid_connections(dir: &Path) -> Result<Vec<CandidateChargingPoint>, ImportError> {
    let mut files = Vec::new();
    collect_csv_files(dir, false, &mut files).map_err(|source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    files.sort();

    let mut candidates = Vec::new();
    for file in &files {
        let (use_case, region) = candidate_file_info(file)?;
        let mut rdr = csv::Reader::from_path(file).map_err(|source| ImportError::Csv {
            path: file.clone(),
            source,
        })?;
        for row in rdr.deserialize::<CandidateRow>() {
            let row = row.map_err(|source| ImportError::Csv {
                path: file.clone(),
                source,
            })?;
            candidates.push(CandidateChargingPoint {
                region,
                use_case,
                user_centric_weight: row.user_centric_weight,
                lv_grid_id: row.lv_grid_id,
                distance_weight: row.distance_weight,
            });
        }
    }
    tracing::info!(files = files.len(), candidates = candidates.len(), "grid connections imported");
    Ok(candidates)
}

/// Reads LV grid generation and load weights keyed by LV grid id.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read or parsed.
pub fn read_lv_grids(path: &Path) -> Result<HashMap<u32, LvGridWeights>, ImportError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|source| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let mut grids = HashMap::new();
    for row in rdr.deserialize::<LvGridRow>() {
        let row = row.map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        grids.insert(
            row.lv_grid_id,
            LvGridWeights {
                generators_weight: row.generators_weight,
                loads_weight: row.loads_weight,
            },
        );
    }
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parking_times_mode() {
        assert_eq!("frugal".parse::<ParkingTimesMode>(), Ok(ParkingTimesMode::Frugal));
        assert_eq!("full".parse::<ParkingTimesMode>(), Ok(ParkingTimesMode::Full));
        assert!("some".parse::<ParkingTimesMode>().is_err());
    }

    #[test]
    fn region_is_two_levels_up() {
        let path = Path::new("run/simbev_run/9162000/cars/car_001.csv");
        assert_eq!(region_of(path).ok(), Some(9_162_000));
        assert!(region_of(Path::new("run/cars/car_001.csv")).is_err());
    }

    #[test]
    fn candidate_file_name_carries_use_case_and_region() {
        let info = candidate_file_info(Path::new("gc/potential_uc3_9162000.csv")).ok();
        assert_eq!(info, Some((UseCase::Home, 9_162_000)));
        let info = candidate_file_info(Path::new("gc/gc_public_5.csv")).ok();
        assert_eq!(info, Some((UseCase::Public, 5)));
        assert!(candidate_file_info(Path::new("gc/weights.csv")).is_err());
        assert!(candidate_file_info(Path::new("gc/gc_uc9_5.csv")).is_err());
    }
}
