//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use emob_alloc::model::{
    CandidateChargingPoint, CandidatePool, ChargingProcess, DemandClass, RunParameters, UseCase,
};

/// Grid seed used across integration tests.
pub const SEED: u64 = 2534;

/// Run parameters with 90% charging point efficiency.
pub fn run_parameters() -> RunParameters {
    RunParameters {
        eta_cp: 0.9,
        stepsize_min: 15,
        simulated_days: 7,
    }
}

/// Candidates for two regions: 3 home points each, 3 work, 4 public, 1 hpc.
pub fn candidates() -> Vec<CandidateChargingPoint> {
    let mut v = Vec::new();
    for region in [1, 2] {
        for w in [0.9, 0.5, 0.1] {
            v.push(CandidateChargingPoint::new(region, UseCase::Home, w));
        }
    }
    for (i, w) in [1.0, 0.6, 0.2].into_iter().enumerate() {
        v.push(CandidateChargingPoint::new(1, UseCase::Work, w).with_grid(i as u32, 0.5));
    }
    for (i, w) in [0.8, 0.7, 0.3, 0.0].into_iter().enumerate() {
        v.push(CandidateChargingPoint::new(2, UseCase::Public, w).with_grid(i as u32, 0.2));
    }
    v.push(CandidateChargingPoint::new(1, UseCase::Hpc, 1.0));
    v
}

/// Candidate pool in fixture order (no preparation).
pub fn pool() -> CandidatePool {
    CandidatePool::new(candidates())
}

fn process(
    region: u32,
    car: u32,
    destination: &str,
    demand: DemandClass,
    kw: f64,
    start: u32,
    end: u32,
) -> ChargingProcess {
    ChargingProcess::new(region, car, destination, demand, kw, 12.0, start, end)
}

/// A week of charging for 6 cars in 2 regions, private and public.
pub fn processes() -> Vec<ChargingProcess> {
    let mut v = Vec::new();
    for car in 0..6_u32 {
        let region = 1 + car % 2;
        let kw = if car % 3 == 0 { 11.0 } else { 3.7 };
        for day in 0..3_u32 {
            let base = day * 96;
            v.push(process(region, car, "6_home", DemandClass::Private, kw, base, base + 28));
            if car < 4 {
                v.push(process(region, car, "0_work", DemandClass::Private, kw, base + 32, base + 64));
            }
            let purpose = ["3_shopping", "5_leisure", "1_business"][(car % 3) as usize];
            let start = base + 66 + car;
            v.push(process(region, car, purpose, DemandClass::Public, 22.0, start, start + 4));
        }
    }
    v.push(process(1, 6, "7_charging_hub", DemandClass::Public, 150.0, 40, 42));
    v
}

/// Fresh scratch directory below the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("emob-alloc-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}
