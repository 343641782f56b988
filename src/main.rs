//! emob-alloc entry point: CLI wiring, config loading, run and export.

use std::fs;
use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use emob_alloc::cli::{parse_args, print_usage};
use emob_alloc::config::AllocationConfig;
use emob_alloc::io::export::{export_assignments, export_designated_capacity};
use emob_alloc::runner::{RunOutput, run};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn export(output: &RunOutput, dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    export_assignments(&output.processes, &dir.join("assignments.csv"))?;
    export_designated_capacity(
        &output.pool,
        &output.outcome.public_capacity,
        &dir.join("designated_capacity.csv"),
    )
}

fn main() {
    init_logging();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };

    // --config takes priority, then --preset, then the user-friendly default
    let mut config = if let Some(ref path) = cli.config {
        match AllocationConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match AllocationConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        AllocationConfig::user_friendly()
    };

    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let output = match run(&config, &cli.data) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!("{}", output.outcome.report);

    if let Some(ref dir) = cli.out {
        if let Err(e) = export(&output, dir) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Assignments written to {}", dir.display());
    }
}
