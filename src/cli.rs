use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub data: PathBuf,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut data = None;
    let mut config = None;
    let mut preset = None;
    let mut seed = None;
    let mut out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --data (expected a directory)")?;
                if data.replace(PathBuf::from(path)).is_some() {
                    return Err("--data provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{value}\" is not a valid u64"))?;
                if seed.replace(parsed).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a directory)")?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let data = data.ok_or_else(|| "missing required argument --data".to_string())?;

    Ok(CliOptions {
        data,
        config,
        preset,
        seed,
        out,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("emob-alloc: distribute EV charging demand onto grid connection points");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  emob-alloc --data <dir> [--config <path> | --preset <name>] [--seed <u64>] [--out <dir>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data <dir>       Directory holding the demand simulation output");
    eprintln!("  --config <path>    Load configuration from a TOML file");
    eprintln!("  --preset <name>    Use a built-in preset (user_friendly, grid_friendly)");
    eprintln!("  --seed <u64>       Override the grid seed");
    eprintln!("  --out <dir>        Write assignments.csv and designated_capacity.csv");
    eprintln!("  --help             Show this help message");
}
