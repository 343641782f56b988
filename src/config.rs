//! TOML-based allocation configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::alloc::weights::{WeightMode, WeightParams};
use crate::io::import::ParkingTimesMode;
use crate::pool::{MAX_GC_TO_CAR_RATE, PoolRates};

/// Top-level allocation configuration parsed from TOML.
///
/// All fields have defaults matching the `user_friendly` preset. Load from
/// TOML with [`AllocationConfig::from_toml_file`] or use
/// [`AllocationConfig::user_friendly`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocationConfig {
    /// Input layout and run-level parameters.
    #[serde(default)]
    pub run: RunConfig,
    /// Weight model parameters.
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Minimum grid connection to car ratios.
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Input layout and run-level parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Grid seed for all random draws. Unseeded runs are not reproducible.
    pub seed: Option<u64>,
    /// Sub-directory holding the charging process CSVs.
    pub processes_dir: String,
    /// File name of the demand simulation config.
    pub run_config_file: String,
    /// Sub-directory holding the grid connection CSVs.
    pub grid_connections_dir: String,
    /// Optional file with LV grid generation/load weights.
    pub lv_grids_file: Option<String>,
    /// `"frugal"` keeps only processes with charging demand, `"full"` keeps all.
    pub mode_parking_times: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            processes_dir: "simbev_run".to_string(),
            run_config_file: "config_data.csv".to_string(),
            grid_connections_dir: "grid_connections".to_string(),
            lv_grids_file: None,
            mode_parking_times: "frugal".to_string(),
        }
    }
}

/// Weight model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightsConfig {
    /// Weight mode: `"user_friendly"` or `"grid_friendly"`.
    pub mode: String,
    /// Share of the user-centric weight (0.0–1.0).
    pub user_friendly_weight: f64,
    /// Share of the substation distance in the grid score (0.0–1.0).
    pub distance_weight: f64,
    /// Share of generation against load in the LV grid balance (0.0–1.0).
    pub generators_weight_factor: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            mode: "user_friendly".to_string(),
            user_friendly_weight: 0.5,
            distance_weight: 1.0 / 3.0,
            generators_weight_factor: 0.5,
        }
    }
}

/// Minimum grid connection to car ratios per use-case.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    pub gc_to_car_rate_home: f64,
    pub gc_to_car_rate_work: f64,
    pub gc_to_car_rate_public: f64,
    pub gc_to_car_rate_hpc: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let rates = PoolRates::default();
        Self {
            gc_to_car_rate_home: rates.home,
            gc_to_car_rate_work: rates.work,
            gc_to_car_rate_public: rates.public,
            gc_to_car_rate_hpc: rates.hpc,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"weights.mode"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AllocationConfig {
    /// Returns the default configuration: user-centric weights only.
    pub fn user_friendly() -> Self {
        Self {
            run: RunConfig::default(),
            weights: WeightsConfig::default(),
            pool: PoolConfig::default(),
        }
    }

    /// Returns the grid-friendly preset: public points also respect LV grid
    /// balance and substation distance.
    pub fn grid_friendly() -> Self {
        Self {
            weights: WeightsConfig {
                mode: "grid_friendly".to_string(),
                ..WeightsConfig::default()
            },
            ..Self::user_friendly()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["user_friendly", "grid_friendly"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "user_friendly" => Ok(Self::user_friendly()),
            "grid_friendly" => Ok(Self::grid_friendly()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Weight model parameters. Assumes a validated configuration; an
    /// unknown mode falls back to user-friendly weights.
    pub fn weight_params(&self) -> WeightParams {
        let w = &self.weights;
        WeightParams {
            mode: w.mode.parse().unwrap_or(WeightMode::UserFriendly),
            user_friendly_weight: w.user_friendly_weight,
            distance_weight: w.distance_weight,
            generators_weight_factor: w.generators_weight_factor,
        }
    }

    pub fn pool_rates(&self) -> PoolRates {
        let p = &self.pool;
        PoolRates {
            home: p.gc_to_car_rate_home,
            work: p.gc_to_car_rate_work,
            public: p.gc_to_car_rate_public,
            hpc: p.gc_to_car_rate_hpc,
        }
    }

    /// Parking times import mode. Assumes a validated configuration.
    pub fn parking_times_mode(&self) -> ParkingTimesMode {
        self.run
            .mode_parking_times
            .parse()
            .unwrap_or(ParkingTimesMode::Frugal)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let r = &self.run;
        if r.mode_parking_times.parse::<ParkingTimesMode>().is_err() {
            errors.push(ConfigError {
                field: "run.mode_parking_times".into(),
                message: format!(
                    "must be \"frugal\" or \"full\", got \"{}\"",
                    r.mode_parking_times
                ),
            });
        }
        if r.processes_dir.is_empty() {
            errors.push(ConfigError {
                field: "run.processes_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if r.grid_connections_dir.is_empty() {
            errors.push(ConfigError {
                field: "run.grid_connections_dir".into(),
                message: "must not be empty".into(),
            });
        }

        let w = &self.weights;
        if w.mode.parse::<WeightMode>().is_err() {
            errors.push(ConfigError {
                field: "weights.mode".into(),
                message: format!(
                    "must be \"user_friendly\" or \"grid_friendly\", got \"{}\"",
                    w.mode
                ),
            });
        }
        for (field, value) in [
            ("weights.user_friendly_weight", w.user_friendly_weight),
            ("weights.distance_weight", w.distance_weight),
            ("weights.generators_weight_factor", w.generators_weight_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
        }

        let p = &self.pool;
        for (field, value) in [
            ("pool.gc_to_car_rate_home", p.gc_to_car_rate_home),
            ("pool.gc_to_car_rate_work", p.gc_to_car_rate_work),
            ("pool.gc_to_car_rate_public", p.gc_to_car_rate_public),
            ("pool.gc_to_car_rate_hpc", p.gc_to_car_rate_hpc),
        ] {
            if !(0.0..=MAX_GC_TO_CAR_RATE).contains(&value) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: format!("must be in [0.0, {MAX_GC_TO_CAR_RATE}]"),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_valid() {
        let cfg = AllocationConfig::user_friendly();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = AllocationConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in AllocationConfig::PRESETS {
            let cfg = AllocationConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn grid_friendly_preset_switches_mode() {
        let cfg = AllocationConfig::grid_friendly();
        assert_eq!(cfg.weight_params().mode, WeightMode::GridFriendly);
        assert_eq!(
            AllocationConfig::user_friendly().weight_params().mode,
            WeightMode::UserFriendly
        );
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[run]
seed = 2534
processes_dir = "simbev"
mode_parking_times = "full"
lv_grids_file = "lv_grids.csv"

[weights]
mode = "grid_friendly"
user_friendly_weight = 0.7
distance_weight = 0.25
generators_weight_factor = 0.4

[pool]
gc_to_car_rate_home = 0.6
gc_to_car_rate_hpc = 0.01
"#;
        let cfg = AllocationConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().and_then(|c| c.run.seed), Some(2534));
        assert_eq!(
            cfg.as_ref().map(|c| c.parking_times_mode()),
            Some(ParkingTimesMode::Full)
        );
        assert_eq!(cfg.as_ref().map(|c| c.pool_rates().home), Some(0.6));
        // unspecified rates keep their defaults
        assert_eq!(cfg.as_ref().map(|c| c.pool_rates().work), Some(0.25));
        assert_eq!(
            cfg.as_ref().map(|c| c.weight_params().user_friendly_weight),
            Some(0.7)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[weights]
mode = "user_friendly"
bogus_field = true
"#;
        let result = AllocationConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_bad_mode() {
        let mut cfg = AllocationConfig::user_friendly();
        cfg.weights.mode = "cheapest".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weights.mode"));
    }

    #[test]
    fn validation_catches_out_of_range_factor() {
        let mut cfg = AllocationConfig::user_friendly();
        cfg.weights.distance_weight = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weights.distance_weight"));
    }

    #[test]
    fn validation_catches_negative_rate() {
        let mut cfg = AllocationConfig::user_friendly();
        cfg.pool.gc_to_car_rate_work = -0.1;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pool.gc_to_car_rate_work"));
    }

    #[test]
    fn validation_catches_oversized_rate() {
        let mut cfg = AllocationConfig::user_friendly();
        cfg.pool.gc_to_car_rate_home = 1e9;
        cfg.pool.gc_to_car_rate_hpc = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pool.gc_to_car_rate_home"));
        assert!(errors.iter().any(|e| e.field == "pool.gc_to_car_rate_hpc"));
    }

    #[test]
    fn validation_catches_bad_parking_mode() {
        let mut cfg = AllocationConfig::user_friendly();
        cfg.run.mode_parking_times = "lavish".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "run.mode_parking_times"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[run]
seed = 99
"#;
        let cfg = AllocationConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().and_then(|c| c.run.seed), Some(99));
        assert_eq!(
            cfg.as_ref().map(|c| c.run.grid_connections_dir.as_str()),
            Some("grid_connections")
        );
        assert_eq!(cfg.as_ref().map(|c| c.weights.mode.as_str()), Some("user_friendly"));
    }
}
