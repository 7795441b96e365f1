//! # Configuration Management
//!
//! This module handles loading and saving the field-config.toml file. It
//! describes the field, the implement, prices, the time budget, the speed
//! range searched and the fuel-rate curve, plus the optional advisor
//! endpoint.
//!
//! A missing file falls back to the built-in defaults. A file that exists but
//! does not parse is an error: running on defaults would silently price the
//! wrong field.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::error::ModelError;
use crate::fuel_curve::{FuelCurve, Operation};
use crate::optimizer::DEFAULT_SAMPLE_COUNT;
use crate::params::{ParameterInput, UnitParameters};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "field-config.toml";

/// Errors from reading or writing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config format: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialization: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from field-config.toml
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub field: FieldConfig,
    pub implement: ImplementConfig,
    pub costs: CostConfig,
    pub schedule: ScheduleConfig,
    pub speed: SpeedConfig,
    pub fuel_curve: FuelCurveConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FieldConfig {
    /// Area to cover in hectares
    pub area_ha: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ImplementConfig {
    /// Working width in metres
    pub width_m: f64,
    /// Field efficiency (turns, overlap, stops), in (0, 1]
    pub efficiency: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CostConfig {
    /// Price per litre of fuel
    pub fuel_price: f64,
    /// Operator cost per hour
    pub labor_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Hours available to finish the field
    pub time_budget_h: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SpeedConfig {
    pub min_kmh: f64,
    pub max_kmh: f64,
    /// Grid samples used by the search and the charts
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

/// Fuel-rate curve as written in the config file.
///
/// `operation` presets need the implement geometry, so they are resolved into
/// a [`FuelCurve`] only when parameters are assembled.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FuelCurveConfig {
    Polynomial { coefficients: Vec<f64> },
    Piecewise { points: Vec<(f64, f64)> },
    Operation { operation: Operation },
}

impl FuelCurveConfig {
    /// The preset operation, when the curve comes from one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            FuelCurveConfig::Operation { operation } => Some(*operation),
            _ => None,
        }
    }

    pub fn resolve(&self, width_m: f64, efficiency: f64) -> FuelCurve {
        match self {
            FuelCurveConfig::Polynomial { coefficients } => FuelCurve::Polynomial {
                coefficients: coefficients.clone(),
            },
            FuelCurveConfig::Piecewise { points } => FuelCurve::Piecewise {
                points: points.clone(),
            },
            FuelCurveConfig::Operation { operation } => {
                FuelCurve::for_operation(*operation, width_m, efficiency)
            }
        }
    }
}

/// Chat-completions endpoint used by `--advise`
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            endpoint: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            field: FieldConfig { area_ha: 5.0 },
            implement: ImplementConfig {
                width_m: 1.8,
                efficiency: 0.75,
            },
            costs: CostConfig {
                fuel_price: 1379.0,
                labor_rate: 3000.0,
            },
            schedule: ScheduleConfig { time_budget_h: 8.0 },
            speed: SpeedConfig {
                min_kmh: 3.0,
                max_kmh: 10.0,
                sample_count: DEFAULT_SAMPLE_COUNT,
            },
            fuel_curve: FuelCurveConfig::Operation {
                operation: Operation::Ploughing,
            },
            advisor: AdvisorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from field-config.toml in the working directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from the given path.
    /// A missing file yields the default configuration.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = toml::from_str::<Config>(&contents)?;
                info!(
                    path = %path.display(),
                    area_ha = config.field.area_ha,
                    "loaded configuration"
                );
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save the configuration as pretty TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Unvalidated model inputs described by this configuration.
    pub fn parameter_input(&self) -> ParameterInput {
        ParameterInput {
            area_ha: self.field.area_ha,
            width_m: self.implement.width_m,
            efficiency: self.implement.efficiency,
            fuel_price: self.costs.fuel_price,
            fuel_curve: self
                .fuel_curve
                .resolve(self.implement.width_m, self.implement.efficiency),
            labor_rate: self.costs.labor_rate,
            time_budget_h: self.schedule.time_budget_h,
            speed_min: self.speed.min_kmh,
            speed_max: self.speed.max_kmh,
        }
    }

    /// Validated model parameters.
    pub fn to_parameters(&self) -> Result<UnitParameters, ModelError> {
        UnitParameters::try_from(self.parameter_input())
    }
}
