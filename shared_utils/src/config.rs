//! Application configuration loaded from an optional TOML file.
//!
//! Every field has a default, so an absent file and an empty file both yield
//! [`AppConfig::default`]. Lookup order for the file path is: explicit path
//! (the `--config` flag), then the `QUANTCLI_CONFIG` environment variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::get_optional_env_var;

/// Environment variable naming the config file when no explicit path is given.
pub const CONFIG_ENV_VAR: &str = "QUANTCLI_CONFIG";

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is out of range.
    #[error("Invalid config value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub backtest: BacktestConfig,
    pub indicator: IndicatorConfig,
    pub output: OutputConfig,
}

/// Backtest defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BacktestConfig {
    /// Starting capital in currency units.
    pub initial_cash: f64,
    /// Window of the fast moving average.
    pub short_period: usize,
    /// Window of the slow moving average.
    pub long_period: usize,
    /// Periods per year used to annualize the Sharpe ratio (e.g. 252 for daily
    /// bars). When absent the raw per-bar ratio is reported.
    pub annualization_factor: Option<f64>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: 100_000.0,
            short_period: 50,
            long_period: 200,
            annualization_factor: None,
        }
    }
}

/// Indicator defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    pub default_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self { default_period: 14 }
    }
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory for backtest summaries and equity curves.
    pub backtest_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backtest_dir: PathBuf::from("backtest_results"),
        }
    }
}

impl AppConfig {
    /// Parse and validate a config from a TOML string.
    ///
    /// `origin` is only used in error messages.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a config file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve the config: explicit path, then [`CONFIG_ENV_VAR`], then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => match get_optional_env_var(CONFIG_ENV_VAR) {
                Some(path) => Self::from_path(path),
                None => Ok(Self::default()),
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let bt = &self.backtest;
        if !(bt.initial_cash.is_finite() && bt.initial_cash > 0.0) {
            return Err(ConfigError::Invalid {
                key: "backtest.initial_cash",
                message: format!("must be a positive number, got {}", bt.initial_cash),
            });
        }
        if bt.short_period == 0 || bt.long_period == 0 {
            return Err(ConfigError::Invalid {
                key: "backtest.short_period/long_period",
                message: "moving-average periods must be > 0".into(),
            });
        }
        if let Some(factor) = bt.annualization_factor {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(ConfigError::Invalid {
                    key: "backtest.annualization_factor",
                    message: format!("must be a positive number, got {factor}"),
                });
            }
        }
        if self.indicator.default_period == 0 {
            return Err(ConfigError::Invalid {
                key: "indicator.default_period",
                message: "must be > 0".into(),
            });
        }
        Ok(())
    }
}
