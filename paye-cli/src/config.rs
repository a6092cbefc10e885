//! `paye.toml` configuration.
//!
//! Every section and key is optional:
//!
//! ```toml
//! brackets = "brackets.csv"
//!
//! [rates]
//! employee_pension_rate = "0.08"
//! nhf_rate = "0.025"
//!
//! [allowances]
//! housing_rate = "0.10"
//!
//! [salary_structure]
//! name = "Standard"
//! basic_percentage = "40"
//! transport_percentage = "15"
//! housing_percentage = "25"
//! utility_percentage = "10"
//! meal_percentage = "5"
//! clothing_percentage = "5"
//!
//! [logging]
//! level = "debug"
//! file = "paye.log"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.
//! Rates must be fractions in `[0, 1]`; a file that breaks this fails to load.

use std::path::{Path, PathBuf};

use paye_core::{AllowancePolicy, BracketTable, RatesError, SalaryStructure, StatutoryRates};
use paye_data::{BracketLoaderError, BracketTableLoader, default_table};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value in config file '{path}': {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: RatesError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Append log records to this file as well as stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayeConfig {
    /// Bracket CSV; the shipped Nigerian table when absent.
    pub brackets: Option<PathBuf>,
    pub rates: StatutoryRates,
    pub allowances: AllowancePolicy,
    /// Used to split a gross salary into components.
    pub salary_structure: Option<SalaryStructure>,
    pub logging: LoggingConfig,
}

impl PayeConfig {
    /// Parses TOML text. Paths are left as written.
    pub fn parse(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Range-checks `[rates]` and `[allowances]`.
    pub fn validate(&self) -> Result<(), RatesError> {
        self.rates.validate()?;
        self.allowances.validate()
    }

    fn resolve_paths(
        &mut self,
        base: &Path,
    ) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(p) = self.brackets.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.logging.file.as_mut() {
            resolve(p);
        }
    }

    /// Loads the bracket table, preferring `override_path` over the configured one.
    pub fn bracket_table(
        &self,
        override_path: Option<&Path>,
    ) -> Result<BracketTable, BracketLoaderError> {
        match override_path.or(self.brackets.as_deref()) {
            Some(path) => BracketTableLoader::load_from_path(path),
            None => default_table(),
        }
    }
}
