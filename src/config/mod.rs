//! Configuration for the RAF calculator.
//!
//! Defaults suit a local data directory holding the published CSV tables.
//! Every field can be overridden through builder methods or `RAF_*`
//! environment variables.

use std::env;
use std::path::PathBuf;

use crate::error::{RafError, Result};
use crate::models::{ModelName, PaymentAdjustment};

/// File names of the reference tables inside the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFiles {
    pub dx_to_cc: String,
    pub hierarchies: String,
    pub coefficients: String,
    pub chronic: String,
    pub edits: String,
    pub labels: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            dx_to_cc: "ra_dx_to_cc.csv".to_string(),
            hierarchies: "ra_hierarchies.csv".to_string(),
            coefficients: "ra_coefficients.csv".to_string(),
            chronic: "hcc_is_chronic.csv".to_string(),
            edits: "ra_dx_edits.csv".to_string(),
            labels: "ra_labels.csv".to_string(),
        }
    }
}

/// Configuration for the RAF calculator
#[derive(Debug, Clone, PartialEq)]
pub struct RafConfig {
    /// Model used when a request does not name one
    pub model_name: ModelName,
    /// Directory holding the reference tables
    pub data_dir: PathBuf,
    pub table_files: TableFiles,
    /// Payment adjustment used when a request does not carry one
    pub payment: PaymentAdjustment,
    /// Worker threads for batch scoring
    pub threads: usize,
    /// Show a progress bar for batch runs
    pub show_progress: bool,
}

impl Default for RafConfig {
    fn default() -> Self {
        Self {
            model_name: ModelName::default(),
            data_dir: PathBuf::from("data"),
            table_files: TableFiles::default(),
            payment: PaymentAdjustment::default(),
            threads: num_cpus::get(),
            show_progress: true,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env_f64(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RafError::Config(format!("{name} must be a number, got '{value}'")))
}

impl RafConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from defaults overlaid with `RAF_*` variables
    ///
    /// Recognized: `RAF_MODEL`, `RAF_DATA_DIR`, `RAF_THREADS`, `RAF_MACI`,
    /// `RAF_NORM_FACTOR`, `RAF_FRAILTY`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(model) = env_var("RAF_MODEL") {
            config.model_name = model
                .parse()
                .map_err(|_| RafError::Config(format!("RAF_MODEL names no known model: '{model}'")))?;
        }
        if let Some(dir) = env_var("RAF_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(threads) = env_var("RAF_THREADS") {
            config.threads = threads.trim().parse().map_err(|_| {
                RafError::Config(format!("RAF_THREADS must be a positive integer, got '{threads}'"))
            })?;
        }
        if let Some(maci) = env_var("RAF_MACI") {
            config.payment.maci = parse_env_f64("RAF_MACI", &maci)?;
        }
        if let Some(norm) = env_var("RAF_NORM_FACTOR") {
            config.payment.norm_factor = parse_env_f64("RAF_NORM_FACTOR", &norm)?;
        }
        if let Some(frailty) = env_var("RAF_FRAILTY") {
            config.payment.frailty_score = parse_env_f64("RAF_FRAILTY", &frailty)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(RafError::Config("threads must be at least 1".to_string()));
        }
        self.payment
            .validate()
            .map_err(|e| RafError::Config(e.to_string()))
    }

    #[must_use]
    pub const fn with_model(mut self, model_name: ModelName) -> Self {
        self.model_name = model_name;
        self
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn with_table_files(mut self, table_files: TableFiles) -> Self {
        self.table_files = table_files;
        self
    }

    #[must_use]
    pub const fn with_payment(mut self, payment: PaymentAdjustment) -> Self {
        self.payment = payment;
        self
    }

    /// Set the number of worker threads (at least 1)
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}
