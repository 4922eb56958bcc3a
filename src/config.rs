//! Pipeline configuration.
//!
//! Defaults reproduce the King County demo. A JSON file may override any subset of
//! fields; the `HOUSING_DATA`, `HOUSING_SEED` and `HOUSING_MODEL` environment
//! variables win over both.

use crate::dataset::loader::{DEFAULT_FEATURE_COLUMN, DEFAULT_LABEL_COLUMN};
use crate::error::{RegressionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DATA_PATH: &str = "HOUSING_DATA";
pub const ENV_SEED: &str = "HOUSING_SEED";
pub const ENV_MODEL_PATH: &str = "HOUSING_MODEL";

/// Everything the session needs to load data and train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub feature_column: String,
    pub label_column: String,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub validation_split: f64,
    /// Fixes the shuffle and the weight initialization when set.
    pub seed: Option<u64>,
    pub model_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("public/kc_house_data.csv"),
            feature_column: DEFAULT_FEATURE_COLUMN.to_string(),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            learning_rate: 0.1,
            batch_size: 32,
            epochs: 20,
            validation_split: 0.2,
            seed: None,
            model_path: PathBuf::from("model.bin"),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON file; missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies the process environment overrides.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by the `HOUSING_*` variable names.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_SEED) {
            let seed = raw.trim().parse::<u64>().map_err(|_| {
                RegressionError::InvalidParameter(format!(
                    "{} must be an integer, got {:?}",
                    ENV_SEED, raw
                ))
            })?;
            self.seed = Some(seed);
        }
        Ok(self)
    }

    /// Rejects hyperparameters the trainer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RegressionError::InvalidParameter(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(RegressionError::InvalidParameter(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(RegressionError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(RegressionError::InvalidParameter(format!(
                "validation split must be in [0, 1), got {}",
                self.validation_split
            )));
        }
        if self.feature_column.is_empty() || self.label_column.is_empty() {
            return Err(RegressionError::InvalidParameter(
                "column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
