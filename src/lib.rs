//! Next hotel-destination prediction from booking histories
//!
//! Aggregates each traveler's booking sequence into a fixed-width feature row,
//! holds out the chronologically last trip as the label, and trains a
//! gradient-boosted-tree classifier to predict the next destination country.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod training;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a traveler
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User({})", self.0)
    }
}

/// A single booking, with fields derived at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub user_id: UserId,
    /// Raw trip identifier, "<trip>_<ordinal>"
    pub utrip_id: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub booker_country: String,
    /// Destination country. Empty string marks a missing value in the
    /// held-out corpus.
    pub hotel_country: String,
    pub affiliate_id: i64,
    pub city_id: i64,
    pub device_class: String,
    /// checkout - checkin, in days
    pub days_stayed: i64,
    /// reference date - checkin, in days
    pub days_since: i64,
    /// Ordinal parsed from the utrip_id suffix
    pub subtrip_index: i64,
}

impl BookingRecord {
    /// Whether the destination label is present
    pub fn has_destination(&self) -> bool {
        !self.hotel_country.is_empty()
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum NextstayError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema error in {path}: {message}")]
    Schema { path: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Category '{value}' in column {column} was not seen during fit")]
    UnknownCategory { column: &'static str, value: String },

    #[error("Label '{0}' was not seen during fit")]
    UnknownLabel(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NextstayError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub train_path: String,
    pub holdout_path: String,
}

/// Booster hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub iterations: usize,
    pub max_depth: u32,
    pub shrinkage: f32,
    /// Row subsampling per iteration. At 1.0 training is deterministic.
    pub data_sample_ratio: f64,
    /// Feature subsampling per split. At 1.0 training is deterministic.
    pub feature_sample_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                train_path: "data/train_set.csv".to_string(),
                holdout_path: "data/test_set.csv".to_string(),
            },
            model: ModelConfig {
                iterations: 20,
                max_depth: 4,
                shrinkage: 0.1,
                data_sample_ratio: 1.0,
                feature_sample_ratio: 1.0,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NextstayError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| NextstayError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NextstayError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
