//! Configuration layer for a neural time-series forecaster.
//!
//! Each hyperparameter group (trend, seasonality, training, architecture,
//! covariates) is validated and normalized at construction, and the settings
//! that depend on the training data (logistic growth initialization,
//! seasonality auto-detection, batch/epoch auto-scaling) are finalized once
//! the dataset is known. Model construction and the training loop live
//! elsewhere and consume these records as plain structured data.

pub mod core;

pub use crate::core::covariate::{CovariateConfig, Normalization};
pub use crate::core::data::TimeDataset;
pub use crate::core::model::ModelConfig;
pub use crate::core::seasonality::{
    Season, SeasonArg, SeasonComputation, SeasonalityConfig, SeasonalityMode,
};
pub use crate::core::train::{Loss, LossArg, TrainConfig};
pub use crate::core::trend::{Growth, GrowthArg, LogisticGrowth, ThresholdArg, TrendConfig};

pub type Result<T> = std::result::Result<T, AugurError>;

#[derive(Debug, thiserror::Error)]
pub enum AugurError {
    #[error("Data validation error: {0}")]
    DataValidation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported loss function: {0}")]
    UnsupportedLoss(String),
}
