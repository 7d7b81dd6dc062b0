pub mod covariate;
pub mod data;
pub mod model;
pub mod seasonality;
pub mod train;
pub mod trend;

pub use covariate::{CovariateConfig, Normalization};
pub use data::TimeDataset;
pub use model::ModelConfig;
pub use seasonality::{Season, SeasonArg, SeasonComputation, SeasonalityConfig, SeasonalityMode};
pub use train::{Loss, LossArg, TrainConfig};
pub use trend::{Growth, GrowthArg, LogisticGrowth, ThresholdArg, TrendConfig};
