//! Training driver: one boosted-tree classifier per dataset signal.
//!
//! # Modules
//!
//! - [`params`]: hyperparameters and the JSON override file
//! - [`metrics`]: validation metrics (`logloss`, `auc`, `error`, `aucpr`)
//! - [`trainer`]: the per-signal load/split/fit/evaluate/save loop
//!
//! # Usage
//!
//! ```ignore
//! use dataset::Dataset;
//! use training::{TrainConfig, train_all};
//!
//! let dataset = Dataset::open("datasets/TrendV1-M15")?;
//! let trained = train_all(&dataset, &TrainConfig::default().publish(true))?;
//! ```

pub mod error;
pub mod metrics;
pub mod params;
pub mod trainer;

pub use error::TrainError;
pub use params::BoosterParams;
pub use trainer::{TrainConfig, TrainedModel, scale_pos_weight, train_all, train_signal};
