//! Model artifacts and the registry of published models.
//!
//! This crate provides:
//! - [`Predictor`]: the inference interface every served model implements
//! - [`Booster`] / [`ModelArtifact`]: gradient-boosted trees persisted as JSON
//! - [`ModelRegistry`]: immutable name -> model map loaded at service startup
//!
//! # Naming convention
//!
//! Artifacts are written as `xgb_{dataset}_{signal}.json`. An operator
//! publishes a model by renaming it to `+xgb_{dataset}_{signal}.json`; only
//! files carrying the [`PUBLISHED_MARKER`] are loaded for serving, and the
//! marker is stripped from names returned to clients.

mod booster;
mod error;
mod registry;

pub use booster::{ARTIFACT_FORMAT, Booster, ModelArtifact};
pub use error::{ModelError, RegistryError};
pub use registry::ModelRegistry;

/// First character of a published artifact's file name.
pub const PUBLISHED_MARKER: char = '+';

/// Family tag of boosted-tree artifacts.
pub const BOOSTER_TAG: &str = "xgb";

/// Registry-name prefix of published boosted-tree models.
pub const BOOSTER_PREFIX: &str = "+xgb_";

/// Model name for a dataset signal: `xgb_{dataset}_{signal}`.
pub fn model_name(dataset: &str, signal: &str) -> String {
    format!("{}_{}_{}", BOOSTER_TAG, dataset, signal)
}

/// Artifact file name, with the marker prefixed when `published`.
pub fn artifact_file_name(dataset: &str, signal: &str, published: bool) -> String {
    let name = model_name(dataset, signal);
    if published {
        format!("{}{}.json", PUBLISHED_MARKER, name)
    } else {
        format!("{}.json", name)
    }
}

/// Inference interface for served models.
///
/// Implementors must be `Send + Sync`; the registry is shared read-only
/// across request handlers.
pub trait Predictor: Send + Sync {
    /// Predict one value per feature row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError>;

    /// Number of features each row must carry.
    fn n_features(&self) -> usize;
}
