use std::path::PathBuf;

use dataset::{DatasetError, SplitError};
use models::ModelError;

/// Failure during a training run. Any variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("failed to split dataset: {0}")]
    Split(#[from] SplitError),

    #[error("failed to write model: {0}")]
    Model(#[from] ModelError),

    /// The training split holds no positive labels, so the class weight is undefined.
    #[error("signal {signal} has no positive labels in the training split")]
    NoPositives { signal: String },

    #[error("signal {0} is not part of the dataset")]
    UnknownSignal(String),

    #[error("invalid booster parameters: {0}")]
    Params(String),

    #[error("failed to read parameter file {}: {}", .path.display(), .source)]
    ParamsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parameter file {}: {}", .path.display(), .source)]
    ParamsJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
