use std::path::PathBuf;

/// Failure loading, saving or running a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model json: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact parsed but is not something this crate can serve.
    #[error("unsupported model artifact: {0}")]
    Unsupported(String),

    /// A feature row does not have the width the model was trained on.
    #[error("row {row} has {found} features, model expects {expected}")]
    FeatureWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Failure building the registry from a models directory.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to list models directory {}: {}", .path.display(), .source)]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load model {}: {}", .path.display(), .source)]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}
