//! Error types for reading, loading and splitting datasets.

use std::path::PathBuf;

/// Failure while reading a numeric CSV file.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV structure itself is broken (e.g. invalid UTF-8).
    #[error("malformed csv in {}: {}", .path.display(), .source)]
    Format {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A field is not a number.
    #[error("{}:{}: cannot parse {:?} as a number", .path.display(), .line, .field)]
    Parse {
        path: PathBuf,
        line: u64,
        field: String,
    },
}

/// Failure while opening or materializing a [`Dataset`](crate::Dataset).
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// `metadata.json` is missing or unreadable.
    #[error("failed to read dataset metadata {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `metadata.json` is not valid JSON or lacks required keys.
    #[error("malformed dataset metadata {}: {}", .path.display(), .source)]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Csv(#[from] CsvError),

    /// The requested label column does not exist in a sample's label file.
    #[error("signal index {index} out of range for sample {sample} ({width} label columns)")]
    SignalOutOfRange {
        index: usize,
        sample: usize,
        width: usize,
    },

    /// A feature row is wider or narrower than `totalFeatures`.
    #[error("sample {sample} has {found} feature columns, expected {expected}")]
    FeatureWidth {
        sample: usize,
        expected: usize,
        found: usize,
    },

    /// A feature cell parsed as NaN or infinity.
    #[error("sample {sample} row {row} column {col} is not a finite number")]
    NonFinite {
        sample: usize,
        row: usize,
        col: usize,
    },

    /// Stacked feature data does not fit the expected matrix shape.
    #[error("feature matrix shape error: {0}")]
    Shape(String),

    /// Feature and label files of one sample have different row counts.
    #[error("sample {sample} has {features} feature rows but {labels} label rows")]
    RowMismatch {
        sample: usize,
        features: usize,
        labels: usize,
    },
}

/// Invalid input to the train/test splitter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("at least one array required as input")]
    NoArrays,

    #[error("all arrays must have the same length (expected {expected}, found {found})")]
    LengthMismatch { expected: usize, found: usize },

    #[error("test_size must be between 0 and 1, got {0}")]
    InvalidTestSize(f64),
}
