//! Dataset crate: loading recorded samples and splitting them for training.
//!
//! A dataset is a directory holding a `metadata.json` file plus one feature
//! CSV and one label CSV per recorded sample chunk. The [`Dataset`] reads the
//! metadata eagerly and the CSV files lazily.
//!
//! # Modules
//!
//! - [`reader`]: plain numeric CSV reading (headerless and column-grouped)
//! - [`metadata`]: `metadata.json` schema
//! - [`loader`]: [`Dataset`] with its compute-once feature matrix
//! - [`split`]: train/test partitioning applied consistently across arrays
//!
//! # Usage
//!
//! ```ignore
//! use dataset::{Dataset, SplitOptions, split_xy};
//!
//! let dataset = Dataset::open("datasets/linear-trend-H1")?;
//! let (x, y) = dataset.load(0)?;
//! let (x_train, x_test, y_train, y_test) = split_xy(x, &y, &SplitOptions::default())?;
//! ```

pub mod error;
pub mod loader;
pub mod metadata;
pub mod reader;
pub mod split;

pub use error::{CsvError, DatasetError, SplitError};
pub use loader::Dataset;
pub use metadata::{DatasetMetadata, DatasetParams, SampleMetadata};
pub use reader::{Columns, read_csv, read_csv_columns};
pub use split::{Partition, Rows, SplitOptions, split_xy, train_test_split};

/// File name of the dataset descriptor inside a dataset directory.
pub const METADATA_FILE: &str = "metadata.json";
