//! [`Dataset`]: metadata plus lazily materialized feature/label matrices.
//!
//! Feature rows do not depend on which signal is later used as the label, so
//! the stacked feature matrix is built once per `Dataset` and shared by every
//! [`Dataset::load`] call. Labels are re-read per call because each call
//! selects a different column.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ndarray::{Array1, Array2};
use tracing::{debug, info};

use crate::METADATA_FILE;
use crate::error::DatasetError;
use crate::metadata::{DatasetMetadata, SampleMetadata};
use crate::reader::read_csv;

/// Stacked feature rows of every sample, in sample order.
#[derive(Debug)]
struct FeatureCache {
    matrix: Array2<f32>,
    /// Row count contributed by each sample.
    sample_rows: Vec<usize>,
}

/// A recorded dataset: descriptive metadata and per-sample CSV files.
#[derive(Debug)]
pub struct Dataset {
    metadata: DatasetMetadata,
    /// Directory that relative sample paths are resolved against.
    dir: PathBuf,
    features: OnceLock<FeatureCache>,
}

impl Dataset {
    /// Open the dataset stored in `path` by reading `path/metadata.json`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let dir = path.as_ref().to_path_buf();
        let meta_path = dir.join(METADATA_FILE);

        let content = std::fs::read_to_string(&meta_path).map_err(|source| DatasetError::Io {
            path: meta_path.clone(),
            source,
        })?;
        let metadata: DatasetMetadata =
            serde_json::from_str(&content).map_err(|source| DatasetError::Metadata {
                path: meta_path.clone(),
                source,
            })?;

        info!(
            dataset = %metadata.params.name,
            samples = metadata.samples.len(),
            signals = metadata.signals.len(),
            "dataset opened"
        );

        Ok(Self::from_metadata(metadata, dir))
    }

    /// Build a dataset from already parsed metadata.
    pub fn from_metadata(metadata: DatasetMetadata, dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata,
            dir: dir.into(),
            features: OnceLock::new(),
        }
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    /// Dataset name (`params.name`).
    pub fn name(&self) -> &str {
        &self.metadata.params.name
    }

    /// Signal (label column) names in column order.
    pub fn signals(&self) -> &[String] {
        &self.metadata.signals
    }

    /// Feature column names in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.metadata.features
    }

    pub fn samples(&self) -> &[SampleMetadata] {
        &self.metadata.samples
    }

    /// Column index of the named signal.
    pub fn signal_index(&self, name: &str) -> Option<usize> {
        self.metadata.signals.iter().position(|s| s == name)
    }

    /// Whether the feature matrix has already been materialized.
    pub fn is_cached(&self) -> bool {
        self.features.get().is_some()
    }

    /// Load the feature matrix and the label vector for one signal.
    ///
    /// The first call reads every feature file (alongside the label files)
    /// and caches the stacked matrix; later calls only read label files.
    /// The returned matrix has exactly as many rows as the label vector.
    pub fn load(&self, signal_index: usize) -> Result<(&Array2<f32>, Array1<i32>), DatasetError> {
        let (labels, features) = parallel::join(
            || self.read_labels(signal_index),
            || self.feature_cache(),
            false,
        );
        let labels = labels?;
        let cache = features?;

        let mut y = Vec::with_capacity(cache.matrix.nrows());
        for ((sample, &x_rows), column) in
            self.samples().iter().zip(&cache.sample_rows).zip(labels)
        {
            if column.len() != x_rows {
                return Err(DatasetError::RowMismatch {
                    sample: sample.index,
                    features: x_rows,
                    labels: column.len(),
                });
            }
            y.extend(column);
        }

        debug!(
            dataset = %self.name(),
            signal_index,
            rows = y.len(),
            "signal loaded"
        );

        Ok((&cache.matrix, Array1::from_vec(y)))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Label column `signal_index` of every sample, one vector per sample.
    fn read_labels(&self, signal_index: usize) -> Result<Vec<Vec<i32>>, DatasetError> {
        parallel::try_map_slice(
            self.samples(),
            |sample| -> Result<Vec<i32>, DatasetError> {
                let rows = read_csv(self.resolve(&sample.y_path))?;
                rows.iter()
                    .map(|row| {
                        row.get(signal_index).map(|v| *v as i32).ok_or(
                            DatasetError::SignalOutOfRange {
                                index: signal_index,
                                sample: sample.index,
                                width: row.len(),
                            },
                        )
                    })
                    .collect()
            },
            false,
        )
    }

    fn feature_cache(&self) -> Result<&FeatureCache, DatasetError> {
        if let Some(cache) = self.features.get() {
            return Ok(cache);
        }
        let built = self.read_features()?;
        Ok(self.features.get_or_init(|| built))
    }

    fn read_features(&self) -> Result<FeatureCache, DatasetError> {
        let width = self.metadata.total_features;

        let per_sample: Vec<(usize, Vec<f32>)> = parallel::try_map_slice(
            self.samples(),
            |sample| -> Result<(usize, Vec<f32>), DatasetError> {
                let rows = read_csv(self.resolve(&sample.x_path))?;
                let mut flat = Vec::with_capacity(rows.len() * width);
                for (r, row) in rows.iter().enumerate() {
                    if row.len() != width {
                        return Err(DatasetError::FeatureWidth {
                            sample: sample.index,
                            expected: width,
                            found: row.len(),
                        });
                    }
                    // gbdt cannot order NaN split candidates.
                    if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                        return Err(DatasetError::NonFinite {
                            sample: sample.index,
                            row: r,
                            col,
                        });
                    }
                    flat.extend(row.iter().map(|v| *v as f32));
                }
                Ok((rows.len(), flat))
            },
            false,
        )?;

        let total: usize = per_sample.iter().map(|(n, _)| n).sum();
        let mut data = Vec::with_capacity(total * width);
        let mut sample_rows = Vec::with_capacity(per_sample.len());
        for (n, flat) in per_sample {
            sample_rows.push(n);
            data.extend(flat);
        }

        let matrix = Array2::from_shape_vec((total, width), data)
            .map_err(|e| DatasetError::Shape(e.to_string()))?;

        info!(
            dataset = %self.name(),
            rows = matrix.nrows(),
            cols = matrix.ncols(),
            "feature matrix cached"
        );

        Ok(FeatureCache {
            matrix,
            sample_rows,
        })
    }
}
