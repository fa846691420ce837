//! Gradient-boosted tree model backed by the `gbdt` crate.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "format": "neuralab-gbdt",
//!   "name": "xgb_TrendV1-M15_PerfectTrend-p4",
//!   "dataset": "TrendV1-M15",
//!   "signal": "PerfectTrend-p4",
//!   "feature_names": ["rsi", "atr", "..."],
//!   "n_features": 21,
//!   "params": { "eta": 0.1, "max_depth": 6, "...": "..." },
//!   "metrics": { "logloss": 0.41, "auc": 0.87, "error": 0.18, "aucpr": 0.62 },
//!   "booster": { "conf": { "...": "..." }, "trees": [ "..." ], "init_value": 0.0 }
//! }
//! ```
//!
//! `booster` is the serialized [`gbdt::gradient_boost::GBDT`]; everything
//! else is bookkeeping written by the training driver.

use std::collections::BTreeMap;
use std::path::Path;

use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use crate::Predictor;
use crate::error::ModelError;

/// Value of the `format` field for artifacts this crate understands.
pub const ARTIFACT_FORMAT: &str = "neuralab-gbdt";

/// Persisted boosted-tree model plus its training provenance.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    /// Model name without the publish marker, e.g. `xgb_demo_sig1`.
    pub name: String,
    pub dataset: String,
    pub signal: String,
    pub feature_names: Vec<String>,
    pub n_features: usize,
    /// Hyperparameters used for training.
    #[serde(default)]
    pub params: serde_json::Value,
    /// Validation metrics at the end of training.
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    pub booster: GBDT,
}

impl ModelArtifact {
    /// Parse an artifact from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read an artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Write the artifact as JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let path = path.as_ref();
        let io_err = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json).map_err(io_err)
    }
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("format", &self.format)
            .field("name", &self.name)
            .field("dataset", &self.dataset)
            .field("signal", &self.signal)
            .field("n_features", &self.n_features)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

/// Servable boosted-tree model.
#[derive(Debug)]
pub struct Booster {
    artifact: ModelArtifact,
}

impl Booster {
    /// Wrap an artifact after checking it is servable.
    ///
    /// # Errors
    /// [`ModelError::Unsupported`] for a foreign `format` or a model with no
    /// features.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.format != ARTIFACT_FORMAT {
            return Err(ModelError::Unsupported(format!(
                "expected format '{}', got '{}'",
                ARTIFACT_FORMAT, artifact.format
            )));
        }
        if artifact.n_features == 0 {
            return Err(ModelError::Unsupported("model has no features".into()));
        }
        Ok(Self { artifact })
    }

    /// Load a boosted model from an artifact file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_artifact(ModelArtifact::load(path)?)
    }

    /// Load a boosted model from artifact JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Self::from_artifact(ModelArtifact::from_json_str(json)?)
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn name(&self) -> &str {
        &self.artifact.name
    }
}

impl Predictor for Booster {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let expected = self.artifact.n_features;
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(ModelError::FeatureWidth {
                row,
                expected,
                found,
            });
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let data: DataVec = rows
            .iter()
            .map(|row| {
                let feature = row.iter().map(|v| *v as ValueType).collect();
                Data::new_test_data(feature, None)
            })
            .collect();

        let predicted = self.artifact.booster.predict(&data);
        Ok(predicted.into_iter().map(|p| p as f64).collect())
    }

    fn n_features(&self) -> usize {
        self.artifact.n_features
    }
}
