//! Booster hyperparameters and their mapping onto `gbdt`'s [`Config`].
//!
//! Defaults follow the binary-logistic preset used for every signal model.
//! A JSON parameter file only needs the keys it overrides:
//!
//! ```json
//! { "eta": 0.05, "iterations": 500 }
//! ```

use std::path::Path;

use gbdt::config::Config;
use gbdt::decision_tree::ValueType;
use serde::{Deserialize, Serialize};

use crate::error::TrainError;
use crate::metrics::METRIC_NAMES;

/// The only objective the training driver supports (`gbdt`'s binary logistic loss).
pub const OBJECTIVE: &str = "LogLikelyhood";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterParams {
    pub objective: String,
    /// Shrinkage applied to every tree.
    pub eta: f64,
    pub max_depth: u32,
    /// Minimum number of rows in a leaf.
    pub min_child_weight: usize,
    /// Row sampling ratio per tree.
    pub subsample: f64,
    /// Feature sampling ratio per tree.
    pub colsample_bytree: f64,
    /// Boosting rounds.
    pub iterations: usize,
    /// Metrics evaluated on the validation split.
    pub eval_metric: Vec<String>,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            objective: OBJECTIVE.into(),
            eta: 0.1,
            max_depth: 6,
            min_child_weight: 3,
            subsample: 0.8,
            colsample_bytree: 0.8,
            iterations: 2000,
            eval_metric: METRIC_NAMES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl BoosterParams {
    /// Defaults overridden by the keys present in a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TrainError::ParamsFile {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self =
            serde_json::from_str(&content).map_err(|source| TrainError::ParamsJson {
                path: path.to_path_buf(),
                source,
            })?;
        params.validate()?;
        Ok(params)
    }

    pub fn eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn min_child_weight(mut self, rows: usize) -> Self {
        self.min_child_weight = rows;
        self
    }

    pub fn sampling(mut self, subsample: f64, colsample_bytree: f64) -> Self {
        self.subsample = subsample;
        self.colsample_bytree = colsample_bytree;
        self
    }

    /// Reject values `gbdt` would silently misinterpret or panic on.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.objective != OBJECTIVE {
            return Err(TrainError::Params(format!(
                "objective must be {}, got {}",
                OBJECTIVE, self.objective
            )));
        }
        if !(self.eta > 0.0) {
            return Err(TrainError::Params(format!(
                "eta must be positive, got {}",
                self.eta
            )));
        }
        if self.max_depth == 0 || self.iterations == 0 {
            return Err(TrainError::Params(
                "max_depth and iterations must be at least 1".into(),
            ));
        }
        for (key, ratio) in [
            ("subsample", self.subsample),
            ("colsample_bytree", self.colsample_bytree),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(TrainError::Params(format!(
                    "{} must be in (0, 1], got {}",
                    key, ratio
                )));
            }
        }
        if let Some(unknown) = self
            .eval_metric
            .iter()
            .find(|m| !METRIC_NAMES.contains(&m.as_str()))
        {
            return Err(TrainError::Params(format!(
                "unknown eval_metric {}, expected one of {:?}",
                unknown, METRIC_NAMES
            )));
        }
        Ok(())
    }

    /// Build the `gbdt` configuration for a model over `n_features` columns.
    pub fn to_config(&self, n_features: usize) -> Config {
        let mut cfg = Config::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.max_depth);
        cfg.set_iterations(self.iterations);
        cfg.set_shrinkage(self.eta as ValueType);
        cfg.set_loss(&self.objective);
        cfg.set_min_leaf_size(self.min_child_weight);
        cfg.set_data_sample_ratio(self.subsample);
        cfg.set_feature_sample_ratio(self.colsample_bytree);
        cfg.set_training_optimization_level(2);
        cfg
    }
}
