//! Per-signal training loop.
//!
//! For every selected signal: load `(features, labels)`, split off a
//! validation set, weight the positive class, fit, evaluate, and write the
//! artifact. Signals are trained one after another; the first failure stops
//! the run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use dataset::{Dataset, SplitOptions, split_xy};
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use models::{ARTIFACT_FORMAT, ModelArtifact, ModelError, artifact_file_name, model_name};
use ndarray::{Array1, Array2};
use tracing::{info, warn};

use crate::error::TrainError;
use crate::metrics;
use crate::params::BoosterParams;

/// Settings for one training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Directory artifacts are written to.
    pub models_dir: PathBuf,
    /// Validation fraction.
    pub test_size: f64,
    /// Split seed.
    pub seed: u64,
    pub params: BoosterParams,
    /// Signal names to train; empty means every signal.
    pub signals: Vec<String>,
    /// Prefix the publish marker so the service picks the models up directly.
    pub publish: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            test_size: 0.02,
            seed: 42,
            params: BoosterParams::default(),
            signals: Vec::new(),
            publish: false,
        }
    }
}

impl TrainConfig {
    pub fn models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = dir.into();
        self
    }

    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn params(mut self, params: BoosterParams) -> Self {
        self.params = params;
        self
    }

    pub fn signals(mut self, signals: Vec<String>) -> Self {
        self.signals = signals;
        self
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }
}

/// Outcome of training one signal.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub signal: String,
    pub path: PathBuf,
    pub scale_pos_weight: f64,
    pub metrics: BTreeMap<String, f64>,
}

/// `negatives / positives` over the training labels.
pub fn scale_pos_weight(labels: &[i32], signal: &str) -> Result<f64, TrainError> {
    let positives = labels.iter().filter(|&&y| y > 0).count();
    if positives == 0 {
        return Err(TrainError::NoPositives {
            signal: signal.to_string(),
        });
    }
    let negatives = labels.len() - positives;
    Ok(negatives as f64 / positives as f64)
}

/// Train every selected signal in dataset order.
pub fn train_all(dataset: &Dataset, config: &TrainConfig) -> Result<Vec<TrainedModel>, TrainError> {
    config.params.validate()?;

    let indices: Vec<usize> = if config.signals.is_empty() {
        (0..dataset.signals().len()).collect()
    } else {
        config
            .signals
            .iter()
            .map(|name| {
                dataset
                    .signal_index(name)
                    .ok_or_else(|| TrainError::UnknownSignal(name.clone()))
            })
            .collect::<Result<_, _>>()?
    };

    info!(
        dataset = dataset.name(),
        signals = indices.len(),
        "Training run started"
    );

    indices
        .into_iter()
        .map(|index| train_signal(dataset, index, config))
        .collect()
}

/// Train, evaluate and save the model for one signal.
pub fn train_signal(
    dataset: &Dataset,
    signal_index: usize,
    config: &TrainConfig,
) -> Result<TrainedModel, TrainError> {
    let signal = dataset
        .signals()
        .get(signal_index)
        .cloned()
        .unwrap_or_else(|| signal_index.to_string());

    let (x, y) = dataset.load(signal_index)?;
    let options = SplitOptions::new(config.test_size).seed(config.seed);
    let (x_train, x_test, y_train, y_test) = split_xy(x, &y, &options)?;

    let spw = scale_pos_weight(&y_train.to_vec(), &signal)?;
    info!(
        signal = %signal,
        train_rows = x_train.nrows(),
        valid_rows = x_test.nrows(),
        scale_pos_weight = spw,
        "Training signal"
    );

    let n_features = x.ncols();
    let mut train_data = training_data(&x_train, &y_train, spw);
    let mut booster = GBDT::new(&config.params.to_config(n_features));
    booster.fit(&mut train_data);

    let metrics = if x_test.nrows() == 0 {
        warn!(signal = %signal, "Validation split is empty; no metrics computed");
        BTreeMap::new()
    } else {
        let probs: Vec<f64> = booster
            .predict(&test_data(&x_test))
            .into_iter()
            .map(|p| p as f64)
            .collect();
        metrics::evaluate(&config.params.eval_metric, &y_test.to_vec(), &probs)
    };
    for (name, value) in &metrics {
        info!(signal = %signal, metric = %name, value, "Validation");
    }

    let artifact = ModelArtifact {
        format: ARTIFACT_FORMAT.to_string(),
        name: model_name(dataset.name(), &signal),
        dataset: dataset.name().to_string(),
        signal: signal.clone(),
        feature_names: dataset.feature_names().to_vec(),
        n_features,
        params: serde_json::to_value(&config.params).map_err(ModelError::from)?,
        metrics: metrics.clone(),
        booster,
    };
    let path = config
        .models_dir
        .join(artifact_file_name(dataset.name(), &signal, config.publish));
    artifact.save(&path)?;
    info!(signal = %signal, path = %path.display(), "Model saved");

    Ok(TrainedModel {
        signal,
        path,
        scale_pos_weight: spw,
        metrics,
    })
}

/// Weighted `gbdt` rows with labels mapped to `{-1, +1}`.
fn training_data(x: &Array2<f32>, y: &Array1<i32>, scale_pos_weight: f64) -> DataVec {
    x.outer_iter()
        .zip(y)
        .map(|(row, &label)| {
            let feature = row.iter().map(|&v| v as ValueType).collect();
            let (target, weight) = if label > 0 {
                (1.0, scale_pos_weight as ValueType)
            } else {
                (-1.0, 1.0)
            };
            Data::new_training_data(feature, weight, target, None)
        })
        .collect()
}

fn test_data(x: &Array2<f32>) -> DataVec {
    x.outer_iter()
        .map(|row| Data::new_test_data(row.iter().map(|&v| v as ValueType).collect(), None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scale_pos_weight() {
        assert_eq!(scale_pos_weight(&[0, 0, 0, 1], "s").unwrap(), 3.0);
        assert_eq!(scale_pos_weight(&[1, 1], "s").unwrap(), 0.0);
        assert!(matches!(
            scale_pos_weight(&[0, 0], "s"),
            Err(TrainError::NoPositives { signal }) if signal == "s"
        ));
        assert!(matches!(
            scale_pos_weight(&[], "s"),
            Err(TrainError::NoPositives { .. })
        ));
    }

    #[test]
    fn test_training_data_weights_positives() {
        let x = array![[1.0_f32, 2.0], [3.0, 4.0]];
        let y = array![1, 0];
        let data = training_data(&x, &y, 4.0);

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].label, 1.0);
        assert_eq!(data[0].weight, 4.0);
        assert_eq!(data[1].label, -1.0);
        assert_eq!(data[1].weight, 1.0);
        assert_eq!(data[1].feature, vec![3.0, 4.0]);
    }

    #[test]
    fn test_config_builder() {
        let config = TrainConfig::default()
            .models_dir("out")
            .test_size(0.2)
            .seed(7)
            .signals(vec!["sig1".into()])
            .publish(true);

        assert_eq!(config.models_dir, PathBuf::from("out"));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 7);
        assert_eq!(config.signals, vec!["sig1"]);
        assert!(config.publish);
    }
}
