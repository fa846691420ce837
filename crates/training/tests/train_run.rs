//! End-to-end training runs against a small on-disk dataset.

use std::fs;

use dataset::{Dataset, DatasetError};
use models::{Booster, ModelRegistry, Predictor};
use serde_json::json;
use tempfile::TempDir;
use training::{BoosterParams, TrainConfig, TrainError, train_all};

/// 40 rows, 2 features. `trend` is positive for the upper half of `f0`;
/// `never` has no positive rows at all.
fn create_dataset() -> TempDir {
    let temp = TempDir::new().unwrap();
    let base = temp.path();

    let mut x = String::new();
    let mut y = String::new();
    for i in 0..40 {
        x.push_str(&format!("{},{}\n", i, (i * 7) % 5));
        y.push_str(&format!("{},0\n", u8::from(i >= 20)));
    }
    fs::write(base.join("0_x.csv"), x).unwrap();
    fs::write(base.join("0_y.csv"), y).unwrap();

    let metadata = json!({
        "params": {"name": "demo", "rootDir": base.to_string_lossy(), "interval": "H1"},
        "totalFeatures": 2,
        "totalSignals": 2,
        "signals": ["trend", "never"],
        "features": ["f0", "f1"],
        "TotalRows": 40,
        "totalSamples": 1,
        "samples": [{
            "index": 0, "symbol": "BTCUSDT", "client": "bybit",
            "xShape": [40, 2], "yShape": [40, 2],
            "xPath": "0_x.csv", "yPath": "0_y.csv"
        }],
    });
    fs::write(base.join("metadata.json"), metadata.to_string()).unwrap();

    temp
}

fn small_params() -> BoosterParams {
    BoosterParams::default()
        .iterations(20)
        .max_depth(3)
        .min_child_weight(1)
        .sampling(1.0, 1.0)
}

#[test]
fn trains_selected_signal_and_publishes() {
    let data_dir = create_dataset();
    let models_dir = TempDir::new().unwrap();
    let dataset = Dataset::open(data_dir.path()).unwrap();

    let config = TrainConfig::default()
        .models_dir(models_dir.path())
        .test_size(0.25)
        .params(small_params())
        .signals(vec!["trend".into()])
        .publish(true);

    let trained = train_all(&dataset, &config).unwrap();
    assert_eq!(trained.len(), 1);

    let model = &trained[0];
    assert_eq!(model.signal, "trend");
    assert_eq!(model.path, models_dir.path().join("+xgb_demo_trend.json"));
    assert!(model.scale_pos_weight > 0.0);
    assert!(model.metrics.contains_key("logloss"));

    let booster = Booster::from_json(&model.path).unwrap();
    assert_eq!(booster.name(), "xgb_demo_trend");
    assert_eq!(booster.artifact().feature_names, vec!["f0", "f1"]);
    assert_eq!(booster.artifact().params["iterations"], 20);

    let preds = booster.predict(&[vec![2.0, 1.0], vec![35.0, 1.0]]).unwrap();
    assert!(preds[1] > preds[0]);

    let registry = ModelRegistry::load_published(models_dir.path()).unwrap();
    assert_eq!(registry.model_names(), vec!["+xgb_demo_trend"]);
}

#[test]
fn unpublished_run_is_not_served() {
    let data_dir = create_dataset();
    let models_dir = TempDir::new().unwrap();
    let dataset = Dataset::open(data_dir.path()).unwrap();

    let config = TrainConfig::default()
        .models_dir(models_dir.path())
        .test_size(0.25)
        .params(small_params())
        .signals(vec!["trend".into()]);

    let trained = train_all(&dataset, &config).unwrap();
    assert_eq!(
        trained[0].path,
        models_dir.path().join("xgb_demo_trend.json")
    );

    let registry = ModelRegistry::load_published(models_dir.path()).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn signal_without_positives_aborts() {
    let data_dir = create_dataset();
    let models_dir = TempDir::new().unwrap();
    let dataset = Dataset::open(data_dir.path()).unwrap();

    let config = TrainConfig::default()
        .models_dir(models_dir.path())
        .test_size(0.25)
        .params(small_params());

    // `trend` trains first, then `never` stops the run.
    match train_all(&dataset, &config) {
        Err(TrainError::NoPositives { signal }) => assert_eq!(signal, "never"),
        other => panic!("expected NoPositives, got {:?}", other),
    }
    assert!(models_dir.path().join("xgb_demo_trend.json").exists());
}

#[test]
fn unknown_signal_is_rejected() {
    let data_dir = create_dataset();
    let dataset = Dataset::open(data_dir.path()).unwrap();

    let config = TrainConfig::default().signals(vec!["missing".into()]);
    assert!(matches!(
        train_all(&dataset, &config),
        Err(TrainError::UnknownSignal(name)) if name == "missing"
    ));
}

#[test]
fn nan_feature_cell_fails_before_fit() {
    let data_dir = create_dataset();
    let models_dir = TempDir::new().unwrap();
    let x_path = data_dir.path().join("0_x.csv");
    let x = fs::read_to_string(&x_path).unwrap();
    fs::write(&x_path, x.replacen("0,0\n", "nan,0\n", 1)).unwrap();
    let dataset = Dataset::open(data_dir.path()).unwrap();

    let config = TrainConfig::default()
        .models_dir(models_dir.path())
        .test_size(0.25)
        .params(small_params())
        .signals(vec!["trend".into()]);

    match train_all(&dataset, &config) {
        Err(TrainError::Dataset(DatasetError::NonFinite { sample, row, col })) => {
            assert_eq!((sample, row, col), (0, 0, 0));
        }
        other => panic!("expected NonFinite, got {:?}", other),
    }
    assert!(!models_dir.path().join("xgb_demo_trend.json").exists());
}
