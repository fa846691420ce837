//! `metadata.json` schema.
//!
//! ```json
//! {
//!   "params": { "name": "TrendV1-H1", "rootDir": "/data/TrendV1-H1", "interval": "60" },
//!   "totalFeatures": 21,
//!   "totalSignals": 2,
//!   "signals": ["PerfectTrend-p4", "NextPerfectTrend-p7"],
//!   "features": ["rsi", "atr", "..."],
//!   "TotalRows": 120000,
//!   "totalSamples": 40,
//!   "samples": [
//!     { "index": 0, "symbol": "BTCUSDT", "client": "bybit",
//!       "xShape": [3000, 21], "yShape": [3000, 2],
//!       "xPath": "samples/0_x.csv", "yPath": "samples/0_y.csv" }
//!   ]
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Dataset-level parameters recorded by the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetParams {
    pub name: String,
    pub root_dir: String,
    pub interval: String,
}

/// One recorded chunk of aligned feature/label rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleMetadata {
    pub index: usize,
    pub symbol: String,
    pub client: String,
    /// `[rows, feature columns]` as recorded by the exporter.
    pub x_shape: Vec<usize>,
    /// `[rows, signal columns]` as recorded by the exporter.
    pub y_shape: Vec<usize>,
    pub x_path: PathBuf,
    pub y_path: PathBuf,
}

/// Full contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub params: DatasetParams,
    pub total_features: usize,
    pub total_signals: usize,
    pub signals: Vec<String>,
    pub features: Vec<String>,
    #[serde(rename = "TotalRows")]
    pub total_rows: usize,
    pub total_samples: usize,
    pub samples: Vec<SampleMetadata>,
}
