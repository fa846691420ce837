//! Registry of published models, keyed by artifact file stem.
//!
//! The registry is built once at service startup and then shared read-only
//! behind an `Arc`; there is no hot reload.
//!
//! # Usage
//!
//! ```ignore
//! use models::ModelRegistry;
//!
//! let registry = ModelRegistry::load_published("models")?;
//! for name in registry.select(&["TrendV1", "p4"]) {
//!     println!("{}", ModelRegistry::public_name(name));
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::booster::Booster;
use crate::error::RegistryError;
use crate::{BOOSTER_PREFIX, PUBLISHED_MARKER, Predictor};

/// Name -> model map.
///
/// Names keep the publish marker (`+xgb_demo_sig1`); use
/// [`ModelRegistry::public_name`] when showing them to clients.
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn Predictor>>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Load every published artifact in `dir`.
    ///
    /// Only regular `.json` files whose name starts with the publish marker
    /// are loaded; everything else is skipped. A marked file that fails to
    /// load aborts the whole load.
    pub fn load_published<P: AsRef<Path>>(dir: P) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut registry = Self::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            let Some(stem) = published_stem(&path) else {
                debug!(path = %path.display(), "Skipping unpublished file");
                continue;
            };

            let booster = Booster::from_json(&path).map_err(|source| RegistryError::Model {
                path: path.clone(),
                source,
            })?;
            debug!(name = stem, features = booster.n_features(), "Loaded model");
            registry.register(stem, booster);
        }

        info!(
            dir = %dir.display(),
            count = registry.len(),
            "Model registry loaded"
        );
        Ok(registry)
    }

    /// Register a model under `name`, replacing any previous entry.
    pub fn register<M: Predictor + 'static>(&mut self, name: impl Into<String>, model: M) {
        self.models.insert(name.into(), Arc::new(model));
    }

    /// Register a model that is already `Arc`-wrapped.
    pub fn register_arc(&mut self, name: impl Into<String>, model: Arc<dyn Predictor>) {
        self.models.insert(name.into(), model);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Predictor>> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered names in sorted order, marker included.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Registered names with the publish marker stripped.
    pub fn public_names(&self) -> Vec<&str> {
        self.models.keys().map(|n| Self::public_name(n)).collect()
    }

    /// Names containing every marking as a substring.
    ///
    /// An empty marking list matches every model.
    pub fn select<S: AsRef<str>>(&self, markings: &[S]) -> Vec<&str> {
        self.models
            .keys()
            .filter(|name| markings.iter().all(|m| name.contains(m.as_ref())))
            .map(String::as_str)
            .collect()
    }

    /// Client-facing name: the registry name without its leading marker.
    pub fn public_name(name: &str) -> &str {
        name.strip_prefix(PUBLISHED_MARKER).unwrap_or(name)
    }

    /// Whether `name` refers to a published boosted-tree model.
    pub fn is_booster(name: &str) -> bool {
        name.starts_with(BOOSTER_PREFIX)
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("model_count", &self.models.len())
            .field("models", &self.model_names())
            .finish()
    }
}

/// File stem of a published `.json` artifact, `None` for anything else.
fn published_stem(path: &Path) -> Option<&str> {
    if !path.is_file() || path.extension()? != "json" {
        return None;
    }
    path.file_stem()?
        .to_str()
        .filter(|stem| stem.starts_with(PUBLISHED_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelError;
    use crate::booster::tests::trained_artifact;

    /// Mock model returning a constant per row.
    struct MockModel {
        value: f64,
        width: usize,
    }

    impl Predictor for MockModel {
        fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
            Ok(vec![self.value; rows.len()])
        }

        fn n_features(&self) -> usize {
            self.width
        }
    }

    fn mock(value: f64) -> MockModel {
        MockModel { value, width: 2 }
    }

    fn sample_registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register("+xgb_TrendV1-M15_PerfectTrend-p4", mock(0.1));
        registry.register("+xgb_TrendV1-M15_PerfectTrend-p8", mock(0.2));
        registry.register("+xgb_RangeV2-H1_Breakout-p4", mock(0.3));
        registry
    }

    #[test]
    fn test_registry_creation() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_get() {
        let registry = sample_registry();

        assert_eq!(registry.len(), 3);
        assert!(registry.contains("+xgb_RangeV2-H1_Breakout-p4"));
        assert!(!registry.contains("xgb_RangeV2-H1_Breakout-p4"));

        let model = registry.get("+xgb_RangeV2-H1_Breakout-p4").unwrap();
        assert_eq!(model.predict(&[vec![0.0, 0.0]]).unwrap(), vec![0.3]);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ModelRegistry::new();
        registry.register("+xgb_a", mock(0.1));
        registry.register_arc("+xgb_a", Arc::new(mock(0.9)));

        assert_eq!(registry.len(), 1);
        let model = registry.get("+xgb_a").unwrap();
        assert_eq!(model.predict(&[vec![]]).unwrap(), vec![0.9]);
    }

    #[test]
    fn test_select_requires_every_marking() {
        let registry = sample_registry();

        assert_eq!(
            registry.select(&["TrendV1", "p4"]),
            vec!["+xgb_TrendV1-M15_PerfectTrend-p4"]
        );
        assert_eq!(registry.select(&["p4"]).len(), 2);
        assert!(registry.select(&["TrendV1", "Breakout"]).is_empty());
    }

    #[test]
    fn test_select_is_substring_match() {
        let registry = sample_registry();
        // Markings need not align with the `_`-separated name parts.
        assert_eq!(registry.select(&["end-p"]).len(), 2);
    }

    #[test]
    fn test_select_empty_markings_matches_all() {
        let registry = sample_registry();
        let none: [&str; 0] = [];
        assert_eq!(registry.select(&none).len(), 3);
    }

    #[test]
    fn test_public_names() {
        assert_eq!(
            ModelRegistry::public_name("+xgb_demo_sig1"),
            "xgb_demo_sig1"
        );
        assert_eq!(ModelRegistry::public_name("xgb_demo_sig1"), "xgb_demo_sig1");

        let registry = sample_registry();
        assert_eq!(
            registry.public_names(),
            vec![
                "xgb_RangeV2-H1_Breakout-p4",
                "xgb_TrendV1-M15_PerfectTrend-p4",
                "xgb_TrendV1-M15_PerfectTrend-p8",
            ]
        );
    }

    #[test]
    fn test_is_booster() {
        assert!(ModelRegistry::is_booster("+xgb_demo_sig1"));
        assert!(!ModelRegistry::is_booster("xgb_demo_sig1"));
        assert!(!ModelRegistry::is_booster("+lgb_demo_sig1"));
    }

    #[test]
    fn test_load_published_skips_unmarked() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();

        trained_artifact("xgb_demo_sig1")
            .save(base.join("+xgb_demo_sig1.json"))
            .unwrap();
        trained_artifact("xgb_demo_sig2")
            .save(base.join("xgb_demo_sig2.json"))
            .unwrap();
        std::fs::write(base.join("+notes.txt"), "not a model").unwrap();
        std::fs::create_dir(base.join("+archive.json")).unwrap();

        let registry = ModelRegistry::load_published(base).unwrap();
        assert_eq!(registry.model_names(), vec!["+xgb_demo_sig1"]);
        assert_eq!(registry.get("+xgb_demo_sig1").unwrap().n_features(), 1);
    }

    #[test]
    fn test_load_published_bad_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("+xgb_broken.json"), "{}").unwrap();

        assert!(matches!(
            ModelRegistry::load_published(dir.path()),
            Err(RegistryError::Model { .. })
        ));
    }

    #[test]
    fn test_load_published_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelRegistry::load_published(dir.path().join("absent")),
            Err(RegistryError::ReadDir { .. })
        ));
    }
}
