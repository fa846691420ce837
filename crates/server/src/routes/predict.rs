//! Prediction endpoint: `POST /predict`.
//!
//! Request body:
//!
//! ```json
//! { "features": [[0.1, 0.2, 0.3]], "markings": ["TrendV1", "p4"] }
//! ```
//!
//! Every registered model whose name contains all markings is selected; the
//! boosted-tree models among them run on `features` and their outputs are
//! returned under their public names. Success and failure share one envelope:
//!
//! ```json
//! { "data": { "predict": { "xgb_TrendV1_p4": [0.73] }, "error": "" }, "status": 200 }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use models::{ModelRegistry, Predictor};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PredictError, PredictResult};
use crate::state::ServerState;

/// Model name -> one prediction per feature row.
pub type Predictions = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Serialize)]
pub struct PredictData {
    pub predict: Predictions,
    /// Empty on success.
    pub error: String,
}

/// Response envelope; `status` mirrors the HTTP status code.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub data: PredictData,
    pub status: u16,
}

impl PredictResponse {
    pub fn new(predict: Predictions, error: String, status: StatusCode) -> Self {
        Self {
            data: PredictData { predict, error },
            status: status.as_u16(),
        }
    }
}

/// Parsed request: markings validated, features left raw until a model needs them.
struct PredictRequest {
    features: Value,
    markings: Vec<String>,
}

impl PredictRequest {
    fn parse(body: &[u8]) -> PredictResult<Self> {
        if body.is_empty() {
            return Err(PredictError::MissingBody);
        }
        let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
            return Err(PredictError::InvalidBody);
        };

        let features = fields
            .remove("features")
            .ok_or(PredictError::MissingField("features"))?;
        let markings = fields
            .remove("markings")
            .ok_or(PredictError::MissingField("markings"))?;
        let markings = serde_json::from_value::<Vec<String>>(markings)
            .map_err(|_| PredictError::InvalidField("markings"))?;

        Ok(Self { features, markings })
    }
}

/// `POST /predict`
pub async fn predict(
    State(state): State<ServerState>,
    body: Bytes,
) -> PredictResult<Json<PredictResponse>> {
    match run_predict(&state.registry, &body).await {
        Ok(predictions) => Ok(Json(PredictResponse::new(
            predictions,
            String::new(),
            StatusCode::OK,
        ))),
        Err(err) => {
            warn!(status = err.status().as_u16(), error = %err, "Prediction request failed");
            Err(err)
        }
    }
}

async fn run_predict(registry: &ModelRegistry, body: &[u8]) -> PredictResult<Predictions> {
    let request = PredictRequest::parse(body)?;

    let matched = registry.select(&request.markings);
    if matched.is_empty() {
        return Err(PredictError::NoModels(request.markings));
    }
    debug!(markings = ?request.markings, models = ?matched, "Models selected");

    let boosters: Vec<(String, Arc<dyn Predictor>)> = matched
        .into_iter()
        .filter(|name| ModelRegistry::is_booster(name))
        .filter_map(|name| {
            let model = registry.get(name)?;
            Some((
                ModelRegistry::public_name(name).to_string(),
                Arc::clone(model),
            ))
        })
        .collect();
    if boosters.is_empty() {
        return Err(PredictError::EmptyPrediction);
    }

    let rows: Vec<Vec<f64>> = serde_json::from_value(request.features)
        .map_err(|e| PredictError::Prediction(format!("invalid features: {}", e)))?;
    if rows.is_empty() {
        return Err(PredictError::Prediction("no feature rows".into()));
    }

    // Tree traversal is CPU-bound; keep it off the async workers.
    let predictions = tokio::task::spawn_blocking(move || {
        boosters
            .into_iter()
            .map(|(name, model)| model.predict(&rows).map(|values| (name, values)))
            .collect::<Result<Predictions, _>>()
    })
    .await
    .map_err(|e| PredictError::Prediction(e.to_string()))?
    .map_err(|e| PredictError::Prediction(e.to_string()))?;

    if predictions.is_empty() {
        return Err(PredictError::EmptyPrediction);
    }
    Ok(predictions)
}
