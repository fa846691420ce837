//! Error handling for the server.
//!
//! Every [`PredictError`] variant declares its HTTP status and renders the
//! same envelope as a successful prediction, with an empty `predict` map.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routes::predict::PredictResponse;

/// Rejected or failed prediction request.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Empty request body (403).
    #[error("request body is missing")]
    MissingBody,

    /// Body is not a JSON object (403).
    #[error("invalid body format")]
    InvalidBody,

    /// Required top-level field absent (403).
    #[error("missing required field: \"{0}\"")]
    MissingField(&'static str),

    /// Field present with the wrong JSON type (403).
    #[error("invalid field format: \"{0}\"")]
    InvalidField(&'static str),

    /// No registered model contains every marking (404).
    #[error("no models found for markings: {}", .0.join(", "))]
    NoModels(Vec<String>),

    /// Inference failed for a matched model (500).
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Models matched but none of them produced a prediction (403).
    #[error("empty prediction")]
    EmptyPrediction,
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::NoModels(_) => StatusCode::NOT_FOUND,
            PredictError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PredictError::MissingBody
            | PredictError::InvalidBody
            | PredictError::MissingField(_)
            | PredictError::InvalidField(_)
            | PredictError::EmptyPrediction => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = PredictResponse::new(BTreeMap::new(), self.to_string(), status);
        (status, Json(body)).into_response()
    }
}

/// Result type alias for the predict handler.
pub type PredictResult<T> = Result<T, PredictError>;

/// Failure bringing the service up or while it runs.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Registry(#[from] models::RegistryError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
