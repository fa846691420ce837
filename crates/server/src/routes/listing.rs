//! Served model names: `GET /models`.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    /// Public model names, marker stripped, sorted.
    pub models: Vec<String>,
    pub count: usize,
}

pub async fn list_models(State(state): State<ServerState>) -> Json<ModelsResponse> {
    let models: Vec<String> = state
        .registry
        .public_names()
        .into_iter()
        .map(String::from)
        .collect();

    Json(ModelsResponse {
        count: models.len(),
        models,
    })
}
