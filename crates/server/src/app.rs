//! Axum application builder and service lifecycle.
//!
//! Configures routes, middleware and state, and runs the service on a bound
//! listener.
//!
//! # Routes
//!
//! - `GET /ping` - liveness
//! - `POST /predict` - model selection and inference
//! - `GET /models` - served model names

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use models::ModelRegistry;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ServeError;
use crate::routes::{health, listing, predict};
use crate::state::ServerState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the Axum application with all routes.
pub fn create_app(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/ping", get(health::ping))
        .route("/predict", post(predict::predict))
        .route("/models", get(listing::list_models))
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory scanned for published models at startup.
    pub models_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 8080,
            models_dir: PathBuf::from("models"),
        }
    }
}

impl ServerConfig {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = dir.into();
        self
    }

    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the published models, bind, and serve until the server stops.
pub async fn serve(config: &ServerConfig) -> Result<(), ServeError> {
    let registry = ModelRegistry::load_published(&config.models_dir)?;
    if registry.is_empty() {
        warn!(dir = %config.models_dir.display(), "No published models found");
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let app = create_app(ServerState::new(registry));
    info!("running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.bind_addr(), "localhost:8080");
        assert_eq!(config.models_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::default()
            .host("0.0.0.0")
            .port(9000)
            .models_dir("/srv/models");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.models_dir, PathBuf::from("/srv/models"));
    }

    #[test]
    fn test_create_app() {
        let _app = create_app(ServerState::new(ModelRegistry::new()));
    }

    #[tokio::test]
    async fn test_serve_fails_without_models_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::default()
            .port(0)
            .models_dir(dir.path().join("absent"));

        assert!(matches!(serve(&config).await, Err(ServeError::Registry(_))));
    }
}
