//! Server crate: Axum prediction service over published boosted-tree models.
//!
//! The registry is loaded once before the router is built and shared
//! read-only by every handler; requests never touch the models directory.
//!
//! # Modules
//!
//! - [`app`]: router, middleware and [`ServerConfig`]
//! - [`state`]: shared handler state (the model registry)
//! - [`error`]: request failures mapped to HTTP status codes
//! - [`routes`]: `/ping`, `/predict` and `/models` handlers
//!
//! # Endpoints
//!
//! - `GET /ping` - liveness, plain `pong`
//! - `POST /predict` - run every model matching the request markings
//! - `GET /models` - public names of the served models

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{ServerConfig, create_app, serve};
pub use error::{PredictError, ServeError};
pub use state::ServerState;
