//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: liveness endpoint
//! - [`predict`]: model selection and inference
//! - [`listing`]: served model names

pub mod health;
pub mod listing;
pub mod predict;
