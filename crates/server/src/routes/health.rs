//! Liveness endpoint.

/// `GET /ping`: always `pong`, whatever the registry holds.
pub async fn ping() -> &'static str {
    "pong"
}
