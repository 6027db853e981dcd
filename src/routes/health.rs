//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! It never touches the object store.

/// Health check handler.
pub async fn health() -> &'static str {
    "ok"
}
