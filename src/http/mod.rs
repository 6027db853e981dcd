//! HTTP server startup and lifecycle.
//!
//! Binds the configured address and serves the router until SIGTERM/SIGINT,
//! then drains in-flight requests before exiting.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
