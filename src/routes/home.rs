//! Greeting page, used to confirm the server is up.

/// Fixed plaintext greeting served at `/`
pub const GREETING: &str = "Hello! The server is up and running.";

pub async fn index() -> &'static str {
    GREETING
}
