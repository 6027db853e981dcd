//! scanwatch - GuardDuty malware scan status over HTTP
//!
//! Answers "has this upload been scanned, and is it safe?" by reading the
//! `GuardDutyMalwareScanStatus` tag that GuardDuty Malware Protection writes
//! onto S3 objects once a scan completes.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod scan;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
