//! Handler for the malware scan status check.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use crate::error::AppError;
use crate::scan::ScanStatusResponse;
use crate::state::AppState;

/// Name of the query parameter carrying the object key
pub const KEY_PARAM: &str = "key";

/// Query parameters for the scan status check.
#[derive(Debug, Default)]
pub struct ScanStatusParams {
    /// Object key of the uploaded file in the bucket
    pub key: Option<String>,
}

impl ScanStatusParams {
    /// Pick the parameters out of raw query pairs.
    ///
    /// A repeated `key` resolves to its first occurrence.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let key = pairs
            .into_iter()
            .find(|(name, _)| name == KEY_PARAM)
            .map(|(_, value)| value);
        Self { key }
    }

    /// The file key, if present and non-empty
    pub fn file_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Handler reporting GuardDuty scan status for one object.
///
/// Makes exactly one tagging lookup per valid request and none when the key is
/// missing.
#[instrument(
    name = "scan::check_scan_status",
    skip(state, pairs),
    fields(key = tracing::field::Empty)
)]
pub async fn check_scan_status(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ScanStatusResponse>, AppError> {
    let params = ScanStatusParams::from_pairs(pairs);
    let key = params.file_key().ok_or(AppError::MissingFileKey)?;
    tracing::Span::current().record("key", key);

    let tags = state.tags.object_tags(key).await?;
    let status = ScanStatusResponse::from_tags(&tags);

    tracing::debug!(
        status = %status.status,
        complete = status.is_complete(),
        is_safe = ?status.is_safe,
        "Resolved scan status"
    );

    Ok(Json(status))
}
