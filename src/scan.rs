//! Scan status derived from an object's tag set.
//!
//! GuardDuty Malware Protection for S3 writes a `GuardDutyMalwareScanStatus`
//! tag onto each object once it has finished scanning it. Until that tag shows
//! up, the object is still being scanned.

use serde::Serialize;

/// Tag key written by GuardDuty when a scan completes
pub const SCAN_STATUS_TAG: &str = "GuardDutyMalwareScanStatus";

/// The only tag value that marks an object as safe
pub const NO_THREATS_FOUND: &str = "NO_THREATS_FOUND";

/// Reported while the scan status tag is absent
pub const SCANNING: &str = "SCANNING";

/// A single key/value tag attached to a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// JSON body returned by the scan status endpoint.
///
/// `is_safe` is omitted entirely while the object is still scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStatusResponse {
    pub status: String,
    #[serde(rename = "isSafe", skip_serializing_if = "Option::is_none")]
    pub is_safe: Option<bool>,
}

impl ScanStatusResponse {
    /// Build the response from an ordered tag set. The first matching tag wins.
    pub fn from_tags(tags: &[Tag]) -> Self {
        match tags.iter().find(|tag| tag.key == SCAN_STATUS_TAG) {
            Some(tag) => Self {
                status: tag.value.clone(),
                is_safe: Some(tag.value == NO_THREATS_FOUND),
            },
            None => Self::scanning(),
        }
    }

    pub fn scanning() -> Self {
        Self {
            status: SCANNING.to_string(),
            is_safe: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.is_safe.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tags_is_scanning() {
        let status = ScanStatusResponse::from_tags(&[]);
        assert_eq!(status, ScanStatusResponse::scanning());
        assert!(!status.is_complete());
    }

    #[test]
    fn test_unrelated_tags_is_scanning() {
        let tags = [Tag::new("project", "uploads"), Tag::new("owner", "web")];
        assert_eq!(ScanStatusResponse::from_tags(&tags).status, SCANNING);
    }

    #[test]
    fn test_no_threats_found_is_safe() {
        let tags = [Tag::new(SCAN_STATUS_TAG, "NO_THREATS_FOUND")];
        let status = ScanStatusResponse::from_tags(&tags);
        assert_eq!(status.status, "NO_THREATS_FOUND");
        assert_eq!(status.is_safe, Some(true));
    }

    #[test]
    fn test_other_values_are_unsafe() {
        for value in ["THREATS_FOUND", "UNSUPPORTED", "ACCESS_DENIED", "FAILED", ""] {
            let tags = [Tag::new(SCAN_STATUS_TAG, value)];
            let status = ScanStatusResponse::from_tags(&tags);
            assert_eq!(status.status, value);
            assert_eq!(status.is_safe, Some(false), "value {value:?}");
        }
    }

    #[test]
    fn test_first_matching_tag_wins() {
        let tags = [
            Tag::new("owner", "web"),
            Tag::new(SCAN_STATUS_TAG, "THREATS_FOUND"),
            Tag::new(SCAN_STATUS_TAG, "NO_THREATS_FOUND"),
        ];
        let status = ScanStatusResponse::from_tags(&tags);
        assert_eq!(status.status, "THREATS_FOUND");
        assert_eq!(status.is_safe, Some(false));
    }

    #[test]
    fn test_tag_key_match_is_case_sensitive() {
        let tags = [Tag::new("guarddutymalwarescanstatus", "NO_THREATS_FOUND")];
        assert_eq!(ScanStatusResponse::from_tags(&tags).status, SCANNING);
    }

    #[test]
    fn test_serialize_scanning_omits_is_safe() {
        let json = serde_json::to_value(ScanStatusResponse::scanning()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "SCANNING" }));
    }

    #[test]
    fn test_serialize_complete_uses_camel_case() {
        let tags = [Tag::new(SCAN_STATUS_TAG, "NO_THREATS_FOUND")];
        let json = serde_json::to_value(ScanStatusResponse::from_tags(&tags)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "NO_THREATS_FOUND", "isSafe": true })
        );
    }
}
