//! Object store access.
//!
//! Handlers only see the [`TagStore`] trait. The production implementation is
//! [`S3TagStore`]; tests swap in an in-memory double.

mod s3;

pub use s3::S3TagStore;

use async_trait::async_trait;

use crate::scan::Tag;

/// Read access to object tag sets.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Fetch the ordered tag set for `key`. Never cached.
    async fn object_tags(&self, key: &str) -> Result<Vec<Tag>, StorageError>;

    /// Bucket this store reads from, for logging
    fn bucket(&self) -> &str;
}

/// Failure while reading from the object store.
///
/// Callers report every variant the same way; the detail is for the logs.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The service answered with an error (NoSuchKey, AccessDenied, ...)
    #[error("{operation} failed for '{key}' [{code}]: {message}")]
    Service {
        operation: &'static str,
        key: String,
        code: String,
        message: String,
    },

    /// The request never produced a service response (network, timeout, credentials)
    #[error("{operation} failed for '{key}': {message}")]
    Request {
        operation: &'static str,
        key: String,
        message: String,
    },
}

impl StorageError {
    /// Service error code, if the store returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            StorageError::Service { code, .. } => Some(code),
            StorageError::Request { .. } => None,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            StorageError::Service { key, .. } | StorageError::Request { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = StorageError::Service {
            operation: "GetObjectTagging",
            key: "uploads/a.pdf".to_string(),
            code: "NoSuchKey".to_string(),
            message: "The specified key does not exist.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GetObjectTagging failed for 'uploads/a.pdf' [NoSuchKey]: The specified key does not exist."
        );
        assert_eq!(err.code(), Some("NoSuchKey"));
        assert_eq!(err.key(), "uploads/a.pdf");
    }

    #[test]
    fn test_request_error_has_no_code() {
        let err = StorageError::Request {
            operation: "GetObjectTagging",
            key: "uploads/a.pdf".to_string(),
            message: "dispatch failure".to_string(),
        };
        assert_eq!(err.code(), None);
        assert!(err.to_string().contains("dispatch failure"));
    }
}
