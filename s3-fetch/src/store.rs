//! Object store seam
//!
//! The handler only needs one operation from its storage collaborator, and it
//! wants the result already classified rather than as an opaque error.

use async_trait::async_trait;
use bytes::Bytes;

/// Result of a single "get object" request
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The object exists. `content_type` is whatever the store declared for it.
    Found {
        bytes: Bytes,
        content_type: Option<String>,
    },
    /// The store reported that the key does not exist
    NotFound,
    /// The store answered with a service level failure (auth, throttling, ...)
    ServiceError(String),
    /// Anything else: request construction, dispatch, timeouts, body reads
    OtherError(String),
}

/// A store objects can be fetched from.
///
/// Implementations make exactly one attempt per call. `bucket` and `key`
/// are passed through as given; a missing one is the implementation's to reject.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: Option<&str>, key: Option<&str>) -> FetchOutcome;
}
