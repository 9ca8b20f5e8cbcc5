//! Pull/merge request creation layer
//!
//! Same shape as the git module: a [RequestClient] trait, an HTTP
//! implementation speaking the hosting platforms' REST APIs, and a mock
//! implementation for testing.

pub mod http;
pub mod mock;

pub use http::HttpRequestClient;
pub use mock::MockRequestClient;

use crate::error::Result;

/// A pull/merge request to be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Branch the changes come from
    pub source_branch: String,
    /// Branch the request targets
    pub target_branch: String,
    /// Request title
    pub title: String,
    /// Request body text
    pub body: String,
}

/// A request that was opened on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRequest {
    /// Web URL of the created request
    pub url: String,
    /// Platform-assigned request number
    pub number: u64,
}

/// Common request-creation trait for abstraction
///
/// Implementations map platform-specific failures to
/// [crate::error::GitRelayError::Request] so callers can decide whether a
/// failed request aborts the run or is logged and skipped.
pub trait RequestClient: Send + Sync {
    /// Open a pull/merge request on the hosting platform
    fn create_request(&self, spec: &RequestSpec) -> Result<CreatedRequest>;
}
