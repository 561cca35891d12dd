//! Per-request metadata.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Carry request-scoped values through the handler chain
//!
//! # Design Decisions
//! - Metadata travels as an explicit argument next to the request, never
//!   as an untyped lookup
//! - Request ID added as early as possible for log correlation

use std::fmt;

use uuid::Uuid;

/// Response header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Unique identifier of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Values attached to a request while it moves through the middleware chain.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Set by the request-ID middleware.
    pub request_id: Option<RequestId>,
}

impl RequestMeta {
    /// Request ID as a string, empty when none was assigned.
    pub fn request_id_str(&self) -> &str {
        self.request_id.as_ref().map(RequestId::as_str).unwrap_or("")
    }
}
