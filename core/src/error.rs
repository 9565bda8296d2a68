//! Error types for the timesheet API client.
//!
//! # Design
//! 400 and 404 get dedicated variants carrying the server's `message`
//! because callers act on them: fix the input, or drop a stale id. Every
//! other unexpected status lands in `HttpError` with the raw body.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by `TimesheetClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 400: a filter parameter or payload was rejected.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The server returned 404. `data` is the payload it echoed back.
    #[error("not found: {message}")]
    NotFound {
        message: String,
        data: Option<Value>,
    },

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
