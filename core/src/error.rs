//! Error types for the Grepper API client.
//!
//! # Design
//! Every status the service documents gets its own unit variant so callers
//! can match on the failure kind directly. Statuses outside that table land
//! in `UnclassifiedHttpError` with the raw status and body, so a non-200
//! response always produces an error.

use thiserror::Error;

/// Errors returned by `GrepperClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400
    #[error("bad request")]
    BadRequest,

    /// 401: the API key was missing or not accepted.
    #[error("unauthorized")]
    Unauthorized,

    /// 403
    #[error("forbidden")]
    Forbidden,

    /// 404: the requested answer does not exist.
    #[error("not found")]
    NotFound,

    /// 405
    #[error("method not allowed")]
    MethodNotAllowed,

    /// 429: the service is rate limiting this key.
    #[error("too many requests")]
    TooManyRequests,

    /// 500
    #[error("internal server error")]
    InternalServerError,

    /// 503
    #[error("service unavailable")]
    ServiceUnavailable,

    /// Any other non-200 status.
    #[error("unexpected HTTP status {status}: {body}")]
    UnclassifiedHttpError { status: u16, body: String },

    /// A 200 response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The transport failed before a response was received.
    #[error("transport failed: {0}")]
    TransportError(String),
}

impl ApiError {
    /// Classify a non-200 status code.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => ApiError::BadRequest,
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            405 => ApiError::MethodNotAllowed,
            429 => ApiError::TooManyRequests,
            500 => ApiError::InternalServerError,
            503 => ApiError::ServiceUnavailable,
            _ => ApiError::UnclassifiedHttpError { status, body },
        }
    }

    /// The HTTP status this error was classified from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest => Some(400),
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::MethodNotAllowed => Some(405),
            ApiError::TooManyRequests => Some(429),
            ApiError::InternalServerError => Some(500),
            ApiError::ServiceUnavailable => Some(503),
            ApiError::UnclassifiedHttpError { status, .. } => Some(*status),
            ApiError::DeserializationError(_) | ApiError::TransportError(_) => None,
        }
    }
}
