//! Error types for the users API pipeline.
//!
//! # Design
//! `ApiError` is the taxonomy below the repository boundary: transport
//! failures, non-2xx HTTP responses, body (de)serialization failures and
//! DTO mapping failures. None of these escape the repository; they are
//! flattened into `DomainResult::Error` there.
//!
//! `HttpError` keeps the structured server payload (when the response body
//! carried one) separate from the raw body so the data source can decide
//! between `ApiResponse::Failed` and `ApiResponse::Error`.

use thiserror::Error;

use crate::dto::ErrorDetail;

/// Errors produced while executing or interpreting a users API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, I/O error).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A decoded DTO could not be turned into a domain model.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// A non-2xx HTTP response.
#[derive(Debug, Clone, Error)]
#[error("HTTP {status}: {}", self.summary())]
pub struct HttpError {
    pub status: u16,
    /// Structured error payload, present when the body decoded as one.
    pub payload: Option<ErrorDetail>,
    pub body: String,
}

impl HttpError {
    /// Build an `HttpError` from a raw status and body, decoding the body as
    /// an `ErrorDetail` when it has that shape.
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let payload = serde_json::from_str::<ErrorDetail>(&body).ok();
        Self {
            status,
            payload,
            body,
        }
    }

    fn summary(&self) -> &str {
        match &self.payload {
            Some(detail) => &detail.message,
            None => &self.body,
        }
    }
}

/// A response DTO field that cannot be represented in the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot map field `{field}`: {reason}")]
pub struct MappingError {
    pub field: &'static str,
    pub reason: String,
}

impl MappingError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
