//! Result types on either side of the repository boundary.
//!
//! # Design
//! `ApiResponse` is what the data source hands up: a decoded DTO, a
//! structured server error, or any other failure. `DomainResult` is what
//! callers of the repository see; it collapses the two failure branches into
//! one `Error` variant carrying a message and the optional title and icon of
//! a structured server error.

use crate::dto::ErrorDetail;
use crate::error::{ApiError, HttpError};

/// Outcome of a data source operation.
#[derive(Debug)]
pub enum ApiResponse<T> {
    Success(T),
    /// The server reported a structured error (validation, not found, ...).
    Failed(ErrorDetail),
    /// Transport, decode, or any other unexpected failure.
    Error(ApiError),
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            ApiResponse::Success(data) => ApiResponse::Success(f(data)),
            ApiResponse::Failed(detail) => ApiResponse::Failed(detail),
            ApiResponse::Error(err) => ApiResponse::Error(err),
        }
    }
}

impl<T> From<ApiError> for ApiResponse<T> {
    /// HTTP errors carrying a structured payload become `Failed`; everything
    /// else becomes `Error`.
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(http) => http.into_api_response(),
            other => ApiResponse::Error(other),
        }
    }
}

impl HttpError {
    pub fn into_api_response<T>(self) -> ApiResponse<T> {
        match self.payload {
            Some(detail) => ApiResponse::Failed(detail),
            None => ApiResponse::Error(ApiError::Http(self)),
        }
    }
}

/// Outcome of a repository operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainResult<T> {
    Success(T),
    Error {
        message: String,
        message_title: Option<String>,
        icon_code: Option<String>,
    },
}

impl<T> DomainResult<T> {
    /// An error carrying only a message.
    pub fn error(message: impl Into<String>) -> Self {
        DomainResult::Error {
            message: message.into(),
            message_title: None,
            icon_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DomainResult::Success(_))
    }

    /// The error message, if this is an error.
    pub fn message(&self) -> Option<&str> {
        match self {
            DomainResult::Success(_) => None,
            DomainResult::Error { message, .. } => Some(message),
        }
    }

    /// Convert into a `Result`, keeping the error fields as an `ErrorDetail`.
    pub fn into_result(self) -> Result<T, ErrorDetail> {
        match self {
            DomainResult::Success(data) => Ok(data),
            DomainResult::Error {
                message,
                message_title,
                icon_code,
            } => Err(ErrorDetail {
                message,
                message_title,
                icon_code,
            }),
        }
    }
}

impl<T> From<ErrorDetail> for DomainResult<T> {
    fn from(detail: ErrorDetail) -> Self {
        DomainResult::Error {
            message: detail.message,
            message_title: detail.message_title,
            icon_code: detail.icon_code,
        }
    }
}

impl<T> From<ApiError> for DomainResult<T> {
    fn from(err: ApiError) -> Self {
        DomainResult::error(err.to_string())
    }
}
