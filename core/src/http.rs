//! HTTP transport types and the transport capability.
//!
//! # Design
//! Requests and responses are plain owned data. `UsersApi` builds
//! `HttpRequest` values without touching the network; an `HttpService`
//! implementation supplied by the host performs the actual round-trip and
//! hands back the raw body. Keeping the I/O behind one trait method makes
//! every layer above it testable with a recording stub.

use async_trait::async_trait;

use crate::error::{ApiError, HttpError};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the service base URL and already has its path
/// parameters substituted. `query` holds only the parameters that were
/// present; absent optional parameters never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Absolute URL for this request against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}/{}", base_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            // Encoding a list of string pairs cannot fail.
            let encoded = serde_urlencoded::to_string(&self.query).unwrap_or_default();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// The body of a 2xx response, or the `HttpError` describing any other
    /// status.
    pub fn into_body(self) -> Result<String, HttpError> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            Err(HttpError::from_response(self.status, self.body))
        }
    }
}

/// Build a query parameter list from optional values.
///
/// `None` drops the key entirely; `Some("")` is kept as an explicit empty
/// value.
pub fn query_params<V: ToString>(params: &[(&str, Option<V>)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|value| ((*key).to_string(), value.to_string()))
        })
        .collect()
}

/// Transport capability consumed by the remote data source.
///
/// Implementations execute `request` (GET, POST, PUT or PATCH, as carried
/// by `request.method`) and return the raw body of a 2xx response. A
/// non-2xx response is reported as `ApiError::Http`; a failure to obtain
/// any response as `ApiError::Transport`.
#[async_trait]
pub trait HttpService: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<String, ApiError>;
}
