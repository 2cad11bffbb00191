//! Request/response seam between [`ApiClient`](super::ApiClient) and the
//! network.
//!
//! [`Transport`] is deliberately narrow: it moves one request to the server
//! and hands back the raw status and body. Status interpretation, token
//! handling and decoding stay in the client, so a scripted fake can stand in
//! for [`HttpTransport`] in tests.

use super::endpoint::HttpMethod;
use crate::domain::error::{CinelistError, Result};
use futures_util::future::BoxFuture;
use std::time::Duration;

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, always starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Bearer token for authenticated endpoints.
    pub bearer: Option<String>,
}

/// Raw server answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Moves a request to the server.
///
/// Implementations return `Err` only when no HTTP response was obtained
/// (connection refused, timeout, TLS failure). Any status code, including
/// 4xx and 5xx, is an `Ok` response.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>>;
}

/// [`Transport`] over HTTPS using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CinelistError::Config`] if the underlying client cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CinelistError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(async move {
            let url = format!("{}{}", self.base_url, request.path);
            let mut builder = self.client.request(request.method.into(), &url);

            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(token) = &request.bearer {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| CinelistError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| CinelistError::Transport(format!("failed to read body: {e}")))?;

            Ok(ApiResponse { status, body })
        })
    }
}
