//! REST request layer for the Girder HTTP API.
//!
//! Wraps a [`reqwest::Client`] with the base URL, the optional
//! `Girder-Token` authentication header, and the mock-mutations
//! short-circuit used for offline/demo operation.

use girdertree_core::{Entity, FetchDescriptor, Method, RestRequest};

use crate::config::TreeviewConfig;

/// Header carrying the authentication token.
const TOKEN_HEADER: &str = "Girder-Token";

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Girder returned a non-2xx status code.
    #[error("Girder API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// HTTP client for a single Girder server.
pub struct GirderClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    mock_mutations: bool,
}

impl GirderClient {
    /// Create a new client from the widget configuration.
    pub fn new(config: &TreeviewConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful
    /// for connection pooling across multiple widgets on one page).
    pub fn with_client(client: reqwest::Client, config: &TreeviewConfig) -> Self {
        Self {
            client,
            api_url: config.api.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            mock_mutations: config.mock_mutations,
        }
    }

    /// Base HTTP API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the currently authenticated user.
    ///
    /// Sends `GET /user/me`. Girder answers `null` for anonymous
    /// sessions, which maps to `None`.
    pub async fn current_user(&self) -> Result<Option<Entity>, RestError> {
        let response = self.start(Method::Get, "/user/me").send().await?;
        Self::parse_response(response).await
    }

    /// Issue one child-listing request from a fetch descriptor.
    ///
    /// Appends the descriptor's offset and the given page limit to its
    /// fixed query parameters.
    pub async fn list(
        &self,
        fetch: &FetchDescriptor,
        limit: usize,
    ) -> Result<Vec<Entity>, RestError> {
        let response = self
            .start(Method::Get, &fetch.path)
            .query(&fetch.query(limit))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Execute a fully specified request (the mutation path).
    ///
    /// When mock mutations are enabled, every non-GET request is logged
    /// and answered with a synthetic success payload instead of
    /// contacting the backend.
    pub async fn execute(&self, request: &RestRequest) -> Result<serde_json::Value, RestError> {
        if self.mock_mutations && request.method.is_mutation() {
            tracing::info!(
                method = request.method.as_str(),
                path = %request.path,
                params = ?request.params,
                "Mocking mutation request"
            );
            return Ok(serde_json::json!({ "_id": "deadbeef" }));
        }

        let response = self
            .start(request.method, &request.path)
            .query(&request.params)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Begin a request builder with base URL and token header applied.
    fn start(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.api_url, path));
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        builder
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`RestError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RestError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RestError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RestError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
