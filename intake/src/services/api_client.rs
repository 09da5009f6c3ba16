//! REST API client for the commerce backend
//!
//! Thin JSON wrapper around `reqwest` that attaches the session's bearer token
//! and turns non-2xx responses into [`IntakeError::NetworkError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use shared::{ApiErrorBody, SessionContext};
use crate::error::{IntakeError, IntakeResult};

/// HTTP client bound to one backend base URL and one session
#[derive(Clone)]
pub struct RealApiClient {
    base_url: String,
    client: reqwest::Client,
    session: Arc<SessionContext>,
}

impl RealApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration, session: Arc<SessionContext>) -> IntakeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntakeError::ConfigError {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> IntakeResult<T> {
        self.send(Method::GET, path, |req| req).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> IntakeResult<T> {
        self.send(Method::GET, path, |req| req.query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> IntakeResult<T> {
        self.send(Method::POST, path, |req| req.json(body)).await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> IntakeResult<T> {
        self.send(Method::POST, path, |req| req).await
    }

    async fn send<T, F>(&self, method: Method, path: &str, build: F) -> IntakeResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");
        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }
        let request = build(request);

        tracing::debug!(method = %method, url = %url, "API request");

        let response = request.send().await.map_err(|e| IntakeError::NetworkError {
            status: None,
            method: method.to_string(),
            url: url.clone(),
            message: e.to_string(),
            details: None,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| IntakeError::NetworkError {
            status: Some(status.as_u16()),
            method: method.to_string(),
            url: url.clone(),
            message: format!("Failed to read response body: {e}"),
            details: None,
        })?;

        if !status.is_success() {
            let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
            let message = match body.summary() {
                Some(summary) => summary.to_string(),
                None if !text.trim().is_empty() => text.trim().to_string(),
                None => status.canonical_reason().unwrap_or("Error").to_string(),
            };
            tracing::warn!(method = %method, url = %url, status = status.as_u16(), "API request failed: {}", message);
            return Err(IntakeError::NetworkError {
                status: Some(status.as_u16()),
                method: method.to_string(),
                url,
                message,
                details: body.details,
            });
        }

        // Empty bodies decode as JSON null so `()` and `Option<_>` targets work
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| IntakeError::NetworkError {
            status: Some(status.as_u16()),
            method: method.to_string(),
            url,
            message: format!("Invalid response body: {e}"),
            details: None,
        })
    }
}
