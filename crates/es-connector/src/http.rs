//! HTTP connector for the remote sync API

use crate::envelope::{ImportOptions, RemoteResponse};
use crate::error::{ConnectorError, ConnectorResult};
use crate::traits::Connector;
use async_trait::async_trait;
use es_core::ConnectorConfig;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Longest slice of a raw error body kept in an error message
const MAX_BODY_IN_ERROR: usize = 200;

/// Reqwest-based connector
///
/// Endpoints, relative to the configured base URL:
/// - `POST /sync/{entity}/import` with body `{"mode", "dryRun"}`
/// - `DELETE /sync/{entity}`
pub struct HttpConnector {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpConnector {
    /// Create a connector, reading the bearer token from the configured
    /// environment variable when it is set
    pub fn new(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            log::debug!(
                "{} is not set; sending requests without authorization",
                config.token_env
            );
        }
        Self::with_token(config, token)
    }

    /// Create a connector with an explicit token
    pub fn with_token(config: &ConnectorConfig, token: Option<String>) -> ConnectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("erpsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConnectorError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn import_url(&self, entity: &str) -> String {
        format!("{}/sync/{}/import", self.base_url, entity)
    }

    fn delete_url(&self, entity: &str) -> String {
        format!("{}/sync/{}", self.base_url, entity)
    }

    async fn send(&self, request: RequestBuilder) -> ConnectorResult<RemoteResponse> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        parse_response(status, &body)
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn import_entity(
        &self,
        entity: &str,
        options: ImportOptions,
    ) -> ConnectorResult<RemoteResponse> {
        let url = self.import_url(entity);
        log::debug!("POST {} mode={} dryRun={}", url, options.mode, options.dry_run);
        self.send(self.client.post(url).json(&options)).await
    }

    async fn delete_entity(&self, entity: &str) -> ConnectorResult<RemoteResponse> {
        let url = self.delete_url(entity);
        log::debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await
    }

    fn connector_type(&self) -> &'static str {
        "http"
    }
}

fn transport_error(err: reqwest::Error) -> ConnectorError {
    if err.is_timeout() {
        ConnectorError::Transport("request timed out".to_string())
    } else if err.is_connect() {
        ConnectorError::Transport(format!("connection failed: {}", err))
    } else {
        ConnectorError::Transport(err.to_string())
    }
}

/// Map a status code and body to an envelope or an error
///
/// Non-2xx responses use the envelope message and item detail when the body
/// parses as one, otherwise the (truncated) raw body.
fn parse_response(status: u16, body: &str) -> ConnectorResult<RemoteResponse> {
    if !(200..300).contains(&status) {
        let envelope = serde_json::from_str::<RemoteResponse>(body).ok();
        let detail = envelope
            .as_ref()
            .map(RemoteResponse::detail)
            .unwrap_or_default();
        let message = envelope
            .map(|r| r.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| truncate(body.trim()));
        return Err(ConnectorError::Status {
            status,
            message,
            detail,
        });
    }

    serde_json::from_str(body).map_err(|e| ConnectorError::InvalidResponse(e.to_string()))
}

fn truncate(body: &str) -> String {
    if body.is_empty() {
        return "empty response body".to_string();
    }
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
