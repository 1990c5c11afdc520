//! HTTP messaging gateway for the property-management system.
//!
//! Authenticates with an OAuth client-credentials token. The token lives in
//! a [`TokenCache`] with its TTL; a 401 invalidates it and the send is
//! retried once with a fresh token.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{GatewayError, MessagingGateway, OutboundMessage, SentMessage, TokenCache};

const TOKEN_CACHE_KEY: &str = "gateway:access-token";

/// Safety margin subtracted from the advertised token lifetime.
const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub client_id: String,
    client_secret: Secret<String>,
    pub timeout: Duration,
    /// Used when the token response carries no `expires_in`.
    pub default_token_ttl: Duration,
}

impl HttpGatewayConfig {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            timeout: Duration::from_secs(30),
            default_token_ttl: Duration::from_secs(3600),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_token_ttl(mut self, ttl: Duration) -> Self {
        self.default_token_ttl = ttl;
        self
    }
}

pub struct HttpMessagingGateway {
    config: HttpGatewayConfig,
    client: Client,
    tokens: Arc<dyn TokenCache>,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    scope: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    result: SendResult,
}

#[derive(Debug, Deserialize)]
struct SendResult {
    id: serde_json::Value,
}

impl HttpMessagingGateway {
    pub fn new(config: HttpGatewayConfig, tokens: Arc<dyn TokenCache>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn send_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            GatewayError::network(err.to_string())
        }
    }

    async fn access_token(&self) -> Result<String, GatewayError> {
        match self.tokens.get(TOKEN_CACHE_KEY).await {
            Ok(Some(token)) => return Ok(token),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "token cache read failed, fetching new token"),
        }

        let response = self
            .client
            .post(self.url("accessTokens"))
            .form(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.config.client_id,
                client_secret: self.config.client_secret.expose_secret(),
                scope: "general",
            })
            .send()
            .await
            .map_err(|e| GatewayError::TokenRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::TokenRequest(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("token response: {}", e)))?;

        let ttl = token_ttl(token.expires_in, self.config.default_token_ttl);
        if let Err(err) = self.tokens.set(TOKEN_CACHE_KEY, &token.access_token, ttl).await {
            tracing::warn!(error = %err, "failed to cache gateway token");
        }
        Ok(token.access_token)
    }

    async fn attempt(&self, message: &OutboundMessage, token: &str) -> Result<SentMessage, GatewayError> {
        let response = self
            .client
            .post(self.url(&format!("reservations/{}/conversations", message.reservation_id)))
            .bearer_auth(token)
            .json(&SendRequest {
                body: &message.text,
                conversation_id: message.conversation_id.as_deref(),
            })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::rejected(status.as_u16(), body));
        }

        let parsed: SendResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;
        Ok(SentMessage {
            id: message_id(&parsed.result.id),
        })
    }
}

/// Token lifetime with the safety margin applied.
fn token_ttl(expires_in: Option<u64>, default: Duration) -> Duration {
    match expires_in {
        Some(secs) => Duration::from_secs(secs.saturating_sub(EXPIRY_MARGIN_SECS).max(1)),
        None => default,
    }
}

/// Upstream ids arrive as numbers or strings.
fn message_id(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl MessagingGateway for HttpMessagingGateway {
    async fn send_message_to_guest(
        &self,
        message: &OutboundMessage,
    ) -> Result<SentMessage, GatewayError> {
        let token = self.access_token().await?;
        match self.attempt(message, &token).await {
            Err(GatewayError::Unauthorized) => {
                tracing::debug!("gateway token rejected, refreshing");
                if let Err(err) = self.tokens.invalidate(TOKEN_CACHE_KEY).await {
                    tracing::warn!(error = %err, "failed to invalidate gateway token");
                }
                let token = self.access_token().await?;
                self.attempt(message, &token).await
            }
            other => other,
        }
    }
}
