//! HTTP transport over reqwest
//!
//! Sends each request exactly once. Quota refusals (429) are handed back as
//! responses so the decoder can classify them; every other non-2xx status
//! becomes `Error::HttpStatus`.

use super::types::{RawResponse, Transport};
use crate::error::{Error, Result};
use crate::query::RequestDescription;
use crate::rate_limit::{RequestThrottle, ThrottleConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL the endpoint path is resolved against. The endpoint path is
    /// absolute, so any path on the base URL is replaced rather than kept.
    pub base_url: String,
    /// OAuth 2.0 bearer token
    pub bearer_token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Client-side pacing
    pub throttle: Option<ThrottleConfig>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("tweet-backfill/{}", env!("CARGO_PKG_VERSION")),
            throttle: None,
        }
    }
}

impl HttpTransportConfig {
    /// Create a new config builder
    pub fn builder() -> HttpTransportConfigBuilder {
        HttpTransportConfigBuilder::default()
    }
}

/// Builder for HTTP transport config
#[derive(Default)]
pub struct HttpTransportConfigBuilder {
    config: HttpTransportConfig,
}

impl HttpTransportConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.bearer_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Pace requests
    pub fn throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.config.throttle = Some(throttle);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpTransportConfig {
        self.config
    }
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
    throttle: Option<RequestThrottle>,
}

impl HttpTransport {
    /// Create a transport from a config
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let throttle = config.throttle.map(RequestThrottle::new);

        Ok(Self {
            client,
            config,
            throttle,
        })
    }

    /// Transport configuration
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Check if client-side pacing is enabled
    pub fn has_throttle(&self) -> bool {
        self.throttle.is_some()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescription) -> Result<RawResponse> {
        let url = request.url(&self.config.base_url)?;

        if let Some(ref throttle) = self.throttle {
            if !throttle.try_acquire() {
                debug!("Throttled, waiting for a permit before {}", url);
                throttle.wait().await;
            }
        }

        let mut req = self.client.request(request.method.clone(), url.clone());
        if let Some(ref token) = self.config.bearer_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if status.is_success() || status == StatusCode::TOO_MANY_REQUESTS {
            debug!("{} {} -> {}", request.method, url.path(), status.as_u16());
            return Ok(RawResponse::new(status.as_u16(), headers, body));
        }

        warn!(
            "Search request failed with {} for {}",
            status.as_u16(),
            url.path()
        );
        Err(Error::http_status(status.as_u16(), body))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.config.base_url)
            .field("has_bearer_token", &self.config.bearer_token.is_some())
            .field("has_throttle", &self.has_throttle())
            .finish_non_exhaustive()
    }
}
