//! Transport types and traits

use crate::decode::{parse_search_response, ParsedPage};
use crate::error::Result;
use crate::query::RequestDescription;
use crate::rate_limit::RateLimitState;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// A response as received, before any decoding
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: String,
}

impl RawResponse {
    /// Create a raw response
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Whether the service sent a complete set of quota headers
    pub fn has_rate_limit_headers(&self) -> bool {
        self.rate_limit().is_some()
    }

    /// Quota reported by this response
    pub fn rate_limit(&self) -> Option<RateLimitState> {
        RateLimitState::from_headers(&self.headers)
    }
}

/// Executes search requests against the remote service
///
/// `execute` failures are terminal for a search. `parse` separates quota
/// refusals from normal pages and should only fail on undecodable bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the exchange for a built request
    async fn execute(&self, request: &RequestDescription) -> Result<RawResponse>;

    /// Decode a response into a page of tweets or a rate-limit refusal
    fn parse(&self, response: &RawResponse) -> Result<ParsedPage> {
        parse_search_response(response, Utc::now())
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: &RequestDescription) -> Result<RawResponse> {
        (**self).execute(request).await
    }

    fn parse(&self, response: &RawResponse) -> Result<ParsedPage> {
        (**self).parse(response)
    }
}
