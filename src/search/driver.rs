//! Pagination driver

use super::types::{
    decide, Aggregation, Continuation, ContinuationPolicy, Cursor, SearchConfig, SearchResult,
};
use crate::decode::ParsedPage;
use crate::error::Result;
use crate::query::QueryBuilder;
use crate::transport::Transport;
use crate::types::{ResultType, StopReason, TweetId};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

/// A client able to backfill a search query
#[async_trait]
pub trait TweetSearch: Send + Sync {
    /// Fetch every tweet matching `query` until a stop condition is reached
    async fn search(&self, query: &str) -> Result<SearchResult>;
}

/// Search client bound to a transport and a fixed configuration
///
/// Holds no per-search state; each call to `search` owns its own cursor,
/// so one client can serve concurrent searches if the transport can.
#[derive(Debug)]
pub struct SearchClient<T> {
    transport: T,
    builder: QueryBuilder,
    config: SearchConfig,
}

impl<T: Transport> SearchClient<T> {
    /// Create a client with an explicit config
    pub fn new(transport: T, config: SearchConfig) -> Self {
        Self {
            transport,
            builder: QueryBuilder::new(),
            config,
        }
    }

    /// Start configuring a client
    pub fn builder(transport: T) -> SearchClientBuilder<T> {
        SearchClientBuilder::new(transport)
    }

    /// The client's configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every tweet matching `query` between the configured bounds
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let mut params = self.config.first_page(query)?;
        let mut cursor = Cursor::new();
        let mut aggregation = Aggregation::new();
        let mut page: u32 = 0;

        info!("Starting search for {:?}", params.query);

        loop {
            page += 1;
            let request = self.builder.build(&params)?;
            let response = self.transport.execute(&request).await?;

            let rate_limit = response.rate_limit();
            if let Some(state) = rate_limit {
                aggregation.observe_rate_limit(state);
            }

            let tweets = match self.transport.parse(&response)? {
                ParsedPage::Tweets(tweets) => tweets,
                ParsedPage::RateLimited(state) => {
                    warn!(
                        "Page {}: rate limited, resets at {} ({} tweets kept)",
                        page,
                        state.reset,
                        aggregation.len()
                    );
                    aggregation.observe_rate_limit(state);
                    return Ok(aggregation.finish(StopReason::RateLimited));
                }
            };

            match &rate_limit {
                Some(state) => debug!(
                    "Page {}: {} tweets, rate limit {}/{} resets at {}",
                    page,
                    tweets.len(),
                    state.remaining,
                    state.limit,
                    state.reset
                ),
                None => debug!("Page {}: {} tweets, no rate limit headers", page, tweets.len()),
            }

            if tweets.is_empty() {
                debug!("Page {}: empty, stopping", page);
                return Ok(aggregation.finish(StopReason::EmptyPage));
            }

            let page_len = tweets.len();
            cursor.observe(&tweets);
            aggregation.append_page(tweets);

            match decide(self.config.policy, page_len, rate_limit.as_ref(), Utc::now()) {
                Continuation::Stop(reason) => {
                    debug!("Page {}: stopping ({})", page, reason);
                    return Ok(aggregation.finish(reason));
                }
                Continuation::Continue => {
                    params = params.with_max_id(cursor.next_max_id()?);
                }
            }
        }
    }
}

#[async_trait]
impl<T: Transport> TweetSearch for SearchClient<T> {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        SearchClient::search(self, query).await
    }
}

/// Builder yielding a configured `SearchClient`
#[derive(Debug)]
pub struct SearchClientBuilder<T> {
    transport: T,
    builder: QueryBuilder,
    config: SearchConfig,
}

impl<T: Transport> SearchClientBuilder<T> {
    /// Create a builder around a transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            builder: QueryBuilder::new(),
            config: SearchConfig::default(),
        }
    }

    /// Replace the whole config
    #[must_use]
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Only return tweets newer than `since_id` (0 clears the bound)
    #[must_use]
    pub fn since_id(mut self, since_id: TweetId) -> Self {
        self.config = self.config.with_since_id(since_id);
        self
    }

    /// Start below an earlier search's boundary (0 starts from the newest tweet)
    #[must_use]
    pub fn max_id(mut self, max_id: TweetId) -> Self {
        self.config = self.config.with_max_id(max_id);
        self
    }

    /// Filter by language; an empty language means English
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config = self.config.with_language(language);
        self
    }

    /// Filter by result type
    #[must_use]
    pub fn result_type(mut self, result_type: ResultType) -> Self {
        self.config = self.config.with_result_type(result_type);
        self
    }

    /// Filter by result type name; unknown names mean `mixed`
    #[must_use]
    pub fn result_type_str(self, result_type: &str) -> Self {
        self.result_type(ResultType::from_str_lossy(result_type))
    }

    /// Choose when a non-empty page ends the search
    #[must_use]
    pub fn continuation_policy(mut self, policy: ContinuationPolicy) -> Self {
        self.config = self.config.with_policy(policy);
        self
    }

    /// Search a different endpoint path
    #[must_use]
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.builder = QueryBuilder::with_path(path);
        self
    }

    /// Build the client
    pub fn build(self) -> SearchClient<T> {
        SearchClient {
            transport: self.transport,
            builder: self.builder,
            config: self.config,
        }
    }
}
