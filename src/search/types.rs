//! Search types
//!
//! Configuration, cursor bookkeeping, continuation policy and the
//! accumulated result.

use crate::decode::Tweet;
use crate::error::{Error, Result};
use crate::query::SearchRequestParams;
use crate::rate_limit::RateLimitState;
use crate::types::{ResultType, StopReason, TweetId, DEFAULT_LANGUAGE, PAGE_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Configuration
// ============================================================================

/// When a non-empty page ends the search
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationPolicy {
    /// Stop on a short page that reports no quota left
    #[default]
    #[value(name = "quota", alias = "quota-exhausted")]
    #[serde(alias = "quota")]
    QuotaExhausted,
    /// Stop as soon as a page reports a quota window that has not reset yet,
    /// whatever the remaining count. Ends most searches after one page.
    #[value(name = "reset", alias = "reset-pending")]
    #[serde(alias = "reset")]
    ResetPending,
}

/// Immutable settings applied to every page of a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Exclusive lower bound for the whole search
    pub since_id: Option<TweetId>,
    /// Inclusive upper bound for the first page
    pub max_id: Option<TweetId>,
    /// Language filter
    pub language: Option<String>,
    /// Result type filter
    pub result_type: Option<ResultType>,
    /// Continuation policy
    pub policy: ContinuationPolicy,
}

impl SearchConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound; 0 means unbounded
    #[must_use]
    pub fn with_since_id(mut self, since_id: TweetId) -> Self {
        self.since_id = (since_id > 0).then_some(since_id);
        self
    }

    /// Set the starting upper bound; 0 starts from the newest tweet
    #[must_use]
    pub fn with_max_id(mut self, max_id: TweetId) -> Self {
        self.max_id = (max_id > 0).then_some(max_id);
        self
    }

    /// Set the language filter; an empty language means English
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = Some(if language.is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language
        });
        self
    }

    /// Set the result type filter
    #[must_use]
    pub fn with_result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = Some(result_type);
        self
    }

    /// Set the continuation policy
    #[must_use]
    pub fn with_policy(mut self, policy: ContinuationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parameters for the first page of `query`
    pub fn first_page(&self, query: &str) -> Result<SearchRequestParams> {
        let params = SearchRequestParams::new(query)?
            .with_language(self.language.clone())
            .with_result_type(self.result_type)
            .with_since_id(self.since_id);
        Ok(match self.max_id {
            Some(max_id) => params.with_max_id(max_id),
            None => params,
        })
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Running minimum tweet id across all pages of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    min_id: TweetId,
}

impl Cursor {
    /// Start with no minimum (`u64::MAX` sentinel)
    pub fn new() -> Self {
        Self {
            min_id: TweetId::MAX,
        }
    }

    /// Fold a page's ids into the running minimum
    pub fn observe(&mut self, tweets: &[Tweet]) {
        if let Some(min) = tweets.iter().map(|t| t.id).min() {
            self.min_id = self.min_id.min(min);
        }
    }

    /// Lowest id seen so far, `None` before the first tweet
    pub fn min_id(&self) -> Option<TweetId> {
        (self.min_id != TweetId::MAX).then_some(self.min_id)
    }

    /// `max_id` for the next page: running minimum minus one
    pub fn next_max_id(&self) -> Result<TweetId> {
        self.min_id
            .checked_sub(1)
            .ok_or(Error::BoundaryUnderflow {
                min_id: self.min_id,
            })
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Continuation Policy
// ============================================================================

/// Outcome of inspecting a non-empty page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Request another page
    Continue,
    /// End the search
    Stop(StopReason),
}

impl Continuation {
    /// Check if paging should go on
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Decide whether to fetch another page after a non-empty page
///
/// Without quota headers there is nothing to go on, so paging continues and
/// the next (empty) page ends the search.
pub fn decide(
    policy: ContinuationPolicy,
    page_len: usize,
    rate_limit: Option<&RateLimitState>,
    now: DateTime<Utc>,
) -> Continuation {
    let Some(state) = rate_limit else {
        return Continuation::Continue;
    };

    match policy {
        ContinuationPolicy::QuotaExhausted => {
            if state.is_exhausted() && page_len < PAGE_SIZE {
                Continuation::Stop(StopReason::QuotaExhausted)
            } else {
                Continuation::Continue
            }
        }
        ContinuationPolicy::ResetPending => {
            if state.reset_pending(now) {
                Continuation::Stop(StopReason::ResetPending)
            } else {
                Continuation::Continue
            }
        }
    }
}

// ============================================================================
// Result Aggregation
// ============================================================================

/// Pages gathered so far by a running search
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    tweets: Vec<Tweet>,
    rate_limit: Option<RateLimitState>,
    pages: u32,
}

impl Aggregation {
    /// Create an empty aggregation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page in arrival order
    pub fn append_page(&mut self, tweets: Vec<Tweet>) {
        self.pages += 1;
        self.tweets.extend(tweets);
    }

    /// Remember the latest quota state; later observations replace earlier ones
    pub fn observe_rate_limit(&mut self, state: RateLimitState) {
        self.rate_limit = Some(state);
    }

    /// Tweets gathered so far
    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    /// Check if nothing has been gathered
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    /// Close the aggregation
    pub fn finish(self, stop_reason: StopReason) -> SearchResult {
        SearchResult {
            tweets: self.tweets,
            rate_limit: self.rate_limit,
            pages: self.pages,
            stop_reason,
        }
    }
}

/// Everything a search gathered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Tweets in arrival order (newest to oldest)
    pub tweets: Vec<Tweet>,
    /// Last quota state observed
    pub rate_limit: Option<RateLimitState>,
    /// Non-empty pages received
    pub pages: u32,
    /// Why paging ended
    pub stop_reason: StopReason,
}

impl SearchResult {
    /// Number of tweets
    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    /// Check if no tweets were found
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    /// Tweet ids in result order
    pub fn ids(&self) -> Vec<TweetId> {
        self.tweets.iter().map(|t| t.id).collect()
    }

    /// Lowest tweet id gathered
    pub fn min_id(&self) -> Option<TweetId> {
        self.tweets.iter().map(|t| t.id).min()
    }

    /// How long to wait before resuming, if the search stopped on quota
    pub fn resume_after(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.stop_reason.is_quota_stop() {
            return None;
        }
        self.rate_limit.map(|state| state.wait_time(now))
    }
}
