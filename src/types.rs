//! Common types used throughout tweet-backfill
//!
//! This module contains shared type definitions, constants,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Platform-assigned tweet identifier (strictly ordered, newer is larger)
pub type TweetId = u64;

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters, kept sorted so the wire form is deterministic
pub type QueryParams = BTreeMap<String, String>;

// ============================================================================
// Constants
// ============================================================================

/// Tweets requested per page (maximum the search endpoint allows)
pub const PAGE_SIZE: usize = 100;

/// Path of the standard search endpoint
pub const SEARCH_PATH: &str = "/1.1/search/tweets.json";

/// Language used when an empty language filter is supplied
pub const DEFAULT_LANGUAGE: &str = "en";

// ============================================================================
// Result Type
// ============================================================================

/// Which flavour of results the search endpoint should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Only the most recent results
    Recent,
    /// Only the most popular results
    Popular,
    /// Both popular and real time results
    #[default]
    Mixed,
}

impl ResultType {
    /// Wire value for the `result_type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Popular => "popular",
            Self::Mixed => "mixed",
        }
    }

    /// Parse a result type, treating anything unrecognised as `mixed`
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "recent" => Self::Recent,
            "popular" => Self::Popular,
            _ => Self::Mixed,
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Stop Reason
// ============================================================================

/// Why a search stopped paging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A page came back with no tweets
    EmptyPage,
    /// The service refused a page because the quota was exhausted
    RateLimited,
    /// A short page arrived with no quota left
    QuotaExhausted,
    /// A page reported a quota window that has not reset yet
    /// (only under `ContinuationPolicy::ResetPending`)
    ResetPending,
}

impl StopReason {
    /// Whether the caller must wait for the quota window to reset before resuming
    pub fn is_quota_stop(&self) -> bool {
        matches!(self, Self::RateLimited | Self::QuotaExhausted)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EmptyPage => "empty_page",
            Self::RateLimited => "rate_limited",
            Self::QuotaExhausted => "quota_exhausted",
            Self::ResetPending => "reset_pending",
        };
        f.write_str(s)
    }
}
