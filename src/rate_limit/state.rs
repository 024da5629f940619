//! Quota state reported by the search endpoint

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the quota ceiling for the current window
pub const HEADER_LIMIT: &str = "x-rate-limit-limit";
/// Header carrying the calls left in the current window
pub const HEADER_REMAINING: &str = "x-rate-limit-remaining";
/// Header carrying the window reset time in epoch seconds
pub const HEADER_RESET: &str = "x-rate-limit-reset";

/// Quota snapshot for the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitState {
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset: DateTime<Utc>,
}

impl RateLimitState {
    /// Create a new rate limit state
    pub fn new(limit: u32, remaining: u32, reset: DateTime<Utc>) -> Self {
        Self {
            limit,
            remaining,
            reset,
        }
    }

    /// Read the quota headers of a response
    ///
    /// Returns `None` unless all three headers are present and numeric.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_number(headers, HEADER_LIMIT)?;
        let remaining = header_number(headers, HEADER_REMAINING)?;
        let reset_secs = header_number::<i64>(headers, HEADER_RESET)?;
        let reset = Utc.timestamp_opt(reset_secs, 0).single()?;
        Some(Self::new(limit, remaining, reset))
    }

    /// Placeholder used when the service refuses a call without quota headers
    pub fn exhausted_at(now: DateTime<Utc>) -> Self {
        Self::new(0, 0, now)
    }

    /// No calls left in this window
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// The window has not reset yet at `now`
    pub fn reset_pending(&self, now: DateTime<Utc>) -> bool {
        self.reset > now
    }

    /// Time left until the window resets, zero if already past
    pub fn wait_time(&self, now: DateTime<Utc>) -> Duration {
        (self.reset - now).to_std().unwrap_or(Duration::ZERO)
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
