//! Search response decoder

use super::types::{ErrorBody, ParsedPage, SearchPage};
use crate::error::{Error, Result};
use crate::rate_limit::RateLimitState;
use crate::transport::RawResponse;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Error code the platform uses for "Rate limit exceeded"
pub const RATE_LIMIT_ERROR_CODE: i64 = 88;

/// Parse a raw search response
///
/// A 429 status or an error body carrying code 88 becomes
/// `ParsedPage::RateLimited`. The quota headers are used when present;
/// otherwise the state reports an exhausted window resetting at `now`.
pub fn parse_search_response(raw: &RawResponse, now: DateTime<Utc>) -> Result<ParsedPage> {
    let errors = serde_json::from_str::<ErrorBody>(&raw.body)
        .map(|b| b.errors)
        .unwrap_or_default();

    let refused = raw.status == 429 || errors.iter().any(|e| e.code == RATE_LIMIT_ERROR_CODE);
    if refused {
        let state = raw
            .rate_limit()
            .unwrap_or_else(|| RateLimitState::exhausted_at(now));
        debug!(
            "Search refused for quota, resets at {} ({} of {} left)",
            state.reset, state.remaining, state.limit
        );
        return Ok(ParsedPage::RateLimited(state));
    }

    if !(200..300).contains(&raw.status) {
        return Err(Error::http_status(raw.status, raw.body.clone()));
    }

    if let Some(first) = errors.first() {
        return Err(Error::decode(format!(
            "API error {}: {}",
            first.code, first.message
        )));
    }

    let page: SearchPage = serde_json::from_str(&raw.body)
        .map_err(|e| Error::decode(format!("invalid search body: {e}")))?;
    Ok(ParsedPage::Tweets(page.statuses))
}
