//! Response decoding module
//!
//! Decodes search endpoint bodies into typed tweets, and tells apart a
//! refused-for-quota response from a normal page.
//!
//! # Overview
//!
//! - `Tweet` - a decoded status; unknown fields are kept in `extra`
//! - `ParsedPage` - either a page of tweets or a rate-limit refusal
//! - `parse_search_response` - the decoder used by `Transport::parse`

mod decoders;
mod types;

pub use decoders::{parse_search_response, RATE_LIMIT_ERROR_CODE};
pub use types::{ApiError, ParsedPage, SearchPage, Tweet, TweetUser};
