// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tweet-backfill
//!
//! Retrieves every tweet matching a search query, older than an optional
//! starting point, by walking the search endpoint page by page.
//!
//! ## Features
//!
//! - **Non-overlapping pages**: each page asks for `max_id` just below the
//!   lowest id seen so far, so nothing is fetched twice
//! - **Quota aware**: a rate-limit refusal ends the search normally and keeps
//!   what was gathered, together with the reset time
//! - **Pluggable transport**: the driver only needs `Transport::execute`
//!   and `Transport::parse`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tweet_backfill::{HttpTransport, HttpTransportConfig, ResultType, SearchClient};
//!
//! #[tokio::main]
//! async fn main() -> tweet_backfill::Result<()> {
//!     let transport = HttpTransport::new(
//!         HttpTransportConfig::builder().bearer_token("AAAA...").build(),
//!     )?;
//!     let client = SearchClient::builder(transport)
//!         .language("en")
//!         .result_type(ResultType::Recent)
//!         .build();
//!
//!     let result = client.search("#rustlang").await?;
//!     println!("{} tweets, stopped on {}", result.len(), result.stop_reason);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              SearchClient::search(query)                 │
//! │   Cursor (running min id) · Aggregation · decide()       │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//! ┌──────────────┬────────────┴───────────┬─────────────────┐
//! │    Query     │       Transport        │   Rate Limit    │
//! ├──────────────┼────────────────────────┼─────────────────┤
//! │ Params       │ execute (reqwest)      │ Quota headers   │
//! │ QueryBuilder │ parse → ParsedPage     │ Throttle        │
//! └──────────────┴────────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and constants
pub mod types;

/// Request parameter building
pub mod query;

/// Quota state and client-side pacing
pub mod rate_limit;

/// Response decoding
pub mod decode;

/// Transport seam and HTTP implementation
pub mod transport;

/// Pagination driver
pub mod search;

/// CLI profile configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use decode::{ParsedPage, Tweet};
pub use query::{QueryBuilder, RequestDescription, SearchRequestParams};
pub use rate_limit::RateLimitState;
pub use search::{ContinuationPolicy, SearchClient, SearchConfig, SearchResult, TweetSearch};
pub use transport::{HttpTransport, HttpTransportConfig, RawResponse, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
