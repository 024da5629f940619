//! Search module
//!
//! Backfills every tweet matching a query, newest to oldest, one page at a time.
//!
//! # Overview
//!
//! Each page is requested with `max_id` set just below the lowest id seen so
//! far, so page windows never overlap. Paging stops when:
//!
//! - a page comes back empty
//! - the service refuses a page for quota (`StopReason::RateLimited`)
//! - a short page arrives with no quota left (`StopReason::QuotaExhausted`)
//!
//! Transport, decode and boundary errors abort the search and discard the
//! pages gathered so far. Quota stops keep them.

mod driver;
mod types;

pub use driver::{SearchClient, SearchClientBuilder, TweetSearch};
pub use types::{
    decide, Aggregation, Continuation, ContinuationPolicy, Cursor, SearchConfig, SearchResult,
};

#[cfg(test)]
mod tests;
