//! Query builder module
//!
//! Turns search parameters into a request description for the transport.
//!
//! # Overview
//!
//! - `SearchRequestParams` - one page's worth of search parameters
//! - `RequestDescription` - method, path and encoded query string
//! - `QueryBuilder` - pure transformation from the former to the latter

mod builder;
mod types;

pub use builder::QueryBuilder;
pub use types::{RequestDescription, SearchRequestParams};
