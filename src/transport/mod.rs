//! Transport module
//!
//! The seam between the pagination driver and the network.
//!
//! # Overview
//!
//! - `Transport` - execute a built request, parse its response
//! - `RawResponse` - status, headers and body of one exchange
//! - `HttpTransport` - reqwest implementation with bearer auth and optional pacing

mod http;
mod types;

pub use http::{HttpTransport, HttpTransportConfig, HttpTransportConfigBuilder, DEFAULT_BASE_URL};
pub use types::{RawResponse, Transport};
