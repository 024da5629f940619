//! Rate limit module
//!
//! Two unrelated halves of quota handling live here:
//!
//! - `RateLimitState` - the quota reported by the service (`x-rate-limit-*` headers)
//! - `RequestThrottle` - optional client-side pacing using governor

mod state;
mod throttle;

pub use state::{RateLimitState, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET};
pub use throttle::{RequestThrottle, ThrottleConfig};
