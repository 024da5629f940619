//! Client-side request pacing
//!
//! Uses the governor crate so a long backfill spreads its calls over the
//! service's quota window instead of burning the whole window up front.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Length of the search endpoint's quota window
const QUOTA_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Configuration for request pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Requests allowed per window
    pub requests: u32,
    /// Window length
    pub window: Duration,
}

impl ThrottleConfig {
    /// Create a new throttle config
    pub fn new(requests: u32, window: Duration) -> Self {
        Self { requests, window }
    }

    /// Application-only auth: 450 requests per 15 minutes
    pub fn app_auth() -> Self {
        Self::new(450, QUOTA_WINDOW)
    }

    /// User-context auth: 180 requests per 15 minutes
    pub fn user_auth() -> Self {
        Self::new(180, QUOTA_WINDOW)
    }

    /// Interval between replenished permits
    pub fn period(&self) -> Duration {
        let requests = self.requests.max(1);
        self.window / requests
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self::app_auth()
    }
}

/// Token bucket pacing requests to the search endpoint
#[derive(Clone)]
pub struct RequestThrottle {
    config: ThrottleConfig,
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RequestThrottle {
    /// Create a throttle from a config
    pub fn new(config: ThrottleConfig) -> Self {
        let burst = NonZeroU32::new(config.requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.period())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            config,
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// The config this throttle was built from
    pub fn config(&self) -> ThrottleConfig {
        self.config
    }

    /// Wait until a request may be sent
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a permit if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
