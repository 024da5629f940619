//! Configuration profile for the command-line tool
//!
//! A profile is read from an optional YAML file, then overridden by
//! environment variables, then by command-line flags.
//!
//! ```yaml
//! bearer_token: AAAA...
//! throttle: app
//! timeout_secs: 30
//! language: en
//! result_type: recent
//! since_id: 1453000000000000000
//! max_id: 1454999999999999999
//! policy: quota_exhausted
//! ```

use crate::error::{Error, Result};
use crate::rate_limit::ThrottleConfig;
use crate::search::{ContinuationPolicy, SearchConfig};
use crate::transport::{HttpTransportConfig, DEFAULT_BASE_URL};
use crate::types::{ResultType, TweetId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Environment variable holding the bearer token
pub const ENV_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "TWITTER_API_BASE_URL";

/// Client-side pacing preset
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleMode {
    /// Application-only auth window (450 / 15 min)
    #[default]
    App,
    /// User-context auth window (180 / 15 min)
    User,
    /// No pacing
    None,
}

impl ThrottleMode {
    /// Throttle config for this preset
    pub fn config(&self) -> Option<ThrottleConfig> {
        match self {
            Self::App => Some(ThrottleConfig::app_auth()),
            Self::User => Some(ThrottleConfig::user_auth()),
            Self::None => None,
        }
    }
}

/// Resolved settings for one run of the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// API base URL
    pub base_url: String,
    /// OAuth 2.0 bearer token
    pub bearer_token: Option<String>,
    /// Client-side pacing preset
    pub throttle: ThrottleMode,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Exclusive lower bound
    pub since_id: Option<TweetId>,
    /// Inclusive starting upper bound
    pub max_id: Option<TweetId>,
    /// Language filter
    pub language: Option<String>,
    /// Result type filter
    pub result_type: Option<ResultType>,
    /// Continuation policy
    pub policy: ContinuationPolicy,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            throttle: ThrottleMode::default(),
            timeout_secs: 30,
            since_id: None,
            max_id: None,
            language: None,
            result_type: None,
            policy: ContinuationPolicy::default(),
        }
    }
}

impl Profile {
    /// Parse a profile from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a profile file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading profile from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load the profile file (if any) and apply the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let profile = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(profile.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through a lookup function
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_BEARER_TOKEN).filter(|t| !t.is_empty()) {
            info!("Using bearer token from {}", ENV_BEARER_TOKEN);
            self.bearer_token = Some(token);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            info!("Using base URL from {}: {}", ENV_BASE_URL, url);
            self.base_url = url;
        }
        self
    }

    /// Transport settings; a bearer token is required
    pub fn transport_config(&self) -> Result<HttpTransportConfig> {
        let token = self
            .bearer_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing_field("bearer_token"))?;
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        let base = Url::parse(&self.base_url)?;
        if base.path() != "/" {
            return Err(Error::config(format!(
                "base_url must not carry a path: {}",
                self.base_url
            )));
        }

        let mut builder = HttpTransportConfig::builder()
            .base_url(&self.base_url)
            .bearer_token(token)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(throttle) = self.throttle.config() {
            builder = builder.throttle(throttle);
        }
        Ok(builder.build())
    }

    /// Search settings
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::new().with_policy(self.policy);
        if let Some(since_id) = self.since_id {
            config = config.with_since_id(since_id);
        }
        if let Some(max_id) = self.max_id {
            config = config.with_max_id(max_id);
        }
        if let Some(language) = &self.language {
            config = config.with_language(language.as_str());
        }
        if let Some(result_type) = self.result_type {
            config = config.with_result_type(result_type);
        }
        config
    }

    /// Copy of the profile safe to print
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            bearer_token: self.bearer_token.as_deref().map(mask_secret),
            ..self.clone()
        }
    }
}

/// Keep the first and last four characters of a secret
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
