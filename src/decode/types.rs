//! Decoded response types

use crate::rate_limit::RateLimitState;
use crate::types::{JsonObject, TweetId};
use serde::{Deserialize, Serialize};

/// Author of a tweet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetUser {
    /// Numeric user id as a string
    #[serde(default)]
    pub id_str: Option<String>,
    /// Handle without the leading `@`
    #[serde(default)]
    pub screen_name: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// A single status returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTweet")]
pub struct Tweet {
    /// Tweet id
    pub id: TweetId,
    /// Tweet text (`full_text` in extended mode)
    pub text: String,
    /// Creation time as sent by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Detected language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<TweetUser>,
    /// Every other field of the status
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Tweet {
    /// Create a tweet with just an id and text
    pub fn new(id: TweetId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            created_at: None,
            lang: None,
            user: None,
            extra: JsonObject::new(),
        }
    }
}

/// Wire shape of a status before the id is resolved
#[derive(Deserialize)]
struct RawTweet {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    id_str: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    user: Option<TweetUser>,
    #[serde(flatten)]
    extra: JsonObject,
}

impl TryFrom<RawTweet> for Tweet {
    type Error = String;

    fn try_from(raw: RawTweet) -> Result<Self, Self::Error> {
        // id_str is exact; the numeric id can lose precision in some JSON producers
        let id = match (raw.id_str.as_deref(), raw.id) {
            (Some(s), _) => s
                .parse::<TweetId>()
                .map_err(|e| format!("invalid id_str '{s}': {e}"))?,
            (None, Some(id)) => id,
            (None, None) => return Err("status without id".to_string()),
        };

        Ok(Self {
            id,
            text: raw.full_text.or(raw.text).unwrap_or_default(),
            created_at: raw.created_at,
            lang: raw.lang,
            user: raw.user,
            extra: raw.extra,
        })
    }
}

/// Body of a successful search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    /// Matching statuses, newest first
    #[serde(default)]
    pub statuses: Vec<Tweet>,
}

/// An entry of the `errors` array in an error body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Platform error code
    pub code: i64,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// Outcome of parsing one search response
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPage {
    /// A normal page (possibly empty)
    Tweets(Vec<Tweet>),
    /// The service refused the call because the quota is used up
    RateLimited(RateLimitState),
}
