//! Query types
//!
//! Parameter and request description types shared by the builder and the transport.

use crate::error::{Error, Result};
use crate::types::{QueryParams, ResultType, TweetId, PAGE_SIZE};
use reqwest::Method;
use url::Url;

/// Parameters for a single page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequestParams {
    /// Free-text query (`q`)
    pub query: String,
    /// Page size (`count`)
    pub count: usize,
    /// Language filter (`lang`)
    pub language: Option<String>,
    /// Result type filter (`result_type`)
    pub result_type: Option<ResultType>,
    /// Exclusive lower bound (`since_id`), fixed for a whole search
    pub since_id: Option<TweetId>,
    /// Inclusive upper bound (`max_id`), moves down each page
    pub max_id: Option<TweetId>,
}

impl SearchRequestParams {
    /// Create parameters for the first page of a search
    ///
    /// Fails with `Error::EmptyQuery` for an empty or whitespace-only query.
    pub fn new(query: impl Into<String>) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        Ok(Self {
            query,
            count: PAGE_SIZE,
            language: None,
            result_type: None,
            since_id: None,
            max_id: None,
        })
    }

    /// Set the language filter
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Set the result type filter
    #[must_use]
    pub fn with_result_type(mut self, result_type: Option<ResultType>) -> Self {
        self.result_type = result_type;
        self
    }

    /// Set the lower bound
    #[must_use]
    pub fn with_since_id(mut self, since_id: Option<TweetId>) -> Self {
        self.since_id = since_id;
        self
    }

    /// Derive the parameters for a following page
    #[must_use]
    pub fn with_max_id(mut self, max_id: TweetId) -> Self {
        self.max_id = Some(max_id);
        self
    }

    /// Flatten into wire parameters
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("count".to_string(), self.count.to_string());
        params.insert("q".to_string(), self.query.clone());
        if let Some(lang) = &self.language {
            params.insert("lang".to_string(), lang.clone());
        }
        if let Some(result_type) = self.result_type {
            params.insert("result_type".to_string(), result_type.as_str().to_string());
        }
        if let Some(since_id) = self.since_id {
            params.insert("since_id".to_string(), since_id.to_string());
        }
        if let Some(max_id) = self.max_id {
            params.insert("max_id".to_string(), max_id.to_string());
        }
        params
    }
}

/// A fully built request, ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescription {
    /// HTTP method
    pub method: Method,
    /// Endpoint path, starting with `/`
    pub path: String,
    /// Encoded query string without the leading `?`
    pub query: String,
}

impl RequestDescription {
    /// Path followed by the query string
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Resolve against a base URL
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let base = Url::parse(base_url)?;
        base.join(&self.path_and_query())
            .map_err(|e| Error::query_encoding(format!("{}: {e}", self.path_and_query())))
    }

    /// Look up a decoded query parameter
    pub fn query_param(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}
