//! Query builder implementation

use super::types::{RequestDescription, SearchRequestParams};
use crate::error::{Error, Result};
use crate::types::SEARCH_PATH;
use reqwest::Method;
use tracing::trace;

/// Builds request descriptions for the search endpoint
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    path: String,
}

impl QueryBuilder {
    /// Create a builder for the standard search endpoint
    pub fn new() -> Self {
        Self::with_path(SEARCH_PATH)
    }

    /// Create a builder for a custom endpoint path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Build the request for one page
    ///
    /// Parameters are emitted in key order. Only the encoding step can fail.
    pub fn build(&self, params: &SearchRequestParams) -> Result<RequestDescription> {
        if params.query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        if !self.path.starts_with('/') {
            return Err(Error::query_encoding(format!(
                "endpoint path must be absolute: {}",
                self.path
            )));
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.to_query_params())
            .finish();

        trace!("Built search request: {}?{}", self.path, query);

        Ok(RequestDescription {
            method: Method::GET,
            path: self.path.clone(),
            query,
        })
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
