//! Tests for the search module

use super::*;
use crate::decode::Tweet;
use crate::error::{Error, Result};
use crate::query::RequestDescription;
use crate::rate_limit::{RateLimitState, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET};
use crate::transport::{RawResponse, Transport};
use crate::types::{ResultType, StopReason, PAGE_SIZE};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Reset time far enough ahead to always be pending
const FUTURE_RESET: i64 = 4_102_444_800;

// ============================================================================
// Scripted Transport
// ============================================================================

enum Step {
    Respond(RawResponse),
    Fail(u16, &'static str),
}

struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<RequestDescription>>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn param(&self, key: &str) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query_param(key))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &RequestDescription) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(status, body)) => Err(Error::http_status(status, body)),
            None => panic!("unexpected request: {}", request.path_and_query()),
        }
    }
}

fn quota_headers(remaining: u32, reset: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(HEADER_LIMIT, HeaderValue::from_static("450"));
    headers.insert(
        HEADER_REMAINING,
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
    headers.insert(
        HEADER_RESET,
        HeaderValue::from_str(&reset.to_string()).unwrap(),
    );
    headers
}

fn body(ids: &[u64]) -> String {
    let statuses: Vec<_> = ids
        .iter()
        .map(|id| json!({"id_str": id.to_string(), "text": format!("tweet {id}")}))
        .collect();
    json!({ "statuses": statuses }).to_string()
}

/// A page with quota headers reporting `remaining` calls left
fn page(ids: &[u64], remaining: u32) -> Step {
    Step::Respond(RawResponse::new(
        200,
        quota_headers(remaining, FUTURE_RESET),
        body(ids),
    ))
}

/// A page without quota headers
fn bare_page(ids: &[u64]) -> Step {
    Step::Respond(RawResponse::new(200, HeaderMap::new(), body(ids)))
}

fn refusal(reset: i64) -> RawResponse {
    RawResponse::new(
        429,
        quota_headers(0, reset),
        json!({"errors": [{"code": 88, "message": "Rate limit exceeded"}]}).to_string(),
    )
}

fn rate_limited(reset: i64) -> Step {
    Step::Respond(refusal(reset))
}

// ============================================================================
// Corpus Transport
// ============================================================================

/// Serves a fixed set of tweets, honouring `max_id` and `since_id` like the
/// service does, and refuses the call numbered `refuse_at` (1-based).
struct CorpusTransport {
    ids: Vec<u64>,
    per_page: usize,
    refuse_at: Option<usize>,
    requests: Mutex<Vec<RequestDescription>>,
}

impl CorpusTransport {
    fn new(mut ids: Vec<u64>, per_page: usize, refuse_at: Option<usize>) -> Arc<Self> {
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Arc::new(Self {
            ids,
            per_page,
            refuse_at,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn param(&self, key: &str) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query_param(key))
            .collect()
    }
}

#[async_trait]
impl Transport for CorpusTransport {
    async fn execute(&self, request: &RequestDescription) -> Result<RawResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };
        if self.refuse_at == Some(call) {
            return Ok(refusal(FUTURE_RESET));
        }

        let bound = |key: &str| request.query_param(key).map(|v| v.parse::<u64>().unwrap());
        let max_id = bound("max_id").unwrap_or(u64::MAX);
        let since_id = bound("since_id").unwrap_or(0);
        let ids: Vec<u64> = self
            .ids
            .iter()
            .copied()
            .filter(|id| *id <= max_id && *id > since_id)
            .take(self.per_page)
            .collect();
        Ok(RawResponse::new(200, quota_headers(400, FUTURE_RESET), body(&ids)))
    }
}

fn client(transport: &Arc<ScriptedTransport>) -> SearchClient<Arc<ScriptedTransport>> {
    SearchClient::builder(Arc::clone(transport)).build()
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[test]
fn test_cursor_starts_without_minimum() {
    let cursor = Cursor::new();
    assert_eq!(cursor.min_id(), None);
    assert_eq!(cursor.next_max_id().unwrap(), u64::MAX - 1);
}

#[test]
fn test_cursor_tracks_running_minimum() {
    let mut cursor = Cursor::new();
    cursor.observe(&[Tweet::new(90, "a"), Tweet::new(50, "b"), Tweet::new(70, "c")]);
    assert_eq!(cursor.min_id(), Some(50));

    // a later page with a higher minimum must not raise the boundary
    cursor.observe(&[Tweet::new(60, "d")]);
    assert_eq!(cursor.min_id(), Some(50));
    assert_eq!(cursor.next_max_id().unwrap(), 49);

    cursor.observe(&[]);
    assert_eq!(cursor.min_id(), Some(50));
}

#[test]
fn test_cursor_underflow() {
    let mut cursor = Cursor::new();
    cursor.observe(&[Tweet::new(0, "genesis")]);
    let err = cursor.next_max_id().unwrap_err();
    assert!(matches!(err, Error::BoundaryUnderflow { min_id: 0 }));
    assert!(err.is_definition());
}

// ============================================================================
// Continuation Tests
// ============================================================================

#[test]
fn test_decide_quota_exhausted_short_page_stops() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let state = RateLimitState::new(450, 0, now);
    assert_eq!(
        decide(ContinuationPolicy::QuotaExhausted, 3, Some(&state), now),
        Continuation::Stop(StopReason::QuotaExhausted)
    );
}

#[test]
fn test_decide_quota_exhausted_full_page_continues() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let state = RateLimitState::new(450, 0, now);
    assert!(decide(ContinuationPolicy::QuotaExhausted, PAGE_SIZE, Some(&state), now)
        .should_continue());
}

#[test]
fn test_decide_quota_left_continues() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let state = RateLimitState::new(450, 1, now + chrono::Duration::minutes(5));
    assert!(decide(ContinuationPolicy::QuotaExhausted, 1, Some(&state), now).should_continue());
}

#[test]
fn test_decide_without_headers_continues() {
    let now = Utc::now();
    assert!(decide(ContinuationPolicy::QuotaExhausted, 1, None, now).should_continue());
    assert!(decide(ContinuationPolicy::ResetPending, 1, None, now).should_continue());
}

#[test]
fn test_decide_reset_pending() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let pending = RateLimitState::new(450, 300, now + chrono::Duration::minutes(5));
    let elapsed = RateLimitState::new(450, 300, now - chrono::Duration::minutes(5));

    assert_eq!(
        decide(ContinuationPolicy::ResetPending, PAGE_SIZE, Some(&pending), now),
        Continuation::Stop(StopReason::ResetPending)
    );
    assert!(decide(ContinuationPolicy::ResetPending, 1, Some(&elapsed), now).should_continue());
}

// ============================================================================
// Aggregation Tests
// ============================================================================

#[test]
fn test_aggregation_keeps_arrival_order_and_last_rate_limit() {
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut aggregation = Aggregation::new();
    assert!(aggregation.is_empty());

    aggregation.append_page(vec![Tweet::new(9, "a"), Tweet::new(8, "b")]);
    aggregation.observe_rate_limit(RateLimitState::new(450, 10, t0));
    aggregation.append_page(vec![Tweet::new(5, "c")]);
    aggregation.observe_rate_limit(RateLimitState::new(450, 9, t0));
    assert_eq!(aggregation.len(), 3);

    let result = aggregation.finish(StopReason::EmptyPage);
    assert_eq!(result.ids(), vec![9, 8, 5]);
    assert_eq!(result.pages, 2);
    assert_eq!(result.rate_limit.unwrap().remaining, 9);
    assert_eq!(result.min_id(), Some(5));
}

#[test]
fn test_result_resume_after() {
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut aggregation = Aggregation::new();
    aggregation.observe_rate_limit(RateLimitState::new(450, 0, now + chrono::Duration::seconds(30)));

    let stopped = aggregation.clone().finish(StopReason::RateLimited);
    assert_eq!(
        stopped.resume_after(now),
        Some(std::time::Duration::from_secs(30))
    );

    let finished = aggregation.finish(StopReason::EmptyPage);
    assert_eq!(finished.resume_after(now), None);
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_normalisation() {
    let config = SearchConfig::new()
        .with_since_id(0)
        .with_max_id(0)
        .with_language("")
        .with_result_type(ResultType::from_str_lossy("bogus"));
    assert_eq!(config.since_id, None);
    assert_eq!(config.max_id, None);
    assert_eq!(config.language.as_deref(), Some("en"));
    assert_eq!(config.result_type, Some(ResultType::Mixed));
    assert_eq!(config.policy, ContinuationPolicy::QuotaExhausted);
}

#[test]
fn test_builder_sets_config() {
    let transport = ScriptedTransport::new(vec![]);
    let client = SearchClient::builder(transport)
        .since_id(77)
        .max_id(9_000)
        .language("ja")
        .result_type_str("recent")
        .continuation_policy(ContinuationPolicy::ResetPending)
        .build();

    assert_eq!(
        client.config(),
        &SearchConfig {
            since_id: Some(77),
            max_id: Some(9_000),
            language: Some("ja".to_string()),
            result_type: Some(ResultType::Recent),
            policy: ContinuationPolicy::ResetPending,
        }
    );
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_search_multi_page_windows() {
    let transport = ScriptedTransport::new(vec![
        page(&[50, 40, 30], 10),
        page(&[20, 10], 9),
        page(&[], 8),
    ]);

    let result = client(&transport).search("rust").await.unwrap();

    assert_eq!(result.ids(), vec![50, 40, 30, 20, 10]);
    assert_eq!(result.pages, 2);
    assert_eq!(result.stop_reason, StopReason::EmptyPage);
    assert_eq!(result.rate_limit.unwrap().remaining, 8);
    assert_eq!(transport.calls(), 3);
    assert_eq!(
        transport.param("max_id"),
        vec![None, Some("29".to_string()), Some("9".to_string())]
    );
}

#[tokio::test]
async fn test_search_has_no_duplicates() {
    let transport = ScriptedTransport::new(vec![
        page(&[105, 104, 103], 5),
        page(&[102, 101], 4),
        page(&[100], 3),
        page(&[], 2),
    ]);

    let result = client(&transport).search("rust").await.unwrap();

    let unique: HashSet<u64> = result.ids().into_iter().collect();
    assert_eq!(unique.len(), result.len());
    assert_eq!(unique, (100..=105).collect::<HashSet<u64>>());
}

#[tokio::test]
async fn test_search_uses_running_minimum() {
    let transport = ScriptedTransport::new(vec![
        page(&[90, 50, 70], 10),
        // out-of-order page whose minimum is above the running minimum
        page(&[60, 55], 9),
        page(&[], 8),
    ]);

    client(&transport).search("rust").await.unwrap();

    assert_eq!(
        transport.param("max_id"),
        vec![None, Some("49".to_string()), Some("49".to_string())]
    );
}

#[tokio::test]
async fn test_search_empty_first_page() {
    let transport = ScriptedTransport::new(vec![page(&[], 449)]);

    let result = client(&transport).search("nothing here").await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.pages, 0);
    assert_eq!(result.stop_reason, StopReason::EmptyPage);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_search_rate_limited_first_page() {
    let transport = ScriptedTransport::new(vec![rate_limited(1_700_000_900)]);

    let result = client(&transport).search("rust").await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.stop_reason, StopReason::RateLimited);
    let state = result.rate_limit.unwrap();
    assert_eq!(state.remaining, 0);
    assert_eq!(state.reset, Utc.timestamp_opt(1_700_000_900, 0).unwrap());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_search_rate_limited_third_page_keeps_earlier_pages() {
    let transport = ScriptedTransport::new(vec![
        page(&[30, 29], 2),
        page(&[20, 19], 1),
        rate_limited(1_700_000_123),
    ]);

    let result = client(&transport).search("rust").await.unwrap();

    assert_eq!(result.ids(), vec![30, 29, 20, 19]);
    assert_eq!(result.pages, 2);
    assert_eq!(result.stop_reason, StopReason::RateLimited);
    assert_eq!(
        result.rate_limit.unwrap().reset,
        Utc.timestamp_opt(1_700_000_123, 0).unwrap()
    );
}

#[tokio::test]
async fn test_search_transport_error_discards_pages() {
    let transport = ScriptedTransport::new(vec![
        page(&[30, 29], 2),
        Step::Fail(503, "Over capacity"),
    ]);

    let err = client(&transport).search("rust").await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "Over capacity");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_search_undecodable_page_is_terminal() {
    let transport = ScriptedTransport::new(vec![
        page(&[30], 2),
        Step::Respond(RawResponse::new(200, HeaderMap::new(), "<html>")),
    ]);

    let err = client(&transport).search("rust").await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_search_is_deterministic() {
    let script = || {
        vec![
            page(&[50, 40], 3),
            page(&[30], 2),
            rate_limited(1_700_000_500),
        ]
    };
    let first_transport = ScriptedTransport::new(script());
    let second_transport = ScriptedTransport::new(script());

    let first = client(&first_transport).search("rust").await.unwrap();
    let second = client(&second_transport).search("rust").await.unwrap();

    assert_eq!(
        serde_json::to_vec(&first.tweets).unwrap(),
        serde_json::to_vec(&second.tweets).unwrap()
    );
    assert_eq!(first.rate_limit, second.rate_limit);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_search_short_page_without_quota_stops() {
    let transport = ScriptedTransport::new(vec![page(&[12, 11, 10], 0)]);

    let result = client(&transport).search("rust").await.unwrap();

    assert_eq!(result.ids(), vec![12, 11, 10]);
    assert_eq!(result.stop_reason, StopReason::QuotaExhausted);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_search_full_page_without_quota_continues() {
    let full: Vec<u64> = (1001..=1000 + PAGE_SIZE as u64).rev().collect();
    let transport = ScriptedTransport::new(vec![page(&full, 0), page(&[500], 0)]);

    let result = client(&transport).search("rust").await.unwrap();

    assert_eq!(result.len(), PAGE_SIZE + 1);
    assert_eq!(result.stop_reason, StopReason::QuotaExhausted);
    assert_eq!(
        transport.param("max_id"),
        vec![None, Some("1000".to_string())]
    );
}

#[tokio::test]
async fn test_search_without_headers_pages_until_empty() {
    let transport = ScriptedTransport::new(vec![bare_page(&[8, 7]), bare_page(&[])]);

    let result = client(&transport).search("rust").await.unwrap();

    assert_eq!(result.ids(), vec![8, 7]);
    assert!(result.rate_limit.is_none());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_search_reset_pending_policy_stops_early() {
    let transport = ScriptedTransport::new(vec![page(&[40, 39], 300)]);
    let client = SearchClient::builder(Arc::clone(&transport))
        .continuation_policy(ContinuationPolicy::ResetPending)
        .build();

    let result = client.search("rust").await.unwrap();

    assert_eq!(result.stop_reason, StopReason::ResetPending);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_search_boundary_underflow() {
    let transport = ScriptedTransport::new(vec![page(&[2, 0], 10)]);

    let err = client(&transport).search("rust").await.unwrap_err();

    assert!(matches!(err, Error::BoundaryUnderflow { min_id: 0 }));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_search_empty_query_makes_no_calls() {
    let transport = ScriptedTransport::new(vec![]);

    let err = client(&transport).search("").await.unwrap_err();

    assert!(matches!(err, Error::EmptyQuery));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_search_keeps_filters_on_every_page() {
    let transport = ScriptedTransport::new(vec![page(&[9], 5), page(&[4], 4), page(&[], 3)]);
    let client = SearchClient::builder(Arc::clone(&transport))
        .since_id(2)
        .language("de")
        .result_type(ResultType::Recent)
        .build();

    client.search("rust").await.unwrap();

    let twos = vec![Some("2".to_string()); 3];
    assert_eq!(transport.param("since_id"), twos);
    assert_eq!(transport.param("lang"), vec![Some("de".to_string()); 3]);
    assert_eq!(
        transport.param("result_type"),
        vec![Some("recent".to_string()); 3]
    );
    assert_eq!(transport.param("q"), vec![Some("rust".to_string()); 3]);
    assert_eq!(transport.param("count"), vec![Some("100".to_string()); 3]);
}

#[tokio::test]
async fn test_search_through_trait_object() {
    let transport = ScriptedTransport::new(vec![page(&[3], 1), page(&[], 0)]);
    let searcher: Box<dyn TweetSearch> = Box::new(client(&transport));

    let result = searcher.search("rust").await.unwrap();
    assert_eq!(result.ids(), vec![3]);
}

#[tokio::test]
async fn test_search_starts_at_configured_max_id() {
    let transport = ScriptedTransport::new(vec![page(&[500, 480], 10), page(&[], 9)]);
    let client = SearchClient::builder(Arc::clone(&transport))
        .max_id(500)
        .since_id(100)
        .build();

    let result = client.search("rust").await.unwrap();

    assert_eq!(result.ids(), vec![500, 480]);
    assert_eq!(
        transport.param("max_id"),
        vec![Some("500".to_string()), Some("479".to_string())]
    );
    assert_eq!(transport.param("since_id"), vec![Some("100".to_string()); 2]);
    assert_eq!(client.config().max_id, Some(500));
}

#[tokio::test]
async fn test_search_zero_max_id_starts_from_newest() {
    let transport = ScriptedTransport::new(vec![page(&[], 10)]);
    let client = SearchClient::builder(Arc::clone(&transport)).max_id(0).build();

    client.search("rust").await.unwrap();

    assert_eq!(transport.param("max_id"), vec![None]);
}

#[tokio::test]
async fn test_search_resumes_below_rate_limited_result() {
    let corpus: Vec<u64> = (1..=10).map(|n| n * 10).collect();

    // third call is refused after two pages of three
    let first_transport = CorpusTransport::new(corpus.clone(), 3, Some(3));
    let first = SearchClient::builder(Arc::clone(&first_transport))
        .build()
        .search("rust")
        .await
        .unwrap();
    assert_eq!(first.stop_reason, StopReason::RateLimited);
    assert_eq!(first.ids(), vec![100, 90, 80, 70, 60, 50]);

    let resume_from = first.min_id().unwrap() - 1;
    let second_transport = CorpusTransport::new(corpus.clone(), 3, None);
    let second = SearchClient::builder(Arc::clone(&second_transport))
        .max_id(resume_from)
        .build()
        .search("rust")
        .await
        .unwrap();
    assert_eq!(second.stop_reason, StopReason::EmptyPage);
    assert_eq!(second.ids(), vec![40, 30, 20, 10]);
    assert_eq!(second_transport.param("max_id")[0], Some("49".to_string()));

    let mut all: Vec<u64> = first.ids();
    all.extend(second.ids());
    let unique: HashSet<u64> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
    assert_eq!(unique, corpus.into_iter().collect::<HashSet<u64>>());
}
