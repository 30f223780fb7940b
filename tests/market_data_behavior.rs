//! Behavior-driven tests for market data providers
//!
//! These tests verify HOW upstream responses (valid payloads, throttling,
//! outages, timeouts and empty answers) are turned into price series or
//! classified errors.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickboard_core::{
    FetchRange, HttpClient, HttpError, HttpRequest, HttpResponse, LookbackPeriod, MarketData,
    SeriesRequest, SourceErrorKind, Symbol, SyntheticSource, UtcDateTime, YahooChartSource,
};

/// HTTP double replaying one canned outcome and recording requests.
struct CannedHttpClient {
    outcome: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    fn new(outcome: Result<HttpResponse, HttpError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("requests lock").push(request);
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

fn yahoo(client: &Arc<CannedHttpClient>) -> YahooChartSource {
    let client: Arc<dyn HttpClient> = Arc::clone(client) as Arc<dyn HttpClient>;
    YahooChartSource::with_http_client(client)
        .with_base_url("https://chart.example.test/v8/finance/chart")
        .with_request_timeout(Duration::from_secs(4))
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

const FOUR_DAYS: &str = r#"{"chart":{"result":[{
    "timestamp":[1704153600,1704240000,1704326400,1704412800],
    "indicators":{"quote":[{"close":[100.0,102.0,98.0,105.0]}]}}],"error":null}}"#;

// =============================================================================
// Yahoo: Valid Responses
// =============================================================================

#[tokio::test]
async fn history_request_returns_full_series_and_hits_range_endpoint() {
    // Given: Yahoo answers with four daily closes
    let client = CannedHttpClient::new(Ok(HttpResponse::ok_json(FOUR_DAYS)));
    let source = yahoo(&client);

    // When: The dashboard asks for one year of history
    let series = source
        .fetch(SeriesRequest::history(symbol("EUNL.DE"), LookbackPeriod::OneYear))
        .await
        .expect("valid payload parses");

    // Then: All closes are returned in order
    let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
    assert_eq!(closes, vec![100.0, 102.0, 98.0, 105.0]);

    // And: The request targets the symbol with a one-year daily range
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "https://chart.example.test/v8/finance/chart/EUNL.DE?range=1y&interval=1d"
    );
    assert_eq!(requests[0].timeout, Duration::from_secs(4));
    assert!(requests[0].headers.contains_key("referer"));
}

#[tokio::test]
async fn latest_request_keeps_two_most_recent_closes() {
    let client = CannedHttpClient::new(Ok(HttpResponse::ok_json(FOUR_DAYS)));
    let source = yahoo(&client);

    let series = source
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .expect("valid payload parses");

    let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
    assert_eq!(closes, vec![98.0, 105.0]);
    assert!(client.requests()[0].url.contains("range=5d"));
}

// =============================================================================
// Yahoo: Upstream Failures
// =============================================================================

#[tokio::test]
async fn throttled_response_is_rate_limited_and_retryable() {
    let client = CannedHttpClient::new(Ok(HttpResponse::with_status(429, "")));
    let err = yahoo(&client)
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .expect_err("429 must fail");

    assert_eq!(err.kind(), SourceErrorKind::RateLimited);
    assert!(err.retryable());
    assert_eq!(err.code(), "source.rate_limited");
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let client = CannedHttpClient::new(Ok(HttpResponse::with_status(502, "bad gateway")));
    let err = yahoo(&client)
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .expect_err("502 must fail");

    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert!(err.message().contains("502"));
}

#[tokio::test]
async fn unknown_symbol_is_not_retryable() {
    let client = CannedHttpClient::new(Ok(HttpResponse::with_status(404, "")));
    let err = yahoo(&client)
        .fetch(SeriesRequest::latest(symbol("NOPE.DE")))
        .await
        .expect_err("404 must fail");

    assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    assert!(!err.retryable());
}

#[tokio::test]
async fn transport_timeout_maps_to_timeout_kind() {
    let client = CannedHttpClient::new(Err(HttpError::timed_out("deadline elapsed")));
    let err = yahoo(&client)
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .expect_err("timeout must fail");

    assert_eq!(err.kind(), SourceErrorKind::Timeout);
    assert_eq!(err.message(), "no response within 4000 ms");
}

#[tokio::test]
async fn connection_failure_maps_to_unavailable() {
    let client = CannedHttpClient::new(Err(HttpError::new("connection refused")));
    let err = yahoo(&client)
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .expect_err("transport failure must fail");

    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert!(err.message().contains("connection refused"));
}

#[tokio::test]
async fn all_null_closes_are_reported_as_empty() {
    let body = r#"{"chart":{"result":[{"timestamp":[1704153600,1704240000],
        "indicators":{"quote":[{"close":[null,null]}]}}],"error":null}}"#;
    let client = CannedHttpClient::new(Ok(HttpResponse::ok_json(body)));
    let err = yahoo(&client)
        .fetch(SeriesRequest::history(symbol("EUNL.DE"), LookbackPeriod::SixMonths))
        .await
        .expect_err("no points must fail");

    assert_eq!(err.kind(), SourceErrorKind::Empty);
}

#[tokio::test]
async fn malformed_payload_is_internal_error() {
    let client = CannedHttpClient::new(Ok(HttpResponse::ok_json("<html>")));
    let err = yahoo(&client)
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .expect_err("garbage must fail");

    assert_eq!(err.kind(), SourceErrorKind::Internal);
}

// =============================================================================
// Synthetic Source: Offline Mode
// =============================================================================

#[tokio::test]
async fn synthetic_source_is_deterministic_per_symbol() {
    // Given: Two generators anchored on the same day
    let anchor = UtcDateTime::parse("2024-06-28T00:00:00Z").expect("timestamp");
    let first = SyntheticSource::new().with_anchor(anchor);
    let second = SyntheticSource::new().with_anchor(anchor);
    let request = SeriesRequest::new(
        symbol("SXR8.DE"),
        FetchRange::History(LookbackPeriod::ThreeYears),
    );

    // When: Both are asked for the same series
    let a = first.fetch(request.clone()).await.expect("series");
    let b = second.fetch(request).await.expect("series");

    // Then: The output is identical and ends on the anchor
    assert_eq!(a, b);
    assert_eq!(a.last().map(|p| p.ts), Some(anchor));

    // And: Another symbol gets a different price path
    let other = first
        .fetch(SeriesRequest::history(symbol("IS3N.DE"), LookbackPeriod::ThreeYears))
        .await
        .expect("series");
    assert_ne!(a.last().map(|p| p.close), other.last().map(|p| p.close));
}

#[tokio::test]
async fn synthetic_source_can_simulate_outage() {
    let source = SyntheticSource::new().with_failing_symbol(symbol("4GLD.DE"));

    let err = source
        .fetch(SeriesRequest::latest(symbol("4GLD.DE")))
        .await
        .expect_err("configured to fail");

    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert!(source
        .fetch(SeriesRequest::latest(symbol("EUNL.DE")))
        .await
        .is_ok());
}
