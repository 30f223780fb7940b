use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::data_source::{FetchRange, MarketData, SeriesRequest, SourceError, LATEST_POINTS};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{PricePoint, PriceSeries, UtcDateTime};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Daily close series from the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooChartSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    request_timeout: Duration,
}

impl Default for YahooChartSource {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooChartSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(CHART_ENDPOINT),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn endpoint(&self, req: &SeriesRequest) -> String {
        format!(
            "{}/{}?range={}&interval=1d",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.range_token()
        )
    }

    async fn fetch_chart(&self, req: &SeriesRequest) -> Result<PriceSeries, SourceError> {
        let request = HttpRequest::get(self.endpoint(req))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout(self.request_timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(self.request_timeout)
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        match response.status {
            429 => {
                return Err(SourceError::rate_limited(
                    "yahoo returned status 429 (too many requests)",
                ))
            }
            404 => {
                return Err(SourceError::invalid_request(format!(
                    "yahoo does not know symbol '{}'",
                    req.symbol
                )))
            }
            _ if !response.is_success() => {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {}",
                    response.status
                )))
            }
            _ => {}
        }

        let series = parse_chart_response(&response.body)?;
        if series.is_empty() {
            return Err(SourceError::empty(&req.symbol));
        }

        Ok(match req.range {
            FetchRange::Latest => series.tail(LATEST_POINTS),
            FetchRange::History(_) => series,
        })
    }
}

impl MarketData for YahooChartSource {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_chart(&req).await })
    }
}

/// Parses a v8 chart payload into an ascending close series.
///
/// Null closes are skipped, as are timestamps that do not advance (the last
/// bar of a trading day is sometimes repeated as a live bar).
pub fn parse_chart_response(body: &str) -> Result<PriceSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {}",
            error.description()
        )));
    }

    let Some(result) = chart_response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (ts_value, close) in timestamps.into_iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };
        let ts = UtcDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;
        let Ok(point) = PricePoint::new(ts, close) else {
            continue;
        };

        match points.last_mut() {
            Some(previous) if previous.ts >= point.ts => {
                if previous.ts == point.ts {
                    *previous = point;
                }
            }
            _ => points.push(point),
        }
    }

    PriceSeries::new(points).map_err(|e| SourceError::internal(e.to_string()))
}

// Yahoo Finance chart response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum YahooChartError {
    Detailed {
        code: Option<String>,
        description: Option<String>,
    },
    Plain(String),
}

impl YahooChartError {
    fn description(&self) -> String {
        match self {
            Self::Detailed { code, description } => match (code, description) {
                (Some(code), Some(description)) => format!("{code}: {description}"),
                (Some(text), None) | (None, Some(text)) => text.clone(),
                (None, None) => String::from("unknown error"),
            },
            Self::Plain(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
