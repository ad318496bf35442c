use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::{EndpointConfig, SearchConfig};
use crate::data_source::{ReferenceSource, SourceError, TickerPage, TickerSearchRequest};
use crate::http_client::{HttpClient, HttpRequest};
use crate::StockTicker;

const TICKERS_PATH: &str = "/v3/reference/tickers";

/// Polygon `/v3/reference/tickers` search, restricted to active stocks.
#[derive(Clone)]
pub struct PolygonReferenceAdapter {
    http_client: Arc<dyn HttpClient>,
    endpoint: EndpointConfig,
    timeout_ms: Option<u64>,
}

impl PolygonReferenceAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &SearchConfig) -> Self {
        Self {
            http_client,
            endpoint: config.reference.clone(),
            timeout_ms: config.timeout_ms(),
        }
    }

    fn build_request(&self, req: &TickerSearchRequest) -> HttpRequest {
        HttpRequest::get(format!("{}{TICKERS_PATH}", self.endpoint.base_url))
            .with_query("search", req.query.as_str())
            .with_query("market", "stocks")
            .with_query("active", "true")
            .with_query("page", req.page.get().to_string())
            .with_query("apiKey", self.endpoint.api_key.as_str())
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms)
    }
}

impl ReferenceSource for PolygonReferenceAdapter {
    fn search<'a>(
        &'a self,
        req: TickerSearchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPage, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(&req);
            let response = self.http_client.execute(request).await.map_err(|error| {
                tracing::debug!(query = %req.query, page = %req.page, %error, "polygon transport error");
                if error.retryable() {
                    SourceError::unavailable(error.message())
                } else {
                    SourceError::internal(error.message())
                }
            })?;

            if !response.is_success() {
                return Err(super::status_error("polygon", &response));
            }

            let payload: PolygonTickersResponse = serde_json::from_str(&response.body)
                .map_err(|e| SourceError::malformed(format!("failed to parse polygon response: {e}")))?;

            let results = payload
                .results
                .unwrap_or_default()
                .into_iter()
                .map(normalize_ticker)
                .collect::<Vec<_>>();

            Ok(TickerPage::new(results))
        })
    }
}

#[derive(Debug, Deserialize)]
struct PolygonTickersResponse {
    #[serde(default)]
    results: Option<Vec<PolygonTickerRecord>>,
}

#[derive(Debug, Deserialize)]
struct PolygonTickerRecord {
    #[serde(default)]
    ticker: String,
    #[serde(default)]
    name: String,
    description: Option<String>,
    currency_name: Option<String>,
    market: Option<String>,
    locale: Option<String>,
    primary_exchange: Option<String>,
    #[serde(rename = "type")]
    ticker_type: Option<String>,
    active: Option<bool>,
}

fn normalize_ticker(record: PolygonTickerRecord) -> StockTicker {
    StockTicker {
        ticker: record.ticker,
        name: record.name,
        description: record.description,
        currency_name: record.currency_name,
        market: record.market,
        locale: record.locale,
        primary_exchange: record.primary_exchange,
        ticker_type: record.ticker_type,
        active: record.active,
        logo: String::new(),
    }
}
