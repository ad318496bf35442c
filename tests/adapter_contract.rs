//! HTTP adapters wired into a full session over a routed in-memory transport.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tickerscope_core::{
    fetch_page, FetchState, HttpClient, HttpError, HttpRequest, HttpResponse, PageNumber,
    PolygonReferenceAdapter, ProfileLogoAdapter, SearchConfig, SearchSession, SourceErrorKind,
};

const POLYGON: &str = "https://polygon.test";
const PROFILE: &str = "https://profile.test";

/// Answers by exact base URL (query string excluded); anything unrouted is a
/// 404.
#[derive(Default)]
struct RoutedHttpClient {
    routes: HashMap<String, Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedHttpClient {
    fn route(mut self, url: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.insert(url.to_owned(), response);
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log").clone()
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "{}")));
        self.requests.lock().expect("request log").push(request);
        Box::pin(async move { response })
    }
}

fn config() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.reference.base_url = String::from(POLYGON);
    config.reference.api_key = String::from("polygon-key");
    config.profile.base_url = String::from(PROFILE);
    config.profile.api_key = String::from("profile-key");
    config
}

fn tickers_url() -> String {
    format!("{POLYGON}/v3/reference/tickers")
}

fn profile_url(symbol: &str) -> String {
    format!("{PROFILE}/api/v3/company/profile/{symbol}")
}

fn profile_body(image: &str) -> HttpResponse {
    HttpResponse::ok_json(format!(
        r#"{{"symbol":"X","profile":[{{"companyName":"X","image":"{image}"}}]}}"#
    ))
}

#[tokio::test(start_paused = true)]
async fn given_polygon_and_profile_when_searching_aapl_then_result_carries_profile_logo() {
    // Given
    let http = Arc::new(
        RoutedHttpClient::default()
            .route(
                &tickers_url(),
                Ok(HttpResponse::ok_json(
                    r#"{"results":[{"ticker":"AAPL","name":"Apple Inc.","market":"stocks","locale":"us","primary_exchange":"XNAS","type":"CS","active":true,"currency_name":"usd"}],"status":"OK","count":1}"#,
                )),
            )
            .route(&profile_url("AAPL"), Ok(profile_body("https://x/apple.png"))),
    );
    let session = SearchSession::with_http_client(&config(), http.clone());

    // When
    session.set_search_term("AAPL").expect("session alive");
    let settled = session.settle().await.expect("session alive");

    // Then
    assert_eq!(settled.results.len(), 1);
    let apple = &settled.results[0];
    assert_eq!(apple.ticker, "AAPL");
    assert_eq!(apple.name, "Apple Inc.");
    assert_eq!(apple.logo, "https://x/apple.png");
    assert_eq!(apple.ticker_type.as_deref(), Some("CS"));

    let requests = http.requests();
    let search = requests
        .iter()
        .find(|r| r.url == tickers_url())
        .expect("reference request issued");
    assert_eq!(search.query_value("search"), Some("AAPL"));
    assert_eq!(search.query_value("market"), Some("stocks"));
    assert_eq!(search.query_value("active"), Some("true"));
    assert_eq!(search.query_value("page"), Some("1"));
    assert_eq!(search.query_value("apiKey"), Some("polygon-key"));
    let profile = requests
        .iter()
        .find(|r| r.url == profile_url("AAPL"))
        .expect("profile request issued");
    assert_eq!(profile.query_value("apikey"), Some("profile-key"));
}

#[tokio::test(start_paused = true)]
async fn given_profile_transport_failure_when_page_loads_then_logo_is_empty_and_no_error() {
    // Given
    let http = Arc::new(
        RoutedHttpClient::default()
            .route(
                &tickers_url(),
                Ok(HttpResponse::ok_json(
                    r#"{"results":[{"ticker":"TSLA","name":"Tesla, Inc."},{"ticker":"AAPL","name":"Apple Inc."}]}"#,
                )),
            )
            .route(&profile_url("TSLA"), Err(HttpError::new("Network Error")))
            .route(&profile_url("AAPL"), Ok(profile_body("https://x/apple.png"))),
    );
    let session = SearchSession::with_http_client(&config(), http);

    // When
    session.set_search_term("T").expect("session alive");
    let settled = session.settle().await.expect("session alive");

    // Then
    assert_eq!(settled.state, FetchState::Idle);
    assert_eq!(settled.status_line(), None);
    assert_eq!(settled.results[0].ticker, "TSLA");
    assert_eq!(settled.results[0].logo, "");
    assert_eq!(settled.results[1].logo, "https://x/apple.png");
}

#[tokio::test(start_paused = true)]
async fn given_polygon_transport_failure_when_searching_then_state_shows_network_error() {
    // Given
    let http = Arc::new(
        RoutedHttpClient::default().route(&tickers_url(), Err(HttpError::new("Network Error"))),
    );
    let session = SearchSession::with_http_client(&config(), http);

    // When
    session.set_search_term("AAPL").expect("session alive");
    let settled = session.settle().await.expect("session alive");

    // Then
    assert_eq!(settled.status_line().as_deref(), Some("Error: Network Error"));
    assert!(settled.results.is_empty());
}

#[tokio::test]
async fn given_rate_limited_polygon_when_fetching_page_then_error_is_rate_limited() {
    // Given
    let http: Arc<dyn HttpClient> = Arc::new(RoutedHttpClient::default().route(
        &tickers_url(),
        Ok(HttpResponse::with_status(
            429,
            r#"{"status":"ERROR","error":"You've exceeded the maximum requests per minute"}"#,
        )),
    ));
    let reference = PolygonReferenceAdapter::with_http_client(Arc::clone(&http), &config());
    let logos = ProfileLogoAdapter::with_http_client(http, &config());

    // When
    let error = fetch_page(&reference, &logos, "AAPL", PageNumber::FIRST)
        .await
        .expect_err("rate limited");

    // Then
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert!(error.retryable());
    assert!(error.message().contains("exceeded the maximum requests"));
}

#[tokio::test]
async fn given_page_beyond_results_when_fetching_then_page_is_empty() {
    // Given
    let http: Arc<dyn HttpClient> = Arc::new(RoutedHttpClient::default().route(
        &tickers_url(),
        Ok(HttpResponse::ok_json(r#"{"status":"OK","count":0}"#)),
    ));
    let reference = PolygonReferenceAdapter::with_http_client(Arc::clone(&http), &config());
    let logos = ProfileLogoAdapter::with_http_client(http, &config());

    // When
    let page = fetch_page(&reference, &logos, "AAPL", PageNumber::new(7).expect("page"))
        .await
        .expect("empty page is not an error");

    // Then
    assert!(page.is_empty());
}

#[tokio::test]
async fn given_empty_query_when_fetching_then_request_is_rejected_without_io() {
    // Given
    let routed = Arc::new(RoutedHttpClient::default());
    let http: Arc<dyn HttpClient> = routed.clone();
    let reference = PolygonReferenceAdapter::with_http_client(Arc::clone(&http), &config());
    let logos = ProfileLogoAdapter::with_http_client(http, &config());

    // When
    let error = fetch_page(&reference, &logos, "", PageNumber::FIRST)
        .await
        .expect_err("empty query");

    // Then
    assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    assert!(routed.requests().is_empty());
}

#[tokio::test]
async fn given_whitespace_query_when_fetching_then_it_is_sent_to_polygon_verbatim() {
    // Given
    let routed = Arc::new(RoutedHttpClient::default().route(
        &tickers_url(),
        Ok(HttpResponse::ok_json(r#"{"results":[]}"#)),
    ));
    let http: Arc<dyn HttpClient> = routed.clone();
    let reference = PolygonReferenceAdapter::with_http_client(Arc::clone(&http), &config());
    let logos = ProfileLogoAdapter::with_http_client(http, &config());

    // When
    let page = fetch_page(&reference, &logos, " ", PageNumber::FIRST)
        .await
        .expect("whitespace is a real search");

    // Then
    assert!(page.is_empty());
    let requests = routed.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_value("search"), Some(" "));
}
