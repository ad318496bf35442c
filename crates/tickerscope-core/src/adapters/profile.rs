use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::{EndpointConfig, SearchConfig};
use crate::data_source::{LogoSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::Symbol;

const PROFILE_PATH: &str = "/api/v3/company/profile";

/// Company-profile lookup that yields the logo image URL for a ticker.
#[derive(Clone)]
pub struct ProfileLogoAdapter {
    http_client: Arc<dyn HttpClient>,
    endpoint: EndpointConfig,
    timeout_ms: Option<u64>,
}

impl ProfileLogoAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &SearchConfig) -> Self {
        Self {
            http_client,
            endpoint: config.profile.clone(),
            timeout_ms: config.timeout_ms(),
        }
    }

    fn build_request(&self, symbol: &Symbol) -> HttpRequest {
        HttpRequest::get(format!(
            "{}{PROFILE_PATH}/{}",
            self.endpoint.base_url,
            urlencoding::encode(symbol.as_str())
        ))
        .with_query("apikey", self.endpoint.api_key.as_str())
        .with_header("accept", "application/json")
        .with_timeout_ms(self.timeout_ms)
    }
}

impl LogoSource for ProfileLogoAdapter {
    fn logo<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(&symbol);
            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| SourceError::unavailable(error.message()))?;

            if !response.is_success() {
                return Err(super::status_error("profile", &response));
            }

            let payload: ProfileResponse = serde_json::from_str(&response.body).map_err(|e| {
                SourceError::malformed(format!("failed to parse profile for {symbol}: {e}"))
            })?;

            Ok(payload.first_image())
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    profile: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    image: Option<String>,
}

impl ProfileResponse {
    fn first_image(self) -> String {
        self.profile
            .into_iter()
            .next()
            .and_then(|entry| entry.image)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::sync::Mutex;

    struct ScriptedHttpClient {
        response: Result<HttpResponse, HttpError>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedHttpClient {
        fn new(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.urls
                .lock()
                .expect("url store should not be poisoned")
                .push(request.full_url());
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn adapter(client: Arc<ScriptedHttpClient>) -> ProfileLogoAdapter {
        let mut config = SearchConfig::default();
        config.profile.base_url = String::from("https://profile.test");
        config.profile.api_key = String::from("fmp-key");
        ProfileLogoAdapter::with_http_client(client, &config)
    }

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[tokio::test]
    async fn returns_first_profile_image_and_keys_request_by_symbol() {
        let client = ScriptedHttpClient::new(Ok(HttpResponse::ok_json(
            r#"{"symbol":"AAPL","profile":[{"image":"https://x/apple.png"},{"image":"https://x/other.png"}]}"#,
        )));

        let logo = adapter(client.clone()).logo(aapl()).await.expect("ok");

        assert_eq!(logo, "https://x/apple.png");
        let urls = client.urls.lock().expect("not poisoned").clone();
        assert_eq!(
            urls,
            vec![String::from("https://profile.test/api/v3/company/profile/AAPL?apikey=fmp-key")]
        );
    }

    #[tokio::test]
    async fn missing_profile_or_image_yields_empty_logo() {
        for body in [r#"{}"#, r#"{"profile":[]}"#, r#"{"profile":[{"companyName":"Apple"}]}"#] {
            let client = ScriptedHttpClient::new(Ok(HttpResponse::ok_json(body)));
            let logo = adapter(client).logo(aapl()).await.expect("ok");
            assert_eq!(logo, "", "body {body} should yield empty logo");
        }
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let client = ScriptedHttpClient::new(Ok(HttpResponse::with_status(503, "")));
        let error = adapter(client).logo(aapl()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(error.message(), "profile returned status 503");
    }

    #[tokio::test]
    async fn rate_limit_status_is_classified() {
        let client = ScriptedHttpClient::new(Ok(HttpResponse::with_status(
            429,
            r#"{"Error Message":"Limit Reach"}"#,
        )));
        let error = adapter(client).logo(aapl()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
        assert!(error.message().contains("Limit Reach"));
    }
}
