use std::time::Duration;

use crate::ConfigError;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 10.0;
pub const DEFAULT_REFERENCE_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_PROFILE_BASE_URL: &str = "https://financialmodelingprep.com";

const ENV_POLYGON_API_KEY: &str = "TICKERSCOPE_POLYGON_API_KEY";
const ENV_PROFILE_API_KEY: &str = "TICKERSCOPE_PROFILE_API_KEY";
const ENV_POLYGON_BASE_URL: &str = "TICKERSCOPE_POLYGON_BASE_URL";
const ENV_PROFILE_BASE_URL: &str = "TICKERSCOPE_PROFILE_BASE_URL";
const ENV_DEBOUNCE_MS: &str = "TICKERSCOPE_DEBOUNCE_MS";
const ENV_TIMEOUT_MS: &str = "TICKERSCOPE_TIMEOUT_MS";

/// Endpoint and credential settings for one upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Runtime settings for a search session and its adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub reference: EndpointConfig,
    pub profile: EndpointConfig,
    pub debounce: Duration,
    pub scroll_threshold_px: f64,
    /// Per-request timeout; `None` lets requests wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            reference: EndpointConfig {
                base_url: String::from(DEFAULT_REFERENCE_BASE_URL),
                api_key: String::from("demo"),
            },
            profile: EndpointConfig {
                base_url: String::from(DEFAULT_PROFILE_BASE_URL),
                api_key: String::from("demo"),
            },
            debounce: DEFAULT_DEBOUNCE,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            request_timeout: None,
        }
    }
}

impl SearchConfig {
    /// Reads overrides from `TICKERSCOPE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup, falling back to
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_POLYGON_API_KEY) {
            config.reference.api_key = non_empty(ENV_POLYGON_API_KEY, key)?;
        }
        if let Some(key) = lookup(ENV_PROFILE_API_KEY) {
            config.profile.api_key = non_empty(ENV_PROFILE_API_KEY, key)?;
        }
        if let Some(url) = lookup(ENV_POLYGON_BASE_URL) {
            config.reference.base_url = trim_base_url(non_empty(ENV_POLYGON_BASE_URL, url)?);
        }
        if let Some(url) = lookup(ENV_PROFILE_BASE_URL) {
            config.profile.base_url = trim_base_url(non_empty(ENV_PROFILE_BASE_URL, url)?);
        }
        if let Some(value) = lookup(ENV_DEBOUNCE_MS) {
            config.debounce = Duration::from_millis(parse_millis(ENV_DEBOUNCE_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            let millis = parse_millis(ENV_TIMEOUT_MS, &value)?;
            config.request_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.request_timeout
            .map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    }
}

fn non_empty(name: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyValue { name });
    }
    Ok(trimmed.to_owned())
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}

fn parse_millis(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_owned(),
        })
}
