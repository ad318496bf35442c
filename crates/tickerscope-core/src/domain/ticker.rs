use serde::{Deserialize, Serialize};

/// One search result: reference metadata plus the enrichment logo.
///
/// Values are never mutated in place once they enter a result set; enrichment
/// produces a new value through [`StockTicker::with_logo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTicker {
    pub ticker: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_exchange: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ticker_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Logo URL, empty when enrichment was unavailable.
    #[serde(default)]
    pub logo: String,
}

impl StockTicker {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            description: None,
            currency_name: None,
            market: None,
            locale: None,
            primary_exchange: None,
            ticker_type: None,
            active: None,
            logo: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_currency_name(mut self, currency_name: impl Into<String>) -> Self {
        self.currency_name = Some(currency_name.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = logo.into();
        self
    }

    pub fn has_logo(&self) -> bool {
        !self.logo.is_empty()
    }
}
