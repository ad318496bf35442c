use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use crate::data_source::{LogoSource, ReferenceSource, SourceError, TickerPage, TickerSearchRequest};
use crate::{PageNumber, StockTicker, Symbol};

const DEFAULT_PAGE_SIZE: usize = 5;

/// Deterministic in-memory reference search over a small ticker catalog.
///
/// Matches the query case-insensitively against ticker and name and slices
/// the matches into fixed-size pages. Every call is recorded.
#[derive(Debug)]
pub struct MockReferenceSource {
    catalog: Vec<StockTicker>,
    page_size: usize,
    latency: Duration,
    calls: Mutex<Vec<(String, PageNumber)>>,
}

impl Default for MockReferenceSource {
    fn default() -> Self {
        Self::with_catalog(catalog(), DEFAULT_PAGE_SIZE)
    }
}

impl MockReferenceSource {
    pub fn with_catalog(catalog: Vec<StockTicker>, page_size: usize) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every `(query, page)` searched so far, in call order.
    pub fn calls(&self) -> Vec<(String, PageNumber)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn page_of(&self, req: &TickerSearchRequest) -> TickerPage {
        let needle = req.query.trim().to_ascii_lowercase();
        let skip = (req.page.get() as usize - 1).saturating_mul(self.page_size);
        let results = self
            .catalog
            .iter()
            .filter(|ticker| {
                ticker.ticker.to_ascii_lowercase().contains(&needle)
                    || ticker.name.to_ascii_lowercase().contains(&needle)
            })
            .skip(skip)
            .take(self.page_size)
            .cloned()
            .collect();
        TickerPage::new(results)
    }
}

impl ReferenceSource for MockReferenceSource {
    fn search<'a>(
        &'a self,
        req: TickerSearchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPage, SourceError>> + Send + 'a>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((req.query.clone(), req.page));
        }
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            Ok(self.page_of(&req))
        })
    }
}

/// Deterministic logo lookup; unknown symbols fail as unavailable.
#[derive(Debug)]
pub struct MockLogoSource {
    logos: HashMap<String, String>,
    latency: HashMap<String, Duration>,
}

impl Default for MockLogoSource {
    fn default() -> Self {
        let logos = catalog()
            .into_iter()
            .map(|ticker| {
                let logo = format!(
                    "https://logos.example/{}.png",
                    ticker.ticker.to_ascii_lowercase()
                );
                (ticker.ticker, logo)
            })
            .collect();
        Self::with_logos(logos)
    }
}

impl MockLogoSource {
    pub fn with_logos(logos: HashMap<String, String>) -> Self {
        Self {
            logos,
            latency: HashMap::new(),
        }
    }

    /// Delays the answer for one symbol, to exercise out-of-order completion.
    pub fn with_latency(mut self, symbol: &str, latency: Duration) -> Self {
        self.latency.insert(symbol.to_ascii_uppercase(), latency);
        self
    }
}

impl LogoSource for MockLogoSource {
    fn logo<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(latency) = self.latency.get(symbol.as_str()) {
                tokio::time::sleep(*latency).await;
            }
            self.logos
                .get(symbol.as_str())
                .cloned()
                .ok_or_else(|| SourceError::unavailable(format!("no profile for {symbol}")))
        })
    }
}

fn catalog() -> Vec<StockTicker> {
    [
        ("AAPL", "Apple Inc.", "Designs consumer electronics, software and services."),
        ("APLE", "Apple Hospitality REIT, Inc.", "Owns upscale select-service hotels."),
        ("MSFT", "Microsoft Corporation", "Develops software, cloud services and devices."),
        ("NVDA", "NVIDIA Corporation", "Designs GPUs and accelerated computing platforms."),
        ("TSLA", "Tesla, Inc.", "Builds electric vehicles and energy storage."),
        ("SPY", "SPDR S&P 500 ETF Trust", "Exchange-traded fund tracking the S&P 500."),
        ("AMZN", "Amazon.com, Inc.", "Runs online retail and cloud infrastructure."),
        ("GOOGL", "Alphabet Inc. Class A", "Parent of Google, voting shares."),
        ("GOOG", "Alphabet Inc. Class C", "Parent of Google, non-voting shares."),
        ("META", "Meta Platforms, Inc.", "Operates social networks and messaging apps."),
        ("AMD", "Advanced Micro Devices, Inc.", "Designs CPUs, GPUs and adaptive chips."),
        ("INTC", "Intel Corporation", "Designs and manufactures semiconductors."),
        ("BRK.A", "Berkshire Hathaway Inc. Class A", "Diversified holding company, class A."),
        ("BRK.B", "Berkshire Hathaway Inc. Class B", "Diversified holding company, class B."),
    ]
    .into_iter()
    .map(|(ticker, name, description)| {
        let mut entry = StockTicker::new(ticker, name)
            .with_description(description)
            .with_currency_name("usd");
        entry.market = Some(String::from("stocks"));
        entry.active = Some(true);
        entry
    })
    .collect()
}
