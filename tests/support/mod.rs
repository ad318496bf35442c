//! Scripted collaborators shared by the behaviour tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use tickerscope_core::{
    LogoSource, ReferenceSource, SourceError, StockTicker, Symbol, TickerPage,
    TickerSearchRequest,
};

pub fn ticker(symbol: &str, name: &str) -> StockTicker {
    StockTicker::new(symbol, name)
}

pub fn symbols(results: &[StockTicker]) -> Vec<&str> {
    results.iter().map(|t| t.ticker.as_str()).collect()
}

/// Reference source answering from a per-(query, page) script.
/// Unscripted pages are empty.
#[derive(Default)]
pub struct ScriptedReference {
    pages: HashMap<(String, u32), Result<Vec<StockTicker>, SourceError>>,
    latency: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, query: &str, page: u32, results: Vec<StockTicker>) -> Self {
        self.pages.insert((query.to_owned(), page), Ok(results));
        self
    }

    pub fn failing(mut self, query: &str, page: u32, message: &str) -> Self {
        self.pages
            .insert((query.to_owned(), page), Err(SourceError::unavailable(message)));
        self
    }

    pub fn latency(mut self, query: &str, latency: Duration) -> Self {
        self.latency.insert(query.to_owned(), latency);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ReferenceSource for ScriptedReference {
    fn search<'a>(
        &'a self,
        req: TickerSearchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPage, SourceError>> + Send + 'a>> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((req.query.clone(), req.page.get()));
        Box::pin(async move {
            if let Some(latency) = self.latency.get(&req.query) {
                tokio::time::sleep(*latency).await;
            }
            self.pages
                .get(&(req.query.clone(), req.page.get()))
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
                .map(TickerPage::new)
        })
    }
}

/// Logo source with per-symbol answers and delays. Unscripted symbols fail.
#[derive(Default)]
pub struct ScriptedLogos {
    logos: HashMap<String, Result<String, SourceError>>,
    latency: HashMap<String, Duration>,
    completed: Mutex<Vec<String>>,
}

impl ScriptedLogos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logo(mut self, symbol: &str, url: &str) -> Self {
        self.logos.insert(symbol.to_owned(), Ok(url.to_owned()));
        self
    }

    pub fn failing(mut self, symbol: &str, message: &str) -> Self {
        self.logos
            .insert(symbol.to_owned(), Err(SourceError::unavailable(message)));
        self
    }

    pub fn latency(mut self, symbol: &str, latency: Duration) -> Self {
        self.latency.insert(symbol.to_owned(), latency);
        self
    }

    /// Symbols in the order their lookups finished.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().expect("completed lock").clone()
    }
}

impl LogoSource for ScriptedLogos {
    fn logo<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(latency) = self.latency.get(symbol.as_str()) {
                tokio::time::sleep(*latency).await;
            }
            self.completed
                .lock()
                .expect("completed lock")
                .push(symbol.as_str().to_owned());
            self.logos
                .get(symbol.as_str())
                .cloned()
                .unwrap_or_else(|| Err(SourceError::unavailable("no profile")))
        })
    }
}
