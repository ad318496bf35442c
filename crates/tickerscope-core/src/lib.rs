//! # Tickerscope Core
//!
//! Debounced, paginated stock-ticker search with per-result logo enrichment.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Polygon reference search, company-profile logos, mock sources |
//! | [`config`] | Session and endpoint configuration |
//! | [`controller`] | Fetch state machine, debounce/scroll handles, session runtime |
//! | [`data_source`] | Source traits and request/response types |
//! | [`domain`] | Domain models (StockTicker, PageNumber, Symbol) |
//! | [`enrichment`] | Order-preserving, failure-tolerant logo fan-out |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerscope_core::{ReqwestHttpClient, SearchConfig, SearchSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SearchConfig::from_env()?;
//!     let session = SearchSession::with_http_client(&config, Arc::new(ReqwestHttpClient::new()));
//!
//!     session.set_search_term("apple")?;
//!     let snapshot = session.settle().await?;
//!     for ticker in &snapshot.results {
//!         println!("{} - {} {}", ticker.ticker, ticker.name, ticker.logo);
//!     }
//!
//!     // Next page, as an infinite-scroll front-end would request it.
//!     session.scroll_near_bottom()?;
//!     let snapshot = session.settle().await?;
//!     println!("{} results, more: {}", snapshot.results.len(), snapshot.has_more());
//!     Ok(())
//! }
//! ```
//!
//! ## Flow
//!
//! ```text
//! keystroke ──▶ debounce (500ms) ──▶ page 1 ──▶ logo fan-out ──▶ replace results
//! near-bottom scroll ──────────────▶ page N ──▶ logo fan-out ──▶ append results
//! ```
//!
//! Reference failures surface as `FetchState::Error`; logo failures only
//! blank that ticker's logo.

pub mod adapters;
pub mod config;
pub mod controller;
pub mod data_source;
pub mod domain;
pub mod enrichment;
pub mod error;
pub mod http_client;

pub use adapters::{MockLogoSource, MockReferenceSource, PolygonReferenceAdapter, ProfileLogoAdapter};
pub use config::{EndpointConfig, SearchConfig};
pub use controller::{
    fetch_page, Debouncer, Effect, FetchController, FetchState, FetchTicket, PageOutcome,
    ScrollListener, ScrollPosition, SearchSession, SearchSnapshot,
};
pub use data_source::{
    LogoSource, ReferenceSource, SourceError, SourceErrorKind, TickerPage, TickerSearchRequest,
};
pub use domain::{PageNumber, StockTicker, Symbol};
pub use enrichment::enrich_page;
pub use error::{ConfigError, CoreError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
