//! Per-ticker logo enrichment.
//!
//! Every ticker of a page is looked up concurrently and the join settles all
//! lookups: a failed lookup degrades to an empty logo for that ticker only.
//! Output order always equals input order.

use futures::future::join_all;

use crate::data_source::LogoSource;
use crate::{StockTicker, Symbol};

/// Enriches a page of tickers with logo URLs.
pub async fn enrich_page(logos: &dyn LogoSource, tickers: Vec<StockTicker>) -> Vec<StockTicker> {
    let lookups = tickers.into_iter().map(|ticker| enrich_one(logos, ticker));
    join_all(lookups).await
}

async fn enrich_one(logos: &dyn LogoSource, ticker: StockTicker) -> StockTicker {
    let symbol = match Symbol::parse(&ticker.ticker) {
        Ok(symbol) => symbol,
        Err(error) => {
            tracing::warn!(ticker = %ticker.ticker, %error, "skipping logo lookup for unparseable ticker");
            return ticker;
        }
    };

    match logos.logo(symbol).await {
        Ok(logo) => ticker.with_logo(logo),
        Err(error) => {
            tracing::warn!(ticker = %ticker.ticker, %error, "logo lookup failed; using empty logo");
            ticker.with_logo(String::new())
        }
    }
}
