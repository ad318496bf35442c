//! # Domain Models
//!
//! Canonical domain types for ticker search.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StockTicker`] | One reference-data record plus its enrichment logo |
//! | [`PageNumber`] | 1-based page counter for paginated search |
//! | [`Symbol`] | Validated ticker symbol used for enrichment lookups |

mod page;
mod symbol;
mod ticker;

pub use page::PageNumber;
pub use symbol::Symbol;
pub use ticker::StockTicker;
