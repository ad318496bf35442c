//! CLI argument definitions for tickerscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Debounced search, paging until N pages are loaded |
//! | `interactive` | Drive a live session from stdin |
//! | `logo` | Look up the logo URL for one ticker |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Use the in-memory catalog instead of HTTP |
//! | `--debounce-ms` | `500` | Quiet period before a search fires |
//! | `--timeout-ms` | none | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! tickerscope search apple --pages 2
//! tickerscope --mock --format json search inc --pages 3 --pretty
//! printf 'app\napple\n:more\n' | tickerscope --mock interactive
//! tickerscope logo AAPL
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Debounced, paginated stock ticker search with logo enrichment.
#[derive(Debug, Parser)]
#[command(
    name = "tickerscope",
    author,
    version,
    about = "Debounced, paginated stock ticker search",
    long_about = "Searches Polygon reference tickers as you type, loads further pages on \
demand and attaches a company logo to every result.\n\
\n\
API keys and endpoints are read from TICKERSCOPE_* environment variables; \
missing keys fall back to \"demo\"."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve searches from the built-in catalog; no network access.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Debounce window in milliseconds (overrides TICKERSCOPE_DEBOUNCE_MS).
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,

    /// Request timeout in milliseconds; 0 disables it (overrides
    /// TICKERSCOPE_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per ticker followed by the status line.
    Table,
    /// Snapshot serialized as JSON.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for tickers and load up to N pages.
    ///
    /// # Examples
    ///
    ///   tickerscope search apple
    ///   tickerscope search inc --pages 3
    Search(SearchArgs),

    /// Read search terms from stdin and render every state change.
    ///
    /// Plain lines replace the search term, an empty line clears it,
    /// `:more` loads the next page and `:quit` exits.
    Interactive,

    /// Print the logo URL for a ticker (empty when unavailable).
    Logo(LogoArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-form search text (symbol or company name).
    pub query: String,

    /// Number of pages to load before printing.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

#[derive(Debug, Args)]
pub struct LogoArgs {
    /// Ticker symbol, e.g. AAPL.
    pub symbol: String,
}
