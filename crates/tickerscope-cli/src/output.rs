use std::io::{self, Write};

use serde::Serialize;
use tickerscope_core::{FetchState, SearchSnapshot, StockTicker, Symbol};

use crate::cli::OutputFormat;
use crate::error::CliError;

const NAME_WIDTH: usize = 32;
const DESCRIPTION_WIDTH: usize = 40;

#[derive(Debug, Serialize)]
struct SnapshotView<'a> {
    query: &'a str,
    page: u32,
    has_more: bool,
    state: &'a FetchState,
    status: Option<String>,
    results: &'a [StockTicker],
}

impl<'a> From<&'a SearchSnapshot> for SnapshotView<'a> {
    fn from(snapshot: &'a SearchSnapshot) -> Self {
        Self {
            query: &snapshot.active_query,
            page: snapshot.page,
            has_more: snapshot.has_more(),
            state: &snapshot.state,
            status: snapshot.status_line(),
            results: &snapshot.results,
        }
    }
}

#[derive(Debug, Serialize)]
struct LogoView<'a> {
    ticker: &'a str,
    logo: &'a str,
}

pub fn render_snapshot(
    snapshot: &SearchSnapshot,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    write_snapshot(&mut stdout.lock(), snapshot, format, pretty)
}

pub fn render_logo(
    symbol: &Symbol,
    logo: &str,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let view = LogoView {
                ticker: symbol.as_str(),
                logo,
            };
            write_json(&mut out, &view, pretty)?;
        }
        OutputFormat::Table => writeln!(out, "{symbol}\t{logo}")?,
    }
    Ok(())
}

fn write_snapshot<W: Write>(
    out: &mut W,
    snapshot: &SearchSnapshot,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(out, &SnapshotView::from(snapshot), pretty),
        OutputFormat::Table => write_table(out, snapshot),
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}

fn write_table<W: Write>(out: &mut W, snapshot: &SearchSnapshot) -> Result<(), CliError> {
    if snapshot.active_query.is_empty() && snapshot.results.is_empty() {
        writeln!(out, "query: (none)")?;
    } else {
        writeln!(out, "query: {} (page {})", snapshot.active_query, snapshot.page)?;
    }

    if !snapshot.results.is_empty() {
        writeln!(
            out,
            "{:<8} {:<NAME_WIDTH$} {:<DESCRIPTION_WIDTH$} LOGO",
            "TICKER", "NAME", "DESCRIPTION"
        )?;
        for ticker in &snapshot.results {
            writeln!(
                out,
                "{:<8} {:<NAME_WIDTH$} {:<DESCRIPTION_WIDTH$} {}",
                ticker.ticker,
                clip(&ticker.name, NAME_WIDTH),
                clip(ticker.description.as_deref().unwrap_or("-"), DESCRIPTION_WIDTH),
                if ticker.logo.is_empty() { "-" } else { ticker.logo.as_str() },
            )?;
        }
    }

    if let Some(status) = snapshot.status_line() {
        writeln!(out, "{status}")?;
    }
    Ok(())
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut clipped = text.chars().take(width.saturating_sub(3)).collect::<String>();
    clipped.push_str("...");
    clipped
}
