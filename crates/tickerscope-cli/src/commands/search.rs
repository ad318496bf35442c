use std::process::ExitCode;

use tickerscope_core::{FetchState, SearchConfig, SearchSnapshot};

use crate::cli::{OutputFormat, SearchArgs};
use crate::error::CliError;
use crate::output;

use super::Sources;

/// Types `args.query` into a fresh session and scrolls until `args.pages`
/// pages are loaded, the results run out, or a fetch fails.
pub async fn run(
    args: &SearchArgs,
    sources: &Sources,
    config: &SearchConfig,
    format: OutputFormat,
    pretty: bool,
) -> Result<ExitCode, CliError> {
    if args.pages == 0 {
        return Err(CliError::Command(String::from(
            "--pages must be greater than zero",
        )));
    }

    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::Command(String::from("query must not be empty")));
    }

    let session = sources.session(config);
    session.set_search_term(query)?;
    let mut snapshot = session.settle().await?;

    while wants_more(&snapshot, args.pages) {
        session.scroll_near_bottom()?;
        snapshot = session.settle().await?;
    }
    session.shutdown().await;

    output::render_snapshot(&snapshot, format, pretty)?;

    if matches!(snapshot.state, FetchState::Error(_)) {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn wants_more(snapshot: &SearchSnapshot, pages: u32) -> bool {
    snapshot.state == FetchState::Idle && snapshot.page < pages
}
