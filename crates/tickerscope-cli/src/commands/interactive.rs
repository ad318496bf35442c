use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use tickerscope_core::SearchConfig;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Sources;

const MORE: &str = ":more";
const QUIT: &str = ":quit";

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Term(&'a str),
    More,
    Quit,
}

fn parse_line(line: &str) -> Input<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.trim() {
        MORE => Input::More,
        QUIT => Input::Quit,
        _ => Input::Term(line),
    }
}

/// Feeds stdin lines into a session and renders each published snapshot.
///
/// End of input waits for the session to settle so piped input still shows
/// the final results.
pub async fn run(
    sources: &Sources,
    config: &SearchConfig,
    format: OutputFormat,
    pretty: bool,
) -> Result<ExitCode, CliError> {
    let session = sources.session(config);
    let mut snapshots = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => match parse_line(&line) {
                    Input::Quit => break,
                    Input::More => session.scroll_near_bottom()?,
                    Input::Term(term) => session.set_search_term(term)?,
                },
                None => {
                    let settled = session.settle().await?;
                    snapshots.mark_unchanged();
                    output::render_snapshot(&settled, format, pretty)?;
                    break;
                }
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                output::render_snapshot(&snapshot, format, pretty)?;
            }
        }
    }

    session.shutdown().await;
    tracing::debug!("interactive session closed");
    Ok(ExitCode::SUCCESS)
}
