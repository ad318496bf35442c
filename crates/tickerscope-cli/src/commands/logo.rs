use std::process::ExitCode;

use tickerscope_core::Symbol;

use crate::cli::{LogoArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Sources;

pub async fn run(
    args: &LogoArgs,
    sources: &Sources,
    format: OutputFormat,
    pretty: bool,
) -> Result<ExitCode, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let logo = match sources.logos.logo(symbol.clone()).await {
        Ok(logo) => logo,
        Err(error) => {
            tracing::warn!(%symbol, %error, "logo lookup failed");
            String::new()
        }
    };

    output::render_logo(&symbol, &logo, format, pretty)?;
    Ok(ExitCode::SUCCESS)
}
