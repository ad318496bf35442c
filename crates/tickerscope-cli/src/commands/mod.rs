mod interactive;
mod logo;
mod search;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tickerscope_core::{
    LogoSource, MockLogoSource, MockReferenceSource, PolygonReferenceAdapter, ProfileLogoAdapter,
    ReferenceSource, ReqwestHttpClient, SearchConfig, SearchSession,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Reference and logo sources a command runs against.
pub struct Sources {
    pub reference: Arc<dyn ReferenceSource>,
    pub logos: Arc<dyn LogoSource>,
}

impl Sources {
    fn for_cli(cli: &Cli, config: &SearchConfig) -> Self {
        if cli.mock {
            return Self {
                reference: Arc::new(MockReferenceSource::default()),
                logos: Arc::new(MockLogoSource::default()),
            };
        }

        let http = Arc::new(ReqwestHttpClient::new());
        Self {
            reference: Arc::new(PolygonReferenceAdapter::with_http_client(http.clone(), config)),
            logos: Arc::new(ProfileLogoAdapter::with_http_client(http, config)),
        }
    }

    pub fn session(&self, config: &SearchConfig) -> SearchSession {
        SearchSession::spawn(config, Arc::clone(&self.reference), Arc::clone(&self.logos))
    }
}

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let config = resolve_config(cli, SearchConfig::from_env()?);
    let sources = Sources::for_cli(cli, &config);
    tracing::debug!(
        mock = cli.mock,
        debounce_ms = u64::try_from(config.debounce.as_millis()).unwrap_or(u64::MAX),
        timeout_ms = ?config.timeout_ms(),
        "resolved search config"
    );

    match &cli.command {
        Command::Search(args) => search::run(args, &sources, &config, cli.format, cli.pretty).await,
        Command::Interactive => interactive::run(&sources, &config, cli.format, cli.pretty).await,
        Command::Logo(args) => logo::run(args, &sources, cli.format, cli.pretty).await,
    }
}

/// Applies command-line overrides on top of the environment config.
fn resolve_config(cli: &Cli, mut config: SearchConfig) -> SearchConfig {
    if let Some(debounce_ms) = cli.debounce_ms {
        config = config.with_debounce(Duration::from_millis(debounce_ms));
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_request_timeout((timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)));
    }
    config
}
