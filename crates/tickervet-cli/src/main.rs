mod cli;
mod error;
mod interactive;
mod output;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tickervet_core::{
    normalize_tickers, BatchResult, DisplayConfig, FinvizScrapeAdapter, HttpClient, NetworkConfig,
    ReqwestHttpClient, RiskThresholds, ScreenCache, ScreenOrchestrator, YahooSnapshotAdapter,
};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(level: cli::LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_orchestrator(cache_ttl: Duration) -> ScreenOrchestrator {
    let network = NetworkConfig::default();
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(&network));

    ScreenOrchestrator::new(
        ScreenCache::new(cache_ttl),
        Arc::new(YahooSnapshotAdapter::new(Arc::clone(&http))),
        Arc::new(FinvizScrapeAdapter::new(http)),
        RiskThresholds::default(),
        DisplayConfig::default(),
    )
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let orchestrator = build_orchestrator(Duration::from_secs(cli.cache_ttl_secs));

    if cli.tickers.is_empty() {
        interactive::run(&orchestrator).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let tickers = normalize_tickers(&cli.tickers);
    if tickers.is_empty() {
        return Err(CliError::Usage(String::from(
            "no ticker symbols provided (blank arguments were discarded)",
        )));
    }

    let results = orchestrator.run(tickers, cli.max_workers).await;
    let index_value = orchestrator.index_value().await;

    output::render(
        cli.format,
        &results,
        orchestrator.thresholds().min_float_shares,
        index_value,
    )?;

    if results.iter().all(BatchResult::is_success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
