//! CLI argument definitions for tickervet.

use clap::{Parser, ValueEnum};

/// tickervet - equity red-flag screener
///
/// Screens one or more tickers for structural red flags (foreign domicile,
/// offshore headquarters, low float, ADR status) and renders a risk report.
/// With no tickers, starts an interactive prompt loop.
#[derive(Debug, Parser)]
#[command(
    name = "tickervet",
    author,
    version,
    about = "Equity red-flag screener",
    long_about = "tickervet screens individual equities for structural red flags:\n\
\n\
  • foreign country of origin\n\
  • offshore headquarters (e.g. Cayman, BVI)\n\
  • low public float\n\
  • ADR / listed foreign issuer status\n\
\n\
Data comes from a financial-data provider plus a secondary scrape source,\n\
deduplicated through an in-process one-hour cache. Run with no tickers for\n\
an interactive prompt loop."
)]
pub struct Cli {
    /// Ticker symbol(s) to screen.
    ///
    /// Repeatable (-t AAPL -t GOOG) or comma-separated (-t AAPL,GOOG).
    #[arg(short = 't', long = "ticker", value_name = "TICKER")]
    pub tickers: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Maximum concurrent ticker fetches in batch mode.
    #[arg(long, default_value_t = 4)]
    pub max_workers: usize,

    /// Cache time-to-live in seconds.
    #[arg(long, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Console log level.
    #[arg(short = 'l', long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

/// Output format options. Closed set; selection is by enumeration, not
/// dynamic lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ANSI-colored terminal summary.
    Text,
    /// Structured JSON document.
    Json,
    /// Spreadsheet-compatible CSV.
    Csv,
}

/// Console log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
