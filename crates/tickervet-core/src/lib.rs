//! # Tickervet Core
//!
//! Screening engine for detecting structural red flags in individual
//! equities: foreign domicile, offshore headquarters, low public float, and
//! ADR status.
//!
//! ## Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Domain models (Ticker, StockSnapshot, RiskReport, BatchResult) |
//! | [`cache`] | TTL-bounded in-memory cache with three per-ticker sub-tables |
//! | [`analyzer`] | Pure rule-based risk classification |
//! | [`adr_policy`] | ADR heuristic and source-precedence resolution |
//! | [`orchestrator`] | Bounded-parallelism batch screening |
//! | [`source`] | Collaborator traits and structured source errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`adapters`] | Yahoo quoteSummary and Finviz scrape adapters |
//! | [`config`] | Thresholds, network and display configuration |
//!
//! ## Data flow
//!
//! ```text
//! tickers ──▶ orchestrator ──▶ cache ──▶ snapshot source (Yahoo)
//!                  │             │
//!                  │             └─────▶ scrape source (Finviz / profile)
//!                  ▼
//!             risk analyzer ──▶ BatchResult (input order preserved)
//! ```
//!
//! The engine never formats output: it hands [`domain::BatchResult`] and
//! [`domain::ScreenReport`] values to a presentation layer.

pub mod adapters;
pub mod adr_policy;
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod orchestrator;
pub mod source;

pub use adapters::{FinvizScrapeAdapter, YahooSnapshotAdapter};
pub use adr_policy::{is_adr_heuristic, resolve_adr};
pub use analyzer::RiskAnalyzer;
pub use cache::ScreenCache;
pub use config::{
    DisplayConfig, NetworkConfig, RiskThresholds, DEFAULT_CACHE_TTL, US_COUNTRY_VARIANTS,
};
pub use domain::{
    AdrVerdict, BatchResult, RiskCategory, RiskFlag, RiskReport, RiskSeverity, ScreenReport,
    StockSnapshot, Ticker,
};
pub use error::ValidationError;
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use orchestrator::{normalize_tickers, ScreenOrchestrator};
pub use source::{ScrapeSource, SnapshotSource, SourceError, SourceErrorKind};
