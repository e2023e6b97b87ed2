//! Batch screening orchestration.
//!
//! One task per ticker, bounded by a semaphore, all sharing the same cache
//! handle. Results are reassembled into caller order; a failure (or panic)
//! inside one ticker's task degrades to an error result for that ticker and
//! never disturbs its siblings.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::adr_policy::{is_adr_heuristic, resolve_adr};
use crate::analyzer::RiskAnalyzer;
use crate::cache::ScreenCache;
use crate::config::{DisplayConfig, RiskThresholds};
use crate::domain::{BatchResult, StockSnapshot, Ticker};
use crate::source::{ScrapeSource, SnapshotSource};

const INDEX_TICKER: &str = "^VIX";

/// Split, trim, uppercase, drop blanks and dedupe ticker arguments.
///
/// Accepts both repeated arguments and comma-separated lists; first
/// occurrence order is preserved. Blank entries are discarded here (a
/// documented pre-filter); non-blank entries that fail symbol validation
/// are kept so they surface as per-ticker errors later.
pub fn normalize_tickers(raw: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for arg in raw {
        for part in arg.split(',') {
            let ticker = part.trim().to_ascii_uppercase();
            if ticker.is_empty() {
                continue;
            }
            if !seen.contains(&ticker) {
                seen.push(ticker);
            }
        }
    }
    seen
}

/// Drives per-ticker screening over the cache, sources and analyzer.
///
/// Construction is explicit: callers wire the cache and both sources in.
/// Cloning shares the cache and the source handles, which is what the
/// spawned batch tasks rely on.
#[derive(Clone)]
pub struct ScreenOrchestrator {
    cache: ScreenCache,
    snapshots: Arc<dyn SnapshotSource>,
    scrapes: Arc<dyn ScrapeSource>,
    analyzer: RiskAnalyzer,
    directors_max: usize,
}

impl ScreenOrchestrator {
    pub fn new(
        cache: ScreenCache,
        snapshots: Arc<dyn SnapshotSource>,
        scrapes: Arc<dyn ScrapeSource>,
        thresholds: RiskThresholds,
        display: DisplayConfig,
    ) -> Self {
        Self {
            cache,
            snapshots,
            scrapes,
            analyzer: RiskAnalyzer::new(thresholds),
            directors_max: display.directors_max,
        }
    }

    pub fn cache(&self) -> &ScreenCache {
        &self.cache
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        self.analyzer.thresholds()
    }

    /// Screen one ticker end to end: snapshot (cache-then-source), ADR
    /// resolution, directors, risk analysis.
    pub async fn screen_one(&self, ticker: &Ticker) -> BatchResult {
        let Some(mut snapshot) = self.snapshot_for(ticker).await else {
            return BatchResult::failure(
                ticker.as_str(),
                format!("unable to retrieve data for {ticker}"),
            );
        };

        let primary = is_adr_heuristic(&snapshot);
        snapshot.is_adr =
            resolve_adr(self.scrapes.as_ref(), &self.cache, ticker, primary).await;
        snapshot.directors = self.directors_for(ticker).await;

        let report = self.analyzer.analyze(&snapshot);
        BatchResult::success(snapshot, report)
    }

    /// Screen a raw, already-normalized ticker string, turning validation
    /// failures into per-ticker error results.
    pub async fn screen_raw(&self, raw: &str) -> BatchResult {
        match Ticker::parse(raw) {
            Ok(ticker) => self.screen_one(&ticker).await,
            Err(error) => BatchResult::failure(raw, error.to_string()),
        }
    }

    /// Screen a batch with bounded parallelism, returning one result per
    /// input ticker in input order.
    pub async fn run(&self, tickers: Vec<String>, max_workers: usize) -> Vec<BatchResult> {
        // Degenerate batches skip the pool but behave identically.
        if tickers.len() <= 1 {
            let mut results = Vec::with_capacity(tickers.len());
            for raw in &tickers {
                results.push(self.screen_raw(raw).await);
            }
            return results;
        }

        let workers = max_workers.max(1).min(tickers.len());
        tracing::info!(tickers = tickers.len(), workers, "starting batch screening");

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(tickers.len());

        for (index, raw) in tickers.iter().cloned().enumerate() {
            let orchestrator = self.clone();
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            index,
                            BatchResult::failure(raw.as_str(), "worker pool closed"),
                        );
                    }
                };
                (index, orchestrator.screen_raw(&raw).await)
            }));
        }

        let mut slots: Vec<Option<BatchResult>> = tickers.iter().map(|_| None).collect();
        for (spawn_index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok((index, result)) => slots[index] = Some(result),
                // A panicking task loses only its own ticker.
                Err(join_error) => {
                    tracing::error!(ticker = %tickers[spawn_index], error = %join_error, "screening task failed");
                    slots[spawn_index] = Some(BatchResult::failure(
                        tickers[spawn_index].as_str(),
                        format!("screening task failed: {join_error}"),
                    ));
                }
            }
        }

        slots.into_iter().flatten().collect()
    }

    /// Current volatility-index value, fetched once per batch and cached
    /// under the `^VIX` pseudo-ticker.
    pub async fn index_value(&self) -> Option<f64> {
        let Ok(index_ticker) = Ticker::parse(INDEX_TICKER) else {
            return None;
        };

        if let Some(cached) = self.cache.get_snapshot(&index_ticker).await {
            if cached.regular_market_price.is_some() {
                return cached.regular_market_price;
            }
        }

        let value = self.snapshots.fetch_index_value().await;
        if let Some(price) = value {
            let mut snapshot = StockSnapshot::new(index_ticker);
            snapshot.regular_market_price = Some(price);
            self.cache.set_snapshot(snapshot).await;
        }
        value
    }

    async fn snapshot_for(&self, ticker: &Ticker) -> Option<StockSnapshot> {
        if let Some(cached) = self.cache.get_snapshot(ticker).await {
            return Some(cached);
        }

        match self.snapshots.fetch_snapshot(ticker).await {
            Ok(snapshot) => {
                self.cache.set_snapshot(snapshot.clone()).await;
                Some(snapshot)
            }
            Err(error) => {
                tracing::warn!(ticker = %ticker, error = %error, "snapshot fetch failed");
                None
            }
        }
    }

    async fn directors_for(&self, ticker: &Ticker) -> Vec<String> {
        if let Some(cached) = self.cache.get_directors(ticker).await {
            return cached.into_iter().take(self.directors_max).collect();
        }

        let directors = self
            .scrapes
            .fetch_directors(ticker, self.directors_max)
            .await;
        self.cache.set_directors(ticker, directors.clone()).await;
        directors.into_iter().take(self.directors_max).collect()
    }
}
