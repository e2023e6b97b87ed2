//! In-memory, TTL-bounded caching of per-ticker screening data.
//!
//! Three independent sub-tables (snapshot, ADR verdict, directors) share one
//! store and one TTL. Expiry is lazy: a stale entry is detected and purged
//! on the read that finds it, not by a background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_CACHE_TTL;
use crate::domain::{AdrVerdict, StockSnapshot, Ticker};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    cached_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }
}

#[derive(Debug)]
struct CacheInner {
    snapshots: HashMap<Ticker, CacheEntry<StockSnapshot>>,
    adr_verdicts: HashMap<Ticker, CacheEntry<AdrVerdict>>,
    directors: HashMap<Ticker, CacheEntry<Vec<String>>>,
    ttl: Duration,
}

impl CacheInner {
    fn new(ttl: Duration) -> Self {
        Self {
            snapshots: HashMap::new(),
            adr_verdicts: HashMap::new(),
            directors: HashMap::new(),
            ttl,
        }
    }
}

/// Read a live entry from one sub-table, purging it if stale.
fn lookup<T: Clone>(
    table: &mut HashMap<Ticker, CacheEntry<T>>,
    ttl: Duration,
    ticker: &Ticker,
) -> Option<T> {
    let expired = table.get(ticker)?.is_expired(ttl);
    if expired {
        table.remove(ticker);
        return None;
    }
    table.get(ticker).map(|entry| entry.value.clone())
}

/// Thread-safe, TTL-bounded store for per-ticker screening data.
///
/// Cloning the handle shares the underlying store; all concurrent screening
/// tasks operate on one instance without caller-side locking. Same-key
/// writes race with last-write-wins semantics. The store is constructible
/// per-instance — nothing in the engine assumes a process-wide singleton.
#[derive(Debug, Clone)]
pub struct ScreenCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl ScreenCache {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(ttl))),
        }
    }

    /// Create a cache with the default one-hour TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }

    /// Cached snapshot for a ticker, if present and not expired.
    pub async fn get_snapshot(&self, ticker: &Ticker) -> Option<StockSnapshot> {
        let mut store = self.inner.write().await;
        let ttl = store.ttl;
        let hit = lookup(&mut store.snapshots, ttl, ticker);
        if hit.is_some() {
            tracing::debug!(ticker = %ticker, "snapshot cache hit");
        } else {
            tracing::debug!(ticker = %ticker, "snapshot cache miss");
        }
        hit
    }

    /// Cache a snapshot, replacing any existing entry for its ticker.
    pub async fn set_snapshot(&self, snapshot: StockSnapshot) {
        let ticker = snapshot.ticker.clone();
        let mut store = self.inner.write().await;
        store.snapshots.insert(ticker, CacheEntry::new(snapshot));
    }

    /// Cached ADR verdict for a ticker.
    ///
    /// `None` means never looked up (or expired and purged);
    /// `Some(AdrVerdict::Undetermined)` means the source was consulted and
    /// could not decide — a distinct, live cache entry.
    pub async fn get_adr_status(&self, ticker: &Ticker) -> Option<AdrVerdict> {
        let mut store = self.inner.write().await;
        let ttl = store.ttl;
        lookup(&mut store.adr_verdicts, ttl, ticker)
    }

    /// Cache an ADR verdict verbatim, including `Undetermined`.
    pub async fn set_adr_status(&self, ticker: &Ticker, verdict: AdrVerdict) {
        let mut store = self.inner.write().await;
        store
            .adr_verdicts
            .insert(ticker.clone(), CacheEntry::new(verdict));
    }

    /// Cached directors list for a ticker, if present and not expired.
    ///
    /// The full cached list is returned; callers truncate to their own
    /// maximum count.
    pub async fn get_directors(&self, ticker: &Ticker) -> Option<Vec<String>> {
        let mut store = self.inner.write().await;
        let ttl = store.ttl;
        lookup(&mut store.directors, ttl, ticker)
    }

    /// Cache a directors list, replacing any existing entry.
    pub async fn set_directors(&self, ticker: &Ticker, directors: Vec<String>) {
        let mut store = self.inner.write().await;
        store
            .directors
            .insert(ticker.clone(), CacheEntry::new(directors));
    }

    /// Purge all three sub-tables. Safe to call at any time.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.snapshots.clear();
        store.adr_verdicts.clear();
        store.directors.clear();
        tracing::debug!("cache cleared");
    }

    /// Entry counts per sub-table (snapshots, ADR verdicts, directors),
    /// including not-yet-purged stale entries.
    pub async fn len(&self) -> (usize, usize, usize) {
        let store = self.inner.read().await;
        (
            store.snapshots.len(),
            store.adr_verdicts.len(),
            store.directors.len(),
        )
    }
}

impl Default for ScreenCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(raw: &str) -> Ticker {
        Ticker::parse(raw).expect("valid ticker")
    }

    fn snapshot(raw: &str) -> StockSnapshot {
        let mut s = StockSnapshot::new(ticker(raw));
        s.regular_market_price = Some(42.0);
        s
    }

    #[tokio::test]
    async fn snapshot_round_trips_with_case_varied_lookup() {
        let cache = ScreenCache::new(Duration::from_secs(60));
        cache.set_snapshot(snapshot("AAPL")).await;

        let hit = cache
            .get_snapshot(&ticker("aapl"))
            .await
            .expect("case-insensitive lookup should hit");
        assert_eq!(hit.ticker.as_str(), "AAPL");
        assert_eq!(hit.regular_market_price, Some(42.0));
    }

    #[tokio::test]
    async fn set_overwrites_wholesale() {
        let cache = ScreenCache::new(Duration::from_secs(60));
        cache.set_snapshot(snapshot("AAPL")).await;

        let mut updated = StockSnapshot::new(ticker("AAPL"));
        updated.regular_market_price = Some(99.0);
        cache.set_snapshot(updated).await;

        let hit = cache.get_snapshot(&ticker("AAPL")).await.expect("hit");
        assert_eq!(hit.regular_market_price, Some(99.0));
    }

    #[tokio::test]
    async fn expired_entries_are_purged_on_read() {
        let cache = ScreenCache::new(Duration::from_millis(50));
        cache.set_snapshot(snapshot("AAPL")).await;

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get_snapshot(&ticker("AAPL")).await.is_none());
        // The stale record is physically gone after the first read.
        let (snapshots, _, _) = cache.len().await;
        assert_eq!(snapshots, 0);
        assert!(cache.get_snapshot(&ticker("AAPL")).await.is_none());
    }

    #[tokio::test]
    async fn adr_cache_distinguishes_unknown_from_never_cached() {
        let cache = ScreenCache::new(Duration::from_secs(60));
        let t = ticker("BABA");

        assert_eq!(cache.get_adr_status(&t).await, None);

        cache.set_adr_status(&t, AdrVerdict::Undetermined).await;
        assert_eq!(
            cache.get_adr_status(&t).await,
            Some(AdrVerdict::Undetermined)
        );

        cache.set_adr_status(&t, AdrVerdict::Adr).await;
        assert_eq!(cache.get_adr_status(&t).await, Some(AdrVerdict::Adr));
    }

    #[tokio::test]
    async fn adr_verdicts_expire_like_any_entry() {
        let cache = ScreenCache::new(Duration::from_millis(50));
        let t = ticker("BABA");
        cache.set_adr_status(&t, AdrVerdict::Undetermined).await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get_adr_status(&t).await, None);
    }

    #[tokio::test]
    async fn directors_round_trip() {
        let cache = ScreenCache::new(Duration::from_secs(60));
        let t = ticker("AAPL");
        let directors = vec![String::from("A. Example – Director")];

        assert_eq!(cache.get_directors(&t).await, None);
        cache.set_directors(&t, directors.clone()).await;
        assert_eq!(cache.get_directors(&t).await, Some(directors));
    }

    #[tokio::test]
    async fn clear_purges_all_tables() {
        let cache = ScreenCache::new(Duration::from_secs(60));
        let t = ticker("AAPL");
        cache.set_snapshot(snapshot("AAPL")).await;
        cache.set_adr_status(&t, AdrVerdict::NotAdr).await;
        cache.set_directors(&t, Vec::new()).await;

        cache.clear().await;
        assert_eq!(cache.len().await, (0, 0, 0));

        // Clearing an empty cache is a no-op, not an error.
        cache.clear().await;
    }

    #[tokio::test]
    async fn concurrent_tasks_share_one_store() {
        let cache = ScreenCache::new(Duration::from_secs(60));

        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let t = ticker(&format!("T{i}"));
                let mut s = StockSnapshot::new(t.clone());
                s.regular_market_price = Some(i as f64);
                cache.set_snapshot(s).await;
                cache.get_snapshot(&t).await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let hit = handle.await.expect("task").expect("hit");
            assert_eq!(hit.regular_market_price, Some(i as f64));
        }

        let (snapshots, _, _) = cache.len().await;
        assert_eq!(snapshots, 16);
    }
}
