//! Behavior-driven tests for the screening cache.
//!
//! These verify the cache contract observable by callers: case-insensitive
//! round-trips, lazy TTL expiry with idempotent purge, and the tri-state ADR
//! distinction between "cached unknown" and "never looked up".

use std::time::Duration;

use tickervet_core::{AdrVerdict, ScreenCache, Ticker};
use tickervet_tests::snapshot;

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid")
}

#[tokio::test]
async fn cached_snapshot_survives_case_varied_lookups_unchanged() {
    // Given: a snapshot cached under its canonical ticker
    let cache = ScreenCache::new(Duration::from_secs(60));
    let mut original = snapshot("AAPL");
    original.regular_market_price = Some(187.32);
    original.country = Some(String::from("United States"));
    cache.set_snapshot(original.clone()).await;

    // When: it is looked up with differently-cased spellings
    for raw in ["AAPL", "aapl", "AaPl", " aapl "] {
        let hit = cache
            .get_snapshot(&ticker(raw))
            .await
            .expect("all spellings should resolve to the same entry");

        // Then: the stored value comes back unchanged
        assert_eq!(hit, original);
    }
}

#[tokio::test]
async fn entries_expire_lazily_and_purge_idempotently() {
    // Given: a cache with a very short TTL
    let cache = ScreenCache::new(Duration::from_millis(40));
    cache.set_snapshot(snapshot("AAPL")).await;
    let t = ticker("AAPL");

    assert!(cache.get_snapshot(&t).await.is_some());

    // When: the TTL elapses
    tokio::time::sleep(Duration::from_millis(70)).await;

    // Then: the entry is gone, and the purge is physical — a second query
    // finds no stale record either
    assert!(cache.get_snapshot(&t).await.is_none());
    assert_eq!(cache.len().await.0, 0);
    assert!(cache.get_snapshot(&t).await.is_none());
}

#[tokio::test]
async fn fresh_write_resets_the_clock_for_that_ticker_only() {
    let cache = ScreenCache::new(Duration::from_millis(80));
    cache.set_snapshot(snapshot("OLD")).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    cache.set_snapshot(snapshot("NEW")).await;

    tokio::time::sleep(Duration::from_millis(50)).await;

    // OLD is past its TTL, NEW is not.
    assert!(cache.get_snapshot(&ticker("OLD")).await.is_none());
    assert!(cache.get_snapshot(&ticker("NEW")).await.is_some());
}

#[tokio::test]
async fn cached_unknown_adr_is_distinct_from_never_cached() {
    let cache = ScreenCache::new(Duration::from_secs(60));
    let t = ticker("BABA");

    // Never looked up: no entry at all.
    assert_eq!(cache.get_adr_status(&t).await, None);

    // Looked up, source could not decide: a live Undetermined entry.
    cache.set_adr_status(&t, AdrVerdict::Undetermined).await;
    assert_eq!(
        cache.get_adr_status(&t).await,
        Some(AdrVerdict::Undetermined)
    );
}

#[tokio::test]
async fn adr_verdicts_come_back_verbatim() {
    let cache = ScreenCache::new(Duration::from_secs(60));

    for verdict in [AdrVerdict::Adr, AdrVerdict::NotAdr, AdrVerdict::Undetermined] {
        let t = ticker("TST");
        cache.set_adr_status(&t, verdict).await;
        assert_eq!(cache.get_adr_status(&t).await, Some(verdict));
    }
}

#[tokio::test]
async fn directors_cache_returns_full_list_for_caller_truncation() {
    let cache = ScreenCache::new(Duration::from_secs(60));
    let t = ticker("AAPL");
    let directors: Vec<String> = (0..15).map(|i| format!("Director {i}")).collect();

    cache.set_directors(&t, directors.clone()).await;

    // The cache hands back everything it stored; truncating to a requested
    // maximum is the caller's job.
    let cached = cache.get_directors(&t).await.expect("hit");
    assert_eq!(cached.len(), 15);
    assert_eq!(cached, directors);
}

#[tokio::test]
async fn clear_empties_all_three_tables_and_is_always_safe() {
    let cache = ScreenCache::new(Duration::from_secs(60));
    let t = ticker("AAPL");

    // Safe on an empty cache.
    cache.clear().await;

    cache.set_snapshot(snapshot("AAPL")).await;
    cache.set_adr_status(&t, AdrVerdict::NotAdr).await;
    cache.set_directors(&t, vec![String::from("Jane Doe – Director")]).await;
    assert_eq!(cache.len().await, (1, 1, 1));

    cache.clear().await;
    assert_eq!(cache.len().await, (0, 0, 0));
    assert_eq!(cache.get_adr_status(&t).await, None);
}

#[tokio::test]
async fn sub_tables_are_independent() {
    let cache = ScreenCache::new(Duration::from_secs(60));
    let t = ticker("AAPL");

    // Writing one kind leaves the others untouched.
    cache.set_adr_status(&t, AdrVerdict::Adr).await;
    assert!(cache.get_snapshot(&t).await.is_none());
    assert!(cache.get_directors(&t).await.is_none());
    assert_eq!(cache.get_adr_status(&t).await, Some(AdrVerdict::Adr));
}

#[tokio::test]
async fn concurrent_writers_to_different_tickers_do_not_interfere() {
    let cache = ScreenCache::new(Duration::from_secs(60));

    let mut handles = Vec::new();
    for i in 0..32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let t = ticker(&format!("SYM{i}"));
            let mut s = snapshot(&format!("SYM{i}"));
            s.regular_market_price = Some(i as f64 + 0.5);
            cache.set_snapshot(s).await;
            cache.set_adr_status(&t, AdrVerdict::from_flag(i % 2 == 0)).await;
            (i, cache.get_snapshot(&t).await)
        }));
    }

    for handle in handles {
        let (i, hit) = handle.await.expect("task");
        let hit = hit.expect("own write must be visible");
        assert_eq!(hit.regular_market_price, Some(i as f64 + 0.5));
    }

    let (snapshots, verdicts, _) = cache.len().await;
    assert_eq!(snapshots, 32);
    assert_eq!(verdicts, 32);
}

#[tokio::test]
async fn same_key_races_settle_on_one_write() {
    let cache = ScreenCache::new(Duration::from_secs(60));

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let mut s = snapshot("HOT");
            s.regular_market_price = Some(i as f64);
            cache.set_snapshot(s).await;
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    // Last write wins; whichever write landed last, the entry is coherent.
    let hit = cache.get_snapshot(&ticker("HOT")).await.expect("hit");
    let price = hit.regular_market_price.expect("price set by some writer");
    assert!((0.0..8.0).contains(&price));
    assert_eq!(cache.len().await.0, 1);
}
