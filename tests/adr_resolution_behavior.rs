//! Behavior-driven tests for ADR resolution: the secondary scrape source
//! takes precedence over the primary heuristic whenever it has an opinion.

use std::time::Duration;

use tickervet_core::{is_adr_heuristic, resolve_adr, AdrVerdict, ScreenCache, Ticker};
use tickervet_tests::{snapshot, StaticScrapeSource};

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid")
}

fn cache() -> ScreenCache {
    ScreenCache::new(Duration::from_secs(60))
}

#[tokio::test]
async fn definitive_secondary_no_overrides_primary_yes() {
    let scrapes = StaticScrapeSource::new().with_verdict("SAP", AdrVerdict::NotAdr);
    let resolved = resolve_adr(&scrapes, &cache(), &ticker("SAP"), true).await;
    assert!(!resolved);
}

#[tokio::test]
async fn definitive_secondary_yes_overrides_primary_no() {
    let scrapes = StaticScrapeSource::new().with_verdict("BABA", AdrVerdict::Adr);
    let resolved = resolve_adr(&scrapes, &cache(), &ticker("BABA"), false).await;
    assert!(resolved);
}

#[tokio::test]
async fn undetermined_secondary_falls_back_to_primary() {
    let scrapes = StaticScrapeSource::new();

    assert!(resolve_adr(&scrapes, &cache(), &ticker("ACME"), true).await);
    assert!(!resolve_adr(&scrapes, &cache(), &ticker("ACME"), false).await);
}

#[tokio::test]
async fn agreement_between_sources_is_stable() {
    let scrapes = StaticScrapeSource::new().with_verdict("TSM", AdrVerdict::Adr);
    assert!(resolve_adr(&scrapes, &cache(), &ticker("TSM"), true).await);

    let scrapes = StaticScrapeSource::new().with_verdict("AAPL", AdrVerdict::NotAdr);
    assert!(!resolve_adr(&scrapes, &cache(), &ticker("AAPL"), false).await);
}

#[tokio::test]
async fn verdicts_are_cached_across_resolutions() {
    let scrapes = StaticScrapeSource::new().with_verdict("BABA", AdrVerdict::Adr);
    let cache = cache();
    let t = ticker("BABA");

    assert!(resolve_adr(&scrapes, &cache, &t, false).await);
    assert!(resolve_adr(&scrapes, &cache, &t, false).await);
    assert!(resolve_adr(&scrapes, &cache, &t, false).await);

    // Only the first resolution hit the source.
    assert_eq!(scrapes.check_count(), 1);
    assert_eq!(cache.get_adr_status(&t).await, Some(AdrVerdict::Adr));
}

#[tokio::test]
async fn undetermined_verdicts_are_cached_too() {
    let scrapes = StaticScrapeSource::new();
    let cache = cache();
    let t = ticker("ACME");

    let _ = resolve_adr(&scrapes, &cache, &t, true).await;
    let _ = resolve_adr(&scrapes, &cache, &t, false).await;

    assert_eq!(scrapes.check_count(), 1);
    assert_eq!(
        cache.get_adr_status(&t).await,
        Some(AdrVerdict::Undetermined)
    );
}

#[tokio::test]
async fn expired_verdicts_trigger_a_fresh_scrape() {
    let scrapes = StaticScrapeSource::new().with_verdict("BABA", AdrVerdict::Adr);
    let cache = ScreenCache::new(Duration::from_millis(40));
    let t = ticker("BABA");

    let _ = resolve_adr(&scrapes, &cache, &t, false).await;
    tokio::time::sleep(Duration::from_millis(70)).await;
    let _ = resolve_adr(&scrapes, &cache, &t, false).await;

    assert_eq!(scrapes.check_count(), 2);
}

#[test]
fn heuristic_recognizes_adr_name_markers() {
    let mut s = snapshot("TSM");
    s.long_name = Some(String::from("Taiwan Semiconductor Mfg. Co. Ltd. ADR"));
    assert!(is_adr_heuristic(&s));

    let mut s = snapshot("SONY");
    s.short_name = Some(String::from("Sony American Depositary Shares"));
    assert!(is_adr_heuristic(&s));
}

#[test]
fn heuristic_needs_a_known_foreign_country_for_the_exchange_arm() {
    // Foreign country + US exchange: flagged.
    let mut s = snapshot("BABA");
    s.country = Some(String::from("China"));
    s.exchange = Some(String::from("NYSE"));
    assert!(is_adr_heuristic(&s));

    // Same exchange, no country data: never flagged.
    let mut s = snapshot("ACME");
    s.exchange = Some(String::from("NYSE"));
    assert!(!is_adr_heuristic(&s));
}
