//! ADR determination: primary heuristic plus source-precedence resolution.

use crate::cache::ScreenCache;
use crate::config::US_COUNTRY_VARIANTS;
use crate::domain::{AdrVerdict, StockSnapshot, Ticker};
use crate::source::ScrapeSource;

const US_EXCHANGE_TOKENS: [&str; 6] = ["nyse", "nasdaq", "ncm", "amex", "bats", "arca"];
const US_MARKET_TOKENS: [&str; 3] = ["us", "us_market", "us_equity"];

/// Provider-side ADR heuristic.
///
/// Flags a stock as a likely ADR when its name text carries an explicit ADR
/// marker, or when a company with a known non-US country trades on a US
/// exchange or market. An absent country never triggers the second arm.
pub fn is_adr_heuristic(snapshot: &StockSnapshot) -> bool {
    let long_name = snapshot.long_name.as_deref().unwrap_or("").to_lowercase();
    let short_name = snapshot.short_name.as_deref().unwrap_or("").to_lowercase();
    let text = format!("{long_name} {short_name}");

    if text.contains(" adr") || text.trim_end().ends_with("adr") || text.contains("american depositary")
    {
        return true;
    }

    let country = snapshot.country().trim().to_lowercase();
    let is_foreign = !country.is_empty() && !US_COUNTRY_VARIANTS.contains(&country.as_str());
    if !is_foreign {
        return false;
    }

    let exchange = snapshot.exchange.as_deref().unwrap_or("").to_lowercase();
    let market = snapshot.market.as_deref().unwrap_or("").to_lowercase();

    let on_us_exchange = US_EXCHANGE_TOKENS.iter().any(|t| exchange.contains(t));
    let on_us_market = US_MARKET_TOKENS.iter().any(|t| market.contains(t));

    on_us_exchange || on_us_market
}

/// Resolve the final ADR flag for a ticker.
///
/// The secondary scrape source takes precedence whenever it has an opinion:
/// a definitive `Adr`/`NotAdr` wins outright, even against a disagreeing
/// heuristic; only `Undetermined` falls back to the primary value. Verdicts
/// are cached so repeated screenings within the TTL skip the scrape.
pub async fn resolve_adr(
    scrapes: &dyn ScrapeSource,
    cache: &ScreenCache,
    ticker: &Ticker,
    primary: bool,
) -> bool {
    let verdict = match cache.get_adr_status(ticker).await {
        Some(cached) => {
            tracing::debug!(ticker = %ticker, "ADR verdict cache hit");
            cached
        }
        None => {
            let fetched = scrapes.check_adr(ticker).await;
            cache.set_adr_status(ticker, fetched).await;
            fetched
        }
    };

    match verdict.as_bool() {
        Some(definitive) => definitive,
        None => primary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(raw: &str) -> StockSnapshot {
        StockSnapshot::new(Ticker::parse(raw).expect("valid ticker"))
    }

    #[test]
    fn name_marker_alone_flags_adr() {
        let mut s = snapshot("TSM");
        s.long_name = Some(String::from("Taiwan Semiconductor ADR"));
        assert!(is_adr_heuristic(&s));

        let mut s = snapshot("SONY");
        s.short_name = Some(String::from("Sony Group American Depositary Shares"));
        assert!(is_adr_heuristic(&s));
    }

    #[test]
    fn foreign_company_on_us_exchange_flags_adr() {
        let mut s = snapshot("BABA");
        s.country = Some(String::from("China"));
        s.exchange = Some(String::from("NYSE"));
        assert!(is_adr_heuristic(&s));

        let mut s = snapshot("SAP");
        s.country = Some(String::from("Germany"));
        s.market = Some(String::from("us_market"));
        assert!(is_adr_heuristic(&s));
    }

    #[test]
    fn absent_country_never_triggers_exchange_arm() {
        let mut s = snapshot("ACME");
        s.exchange = Some(String::from("NASDAQ"));
        assert!(!is_adr_heuristic(&s));
    }

    #[test]
    fn us_company_on_us_exchange_is_not_adr() {
        let mut s = snapshot("AAPL");
        s.long_name = Some(String::from("Apple Inc."));
        s.country = Some(String::from("United States"));
        s.exchange = Some(String::from("NASDAQ"));
        assert!(!is_adr_heuristic(&s));
    }

    #[test]
    fn foreign_company_on_foreign_exchange_is_not_adr() {
        let mut s = snapshot("SIE.DE");
        s.country = Some(String::from("Germany"));
        s.exchange = Some(String::from("XETRA"));
        assert!(!is_adr_heuristic(&s));
    }
}
