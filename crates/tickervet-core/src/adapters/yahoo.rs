//! Yahoo Finance quoteSummary adapter.
//!
//! Fetches the quoteSummary document for a ticker and maps it into a
//! [`StockSnapshot`] in one place. The payload is loosely typed on the wire
//! (most numbers arrive as `{"raw": ..., "fmt": ...}` objects); the DTOs
//! below keep that shape at the boundary and the mapping function converts
//! it into the strongly-typed snapshot, with every absent field staying
//! `None`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::{StockSnapshot, Ticker};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::{SnapshotSource, SourceError};

const QUOTE_SUMMARY_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SNAPSHOT_MODULES: &str =
    "assetProfile,price,summaryDetail,defaultKeyStatistics,financialData,cashflowStatementHistory";
const INDEX_TICKER: &str = "^VIX";

// ----------------------------------------------------------------------------
// Wire DTOs
// ----------------------------------------------------------------------------

/// Yahoo's `{"raw": 123.4, "fmt": "123.40"}` numeric wrapper.
#[derive(Debug, Default, Deserialize)]
struct RawNum {
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDate {
    raw: Option<i64>,
}

fn raw(field: &Option<RawNum>) -> Option<f64> {
    field.as_ref().and_then(|v| v.raw)
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetail>,
    default_key_statistics: Option<KeyStatistics>,
    financial_data: Option<FinancialData>,
    cashflow_statement_history: Option<CashflowHistory>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    country: Option<String>,
    country_of_origin: Option<String>,
    address1: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    website: Option<String>,
    full_time_employees: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    exchange_name: Option<String>,
    market: Option<String>,
    regular_market_price: Option<RawNum>,
    pre_market_price: Option<RawNum>,
    post_market_price: Option<RawNum>,
    regular_market_volume: Option<RawNum>,
    market_cap: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    fifty_two_week_high: Option<RawNum>,
    fifty_two_week_low: Option<RawNum>,
    average_volume_10days: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    shares_outstanding: Option<RawNum>,
    float_shares: Option<RawNum>,
    short_percent_of_float: Option<RawNum>,
    short_ratio: Option<RawNum>,
    held_percent_insiders: Option<RawNum>,
    held_percent_institutions: Option<RawNum>,
    last_split_factor: Option<String>,
    last_split_date: Option<RawDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    total_debt: Option<RawNum>,
    debt_to_equity: Option<RawNum>,
    operating_cashflow: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashflowHistory {
    cashflow_statements: Option<Vec<CashflowStatement>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashflowStatement {
    total_cash_from_operating_activities: Option<RawNum>,
}

// ----------------------------------------------------------------------------
// Split formatting
// ----------------------------------------------------------------------------

/// Interpret a split factor string such as "2:1" into a display fragment,
/// e.g. "2:1, split" or "1:10, reverse split".
fn interpret_split_factor(factor: Option<&str>) -> String {
    let Some(factor) = factor else {
        return String::new();
    };

    let mut parts = factor.split(':');
    let (Some(num), Some(den), None) = (parts.next(), parts.next(), parts.next()) else {
        return String::new();
    };

    let (Ok(num), Ok(den)) = (num.trim().parse::<u64>(), den.trim().parse::<u64>()) else {
        return String::new();
    };
    let den = if den == 0 { 1 } else { den };

    let kind = if num >= den { "split" } else { "reverse split" };
    format!("{num}:{den}, {kind}")
}

/// Format the last split as "YYYY-MM-DD (2:1, split)", either part optional.
fn format_last_split(factor: Option<&str>, unix_date: Option<i64>) -> String {
    let detail = interpret_split_factor(factor);
    if detail.is_empty() {
        return String::new();
    }

    let date = unix_date
        .filter(|ts| *ts > 0)
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .map(|dt| {
            let date = dt.date();
            format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            )
        });

    match date {
        Some(date) => format!("{date} ({detail})"),
        None => detail,
    }
}

// ----------------------------------------------------------------------------
// Mapping
// ----------------------------------------------------------------------------

/// Convert a quoteSummary result into a snapshot. The only mapping site
/// between the wire payload and the domain model.
fn map_snapshot(ticker: Ticker, result: QuoteSummaryResult) -> StockSnapshot {
    let mut snapshot = StockSnapshot::new(ticker);

    let profile = result.asset_profile.unwrap_or_default();
    snapshot.country = profile.country;
    snapshot.country_of_origin = profile.country_of_origin;
    snapshot.address1 = profile.address1;
    snapshot.city = profile.city;
    snapshot.state = profile.state;
    snapshot.zip_code = profile.zip;
    snapshot.sector = profile.sector;
    snapshot.industry = profile.industry;
    snapshot.website = profile.website;
    snapshot.full_time_employees = profile.full_time_employees;

    let price = result.price.unwrap_or_default();
    snapshot.long_name = price.long_name;
    snapshot.short_name = price.short_name;
    snapshot.exchange = price.exchange_name;
    snapshot.market = price.market;
    snapshot.regular_market_price = raw(&price.regular_market_price);
    snapshot.pre_market_price = raw(&price.pre_market_price);
    snapshot.post_market_price = raw(&price.post_market_price);
    snapshot.regular_market_volume = raw(&price.regular_market_volume);
    snapshot.market_cap = raw(&price.market_cap);

    let detail = result.summary_detail.unwrap_or_default();
    snapshot.fifty_two_week_high = raw(&detail.fifty_two_week_high);
    snapshot.fifty_two_week_low = raw(&detail.fifty_two_week_low);
    snapshot.average_volume_10days = raw(&detail.average_volume_10days);

    let statistics = result.default_key_statistics.unwrap_or_default();
    snapshot.shares_outstanding = raw(&statistics.shares_outstanding);
    snapshot.float_shares = raw(&statistics.float_shares);
    snapshot.short_percent_of_float = raw(&statistics.short_percent_of_float);
    snapshot.short_ratio = raw(&statistics.short_ratio);
    snapshot.held_percent_insiders = raw(&statistics.held_percent_insiders);
    snapshot.held_percent_institutions = raw(&statistics.held_percent_institutions);
    snapshot.last_split_date = statistics.last_split_date.as_ref().and_then(|d| d.raw);
    snapshot.last_split_display = format_last_split(
        statistics.last_split_factor.as_deref(),
        snapshot.last_split_date,
    );
    snapshot.last_split_factor = statistics.last_split_factor;

    let financial = result.financial_data.unwrap_or_default();
    snapshot.total_debt = raw(&financial.total_debt);
    snapshot.debt_to_equity = raw(&financial.debt_to_equity);

    // Prefer the financialData figure; fall back to the most recent
    // cashflow statement.
    snapshot.operating_cash_flow = raw(&financial.operating_cashflow).or_else(|| {
        result
            .cashflow_statement_history
            .and_then(|h| h.cashflow_statements)
            .and_then(|statements| statements.into_iter().next())
            .and_then(|s| s.total_cash_from_operating_activities)
            .and_then(|v| v.raw)
    });

    snapshot
}

// ----------------------------------------------------------------------------
// Adapter
// ----------------------------------------------------------------------------

/// Snapshot source backed by the Yahoo quoteSummary endpoint.
#[derive(Clone)]
pub struct YahooSnapshotAdapter {
    http_client: Arc<dyn HttpClient>,
}

impl YahooSnapshotAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    fn summary_url(symbol: &str, modules: &str) -> String {
        format!(
            "{QUOTE_SUMMARY_BASE}/{}?modules={modules}",
            urlencoding::encode(symbol)
        )
    }

    async fn fetch_summary(
        &self,
        symbol: &str,
        modules: &str,
    ) -> Result<QuoteSummaryResult, SourceError> {
        let request = HttpRequest::get(Self::summary_url(symbol, modules))
            .with_header("accept", "application/json");

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
        })?;

        if response.status == 404 {
            return Err(SourceError::not_found(format!(
                "yahoo has no data for {symbol}"
            )));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo upstream returned status {}",
                response.status
            )));
        }

        let envelope: QuoteSummaryEnvelope = serde_json::from_str(&response.body)
            .map_err(|error| SourceError::internal(format!("yahoo payload malformed: {error}")))?;

        envelope
            .quote_summary
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| SourceError::not_found(format!("yahoo returned no result for {symbol}")))
    }
}

impl SnapshotSource for YahooSnapshotAdapter {
    fn fetch_snapshot<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<StockSnapshot, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::info!(ticker = %ticker, "fetching snapshot from yahoo");
            let result = self.fetch_summary(ticker.as_str(), SNAPSHOT_MODULES).await?;
            Ok(map_snapshot(ticker.clone(), result))
        })
    }

    fn fetch_index_value<'a>(&'a self) -> Pin<Box<dyn Future<Output = Option<f64>> + Send + 'a>> {
        Box::pin(async move {
            match self.fetch_summary(INDEX_TICKER, "price").await {
                Ok(result) => result
                    .price
                    .as_ref()
                    .and_then(|p| raw(&p.regular_market_price)),
                Err(error) => {
                    tracing::warn!(error = %error, "volatility index fetch failed");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};

    struct StaticHttpClient {
        status: u16,
        body: String,
    }

    impl StaticHttpClient {
        fn ok(body: &str) -> Self {
            Self {
                status: 200,
                body: body.to_string(),
            }
        }
    }

    impl HttpClient for StaticHttpClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async move {
                Ok(HttpResponse {
                    status: self.status,
                    body: self.body.clone(),
                })
            })
        }
    }

    const SAMPLE: &str = r#"{
        "quoteSummary": {
            "result": [{
                "assetProfile": {
                    "country": "China",
                    "city": "Hangzhou",
                    "website": "https://example.test",
                    "fullTimeEmployees": 12345
                },
                "price": {
                    "longName": "Example Group Holding ADR",
                    "exchangeName": "NYSE",
                    "market": "us_market",
                    "regularMarketPrice": {"raw": 85.5, "fmt": "85.50"},
                    "regularMarketVolume": {"raw": 1000000, "fmt": "1M"}
                },
                "summaryDetail": {
                    "fiftyTwoWeekHigh": {"raw": 100.0, "fmt": "100.00"}
                },
                "defaultKeyStatistics": {
                    "floatShares": {"raw": 2500000, "fmt": "2.5M"},
                    "lastSplitFactor": "8:1",
                    "lastSplitDate": {"raw": 1406851200, "fmt": "2014-08-01"}
                },
                "financialData": {
                    "totalDebt": {"raw": 500000000, "fmt": "500M"}
                }
            }],
            "error": null
        }
    }"#;

    fn ticker(raw: &str) -> Ticker {
        Ticker::parse(raw).expect("valid ticker")
    }

    #[tokio::test]
    async fn maps_payload_into_snapshot() {
        let adapter = YahooSnapshotAdapter::new(Arc::new(StaticHttpClient::ok(SAMPLE)));
        let snapshot = adapter
            .fetch_snapshot(&ticker("BABA"))
            .await
            .expect("fetch should succeed");

        assert_eq!(snapshot.ticker.as_str(), "BABA");
        assert_eq!(snapshot.country.as_deref(), Some("China"));
        assert_eq!(snapshot.city.as_deref(), Some("Hangzhou"));
        assert_eq!(snapshot.exchange.as_deref(), Some("NYSE"));
        assert_eq!(snapshot.regular_market_price, Some(85.5));
        assert_eq!(snapshot.fifty_two_week_high, Some(100.0));
        assert_eq!(snapshot.float_shares, Some(2_500_000.0));
        assert_eq!(snapshot.total_debt, Some(500_000_000.0));
        assert_eq!(snapshot.last_split_display, "2014-08-01 (8:1, split)");
    }

    #[tokio::test]
    async fn absent_fields_stay_absent() {
        let adapter = YahooSnapshotAdapter::new(Arc::new(StaticHttpClient::ok(SAMPLE)));
        let snapshot = adapter
            .fetch_snapshot(&ticker("BABA"))
            .await
            .expect("fetch should succeed");

        // Not in the payload: must be None, not zero.
        assert_eq!(snapshot.pre_market_price, None);
        assert_eq!(snapshot.shares_outstanding, None);
        assert_eq!(snapshot.operating_cash_flow, None);
        assert_eq!(snapshot.state, None);
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let body = r#"{"quoteSummary": {"result": [], "error": null}}"#;
        let adapter = YahooSnapshotAdapter::new(Arc::new(StaticHttpClient::ok(body)));
        let error = adapter
            .fetch_snapshot(&ticker("NOPE"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), crate::source::SourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn upstream_failure_is_unavailable() {
        let adapter = YahooSnapshotAdapter::new(Arc::new(StaticHttpClient {
            status: 500,
            body: String::new(),
        }));
        let error = adapter
            .fetch_snapshot(&ticker("AAPL"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), crate::source::SourceErrorKind::Unavailable);
        assert!(error.retryable());
    }

    #[tokio::test]
    async fn index_fetch_degrades_to_none() {
        let adapter = YahooSnapshotAdapter::new(Arc::new(StaticHttpClient {
            status: 503,
            body: String::new(),
        }));
        assert_eq!(adapter.fetch_index_value().await, None);
    }

    #[test]
    fn split_factor_interpretation() {
        assert_eq!(interpret_split_factor(Some("2:1")), "2:1, split");
        assert_eq!(interpret_split_factor(Some("1:10")), "1:10, reverse split");
        assert_eq!(interpret_split_factor(Some("not-a-split")), "");
        assert_eq!(interpret_split_factor(None), "");
    }

    #[test]
    fn split_without_date_renders_detail_only() {
        assert_eq!(format_last_split(Some("3:2"), None), "3:2, split");
        assert_eq!(format_last_split(None, Some(1406851200)), "");
    }

    #[test]
    fn url_escapes_index_symbols() {
        let url = YahooSnapshotAdapter::summary_url("^VIX", "price");
        assert!(url.contains("%5EVIX"));
    }
}
