//! Structured JSON renderer.

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use tickervet_core::{BatchResult, ScreenReport};

use crate::error::CliError;

pub fn render(
    results: &[BatchResult],
    float_threshold: u64,
    index_value: Option<f64>,
) -> Result<(), CliError> {
    let document = if let [only] = results {
        result_document(only, float_threshold, index_value)
    } else {
        batch_document(results, float_threshold, index_value)
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn batch_document(results: &[BatchResult], float_threshold: u64, index_value: Option<f64>) -> Value {
    let successes = results.iter().filter(|r| r.is_success()).count();
    json!({
        "results": results
            .iter()
            .map(|r| result_document(r, float_threshold, index_value))
            .collect::<Vec<_>>(),
        "successes": successes,
        "failures": results.len() - successes,
    })
}

fn result_document(result: &BatchResult, float_threshold: u64, index_value: Option<f64>) -> Value {
    match result.screen_report(float_threshold, index_value) {
        Some(screen) => stock_document(&screen),
        None => json!({
            "ticker": result.ticker,
            "error": result.error,
        }),
    }
}

fn stock_document(screen: &ScreenReport) -> Value {
    let snapshot = &screen.snapshot;
    let report = &screen.report;
    json!({
        "ticker": snapshot.ticker.as_str(),
        "company": {
            "name": snapshot.display_name(),
            "short_name": snapshot.short_name,
            "exchange": snapshot.exchange,
            "sector": snapshot.sector,
            "industry": snapshot.industry,
            "website": snapshot.website,
            "employees": snapshot.full_time_employees,
        },
        "location": {
            "country": snapshot.country(),
            "headquarters": snapshot.headquarters(),
            "is_adr": snapshot.is_adr,
        },
        "price": {
            "current": snapshot.regular_market_price,
            "premarket": snapshot.pre_market_price,
            "postmarket": snapshot.post_market_price,
            "week_52_high": snapshot.fifty_two_week_high,
            "week_52_low": snapshot.fifty_two_week_low,
            "percent_off_52w_high": snapshot.percent_off_52week_high(),
            "last_split": if snapshot.last_split_display.is_empty() {
                Value::Null
            } else {
                Value::from(snapshot.last_split_display.clone())
            },
        },
        "shares": {
            "outstanding": snapshot.shares_outstanding,
            "float": snapshot.float_shares,
            "market_cap": snapshot.market_cap,
        },
        "volume": {
            "current": snapshot.regular_market_volume,
            "average_10day": snapshot.average_volume_10days,
            "relative_volume": snapshot.relative_volume().map(round2),
        },
        "ownership": {
            "insider_percent": to_percent(snapshot.held_percent_insiders),
            "institutional_percent": to_percent(snapshot.held_percent_institutions),
        },
        "short_interest": {
            "percent_of_float": to_percent(snapshot.short_percent_of_float),
            "ratio_days": snapshot.short_ratio,
        },
        "financials": {
            "total_debt": snapshot.total_debt,
            "debt_to_equity": snapshot.debt_to_equity,
            "operating_cash_flow": snapshot.operating_cash_flow,
        },
        "executives": snapshot.directors,
        "risk_analysis": {
            "has_risks": report.has_risks(),
            "flags": report
                .flags()
                .iter()
                .map(|flag| json!({
                    "type": flag.category.as_str(),
                    "message": flag.message,
                    "severity": flag.severity.as_str(),
                }))
                .collect::<Vec<_>>(),
        },
        "vix": screen.index_value,
        "timestamp": timestamp(),
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Convert a decimal fraction (0.15) to a percentage (15.0), two decimals.
fn to_percent(v: Option<f64>) -> Option<f64> {
    v.map(|v| round2(v * 100.0))
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
