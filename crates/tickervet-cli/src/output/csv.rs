//! Spreadsheet-compatible CSV renderer.
//!
//! One header row plus one data row per ticker. Batch output appends an
//! `error` column; failed tickers carry only their symbol and the error.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use tickervet_core::{BatchResult, ScreenReport};

use crate::error::CliError;

const COLUMNS: [&str; 35] = [
    "ticker",
    "company_name",
    "exchange",
    "sector",
    "industry",
    "country",
    "headquarters",
    "is_adr",
    "market_cap",
    "price_current",
    "price_premarket",
    "price_postmarket",
    "week_52_high",
    "week_52_low",
    "percent_off_52w_high",
    "last_split",
    "shares_outstanding",
    "float_shares",
    "volume_current",
    "volume_avg_10day",
    "relative_volume",
    "insider_ownership_pct",
    "institutional_ownership_pct",
    "short_pct_of_float",
    "short_ratio_days",
    "total_debt",
    "debt_to_equity",
    "operating_cash_flow",
    "employees",
    "website",
    "has_risk_flags",
    "risk_flag_count",
    "risk_flags",
    "vix",
    "timestamp",
];

pub fn render(
    results: &[BatchResult],
    float_threshold: u64,
    index_value: Option<f64>,
) -> Result<(), CliError> {
    println!("{}", document(results, float_threshold, index_value));
    Ok(())
}

/// Build the whole CSV document. Single results keep the plain column set;
/// batches gain a trailing `error` column.
pub fn document(results: &[BatchResult], float_threshold: u64, index_value: Option<f64>) -> String {
    let batch = results.len() > 1;
    let mut lines = Vec::with_capacity(results.len() + 1);

    let mut header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    if batch {
        header.push(String::from("error"));
    }
    lines.push(header.join(","));

    for result in results {
        let mut values = match result.screen_report(float_threshold, index_value) {
            Some(screen) => row_values(&screen),
            None => {
                let mut row = vec![escape(&result.ticker)];
                row.extend(std::iter::repeat(String::new()).take(COLUMNS.len() - 1));
                row
            }
        };

        if batch {
            values.push(
                result
                    .error
                    .as_deref()
                    .map(escape)
                    .unwrap_or_default(),
            );
        }

        lines.push(values.join(","));
    }

    lines.join("\n")
}

fn row_values(screen: &ScreenReport) -> Vec<String> {
    let snapshot = &screen.snapshot;
    let report = &screen.report;
    let risk_flags = report
        .flags()
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    vec![
        escape(snapshot.ticker.as_str()),
        escape(snapshot.display_name()),
        escape(snapshot.exchange.as_deref().unwrap_or("")),
        escape(snapshot.sector.as_deref().unwrap_or("")),
        escape(snapshot.industry.as_deref().unwrap_or("")),
        escape(snapshot.country()),
        escape(&snapshot.headquarters()),
        bool_value(snapshot.is_adr),
        number(snapshot.market_cap),
        number(snapshot.regular_market_price),
        number(snapshot.pre_market_price),
        number(snapshot.post_market_price),
        number(snapshot.fifty_two_week_high),
        number(snapshot.fifty_two_week_low),
        number(snapshot.percent_off_52week_high()),
        escape(&snapshot.last_split_display),
        number(snapshot.shares_outstanding),
        number(snapshot.float_shares),
        number(snapshot.regular_market_volume),
        number(snapshot.average_volume_10days),
        number(snapshot.relative_volume().map(round2)),
        number(to_percent(snapshot.held_percent_insiders)),
        number(to_percent(snapshot.held_percent_institutions)),
        number(to_percent(snapshot.short_percent_of_float)),
        number(snapshot.short_ratio),
        number(snapshot.total_debt),
        number(snapshot.debt_to_equity),
        number(snapshot.operating_cash_flow),
        snapshot
            .full_time_employees
            .map(|e| e.to_string())
            .unwrap_or_default(),
        escape(snapshot.website.as_deref().unwrap_or("")),
        bool_value(report.has_risks()),
        report.flags().len().to_string(),
        escape(&risk_flags),
        number(screen.index_value),
        escape(&timestamp()),
    ]
}

/// Quote a field when it contains a separator, quote or newline; double any
/// embedded quotes.
fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn bool_value(value: bool) -> String {
    value.to_string()
}

/// Numbers print with four decimals when fractional, bare when integral.
fn number(value: Option<f64>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if value == value.trunc() {
        format!("{}", value as i64)
    } else {
        format!("{value:.4}")
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn to_percent(v: Option<f64>) -> Option<f64> {
    v.map(|v| round2(v * 100.0))
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
