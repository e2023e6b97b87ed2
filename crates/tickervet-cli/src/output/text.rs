//! ANSI-colored terminal summary renderer.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use tickervet_core::{
    BatchResult, DisplayConfig, RiskReport, ScreenReport, StockSnapshot, US_COUNTRY_VARIANTS,
};

use crate::error::CliError;

pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const UNDERLINE: &str = "\x1b[4m";
    pub const NEGATIVE: &str = "\x1b[7m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const LIGHT_GREEN: &str = "\x1b[1;32m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
}

const HORIZONTAL_LINE: &str = "─";

pub fn render(
    results: &[BatchResult],
    float_threshold: u64,
    index_value: Option<f64>,
) -> Result<(), CliError> {
    for result in results {
        match result.screen_report(float_threshold, index_value) {
            Some(screen) => println!("{}", summary(&screen)),
            None => {
                eprintln!(
                    "Error: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
    Ok(())
}

/// Build the full colored summary for one screened stock.
pub fn summary(screen: &ScreenReport) -> String {
    let snapshot = &screen.snapshot;
    let report = &screen.report;
    let display = DisplayConfig::default();
    let mut sections = vec![
        header(snapshot.ticker.as_str(), display.summary_width),
        risk_flag_line(report),
        basic_info(snapshot),
        headquarters_lines(snapshot, display.max_field_width),
        ownership_info(snapshot),
        price_info(snapshot),
        trading_info(snapshot, screen.float_threshold),
        financial_info(snapshot),
        company_info(snapshot),
        labeled("As Of (UTC)", &timestamp()),
    ];

    if let Some(vix) = screen.index_value {
        sections.push(labeled("VIX", &format_vix(vix)));
    }

    sections.push(String::new());
    sections.push(executives(&snapshot.directors));
    sections.push(HORIZONTAL_LINE.repeat(display.summary_width));

    if report.has_risks() {
        sections.push(risk_details(report));
    }

    sections.join("\n")
}

fn field_label(name: &str) -> String {
    let dashes = 20usize.saturating_sub(name.len());
    format!("{name} {}", "-".repeat(dashes))
}

fn labeled(name: &str, value: &str) -> String {
    format!("{} : {value}", field_label(name))
}

/// Format a number with magnitude suffixes (K, M, B).
fn format_number(n: Option<f64>) -> String {
    let Some(n) = n else {
        return String::new();
    };
    let abs = n.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.2}B", n / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.2}K", n / 1_000.0)
    } else {
        format!("{n}")
    }
}

fn format_percent(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}%")).unwrap_or_default()
}

fn format_price(v: Option<f64>) -> String {
    v.map(|v| format!("${v:.2}")).unwrap_or_default()
}

fn format_ownership(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}%", v * 100.0)).unwrap_or_default()
}

fn is_us_country(country: &str) -> bool {
    US_COUNTRY_VARIANTS.contains(&country.trim().to_lowercase().as_str())
}

fn colorize_country(country: &str) -> String {
    if country.is_empty() {
        return String::new();
    }
    if !is_us_country(country) {
        format!("{}{country}{}", ansi::RED, ansi::RESET)
    } else {
        country.to_string()
    }
}

fn colorize_adr_status(is_adr: bool) -> String {
    if is_adr {
        format!("{}Is ADR - YES{}", ansi::RED, ansi::RESET)
    } else {
        String::from("No")
    }
}

fn colorize_float(float_shares: Option<f64>, threshold: u64) -> String {
    let formatted = format_number(float_shares);
    match float_shares {
        Some(shares) if shares < threshold as f64 => {
            format!("{}{formatted}{}", ansi::RED, ansi::RESET)
        }
        _ => formatted,
    }
}

fn format_relative_volume(rvol: Option<f64>) -> String {
    let Some(rvol) = rvol else {
        return String::new();
    };
    let text = format!("{rvol:.2}x");
    if rvol >= 1.5 {
        format!("{}{text}{}", ansi::LIGHT_GREEN, ansi::RESET)
    } else if rvol < 0.5 {
        format!("{}{text}{}", ansi::YELLOW, ansi::RESET)
    } else {
        text
    }
}

/// VIX bands: green below 15, yellow below 25, red otherwise.
fn format_vix(vix: f64) -> String {
    let text = format!("{vix:.2}");
    if vix >= 25.0 {
        format!("{}{text}{}", ansi::RED, ansi::RESET)
    } else if vix >= 15.0 {
        format!("{}{text}{}", ansi::YELLOW, ansi::RESET)
    } else {
        format!("{}{text}{}", ansi::LIGHT_GREEN, ansi::RESET)
    }
}

fn header(ticker: &str, width: usize) -> String {
    let line = HORIZONTAL_LINE.repeat(width);
    let visible = format!(" - {ticker} - ");
    let pad = width.saturating_sub(visible.chars().count());
    let left = pad / 2;
    let title = format!(
        "{} - {}{ticker}{} - ",
        " ".repeat(left),
        ansi::NEGATIVE,
        ansi::RESET
    );
    format!("\n{line}\n{title}\n{line}")
}

fn risk_flag_line(report: &RiskReport) -> String {
    let flag_text = if report.has_risks() {
        format!("{}!  POTENTIAL HIGH RISKS !{}", ansi::RED, ansi::RESET)
    } else {
        format!("{}No Major Flags Detected{}", ansi::BRIGHT_BLUE, ansi::RESET)
    };
    labeled("FLAG RISK", &flag_text)
}

fn basic_info(snapshot: &StockSnapshot) -> String {
    [
        labeled("Company", snapshot.display_name()),
        format!(
            "{}{} : {}{}",
            ansi::BRIGHT_BLUE,
            field_label("Stock Symbol"),
            snapshot.ticker,
            ansi::RESET
        ),
        labeled("Exchange", snapshot.exchange.as_deref().unwrap_or("")),
        labeled("ADR", &colorize_adr_status(snapshot.is_adr)),
        labeled("Country of Origin", &colorize_country(snapshot.country())),
    ]
    .join("\n")
}

/// Headquarters with wrapping at the field width; non-US locations render
/// in yellow.
fn headquarters_lines(snapshot: &StockSnapshot, max_width: usize) -> String {
    let hq = snapshot.headquarters();
    let non_us = !hq.is_empty()
        && !US_COUNTRY_VARIANTS
            .iter()
            .any(|us| hq.to_lowercase().contains(us));

    let colorize = |segment: &str| {
        if non_us {
            format!("{}{segment}{}", ansi::YELLOW, ansi::RESET)
        } else {
            segment.to_string()
        }
    };

    if hq.chars().count() <= max_width {
        return labeled("Headquarters", &colorize(&hq));
    }

    let limit = hq
        .char_indices()
        .nth(max_width + 1)
        .map(|(i, _)| i)
        .unwrap_or(hq.len());
    let break_pos = hq[..limit].rfind(' ').unwrap_or(limit);

    let first = hq[..break_pos].trim_end();
    let remainder = hq[break_pos..].trim_start();

    let mut result = labeled("Headquarters", &colorize(first));
    if !remainder.is_empty() {
        result.push_str(&format!("\n{}{}", " ".repeat(24), colorize(remainder)));
    }
    result
}

fn ownership_info(snapshot: &StockSnapshot) -> String {
    [
        labeled("Market Cap", &format_number(snapshot.market_cap)),
        labeled(
            "Insider Ownership",
            &format_ownership(snapshot.held_percent_insiders),
        ),
        labeled(
            "Institutional Own.",
            &format_ownership(snapshot.held_percent_institutions),
        ),
    ]
    .join("\n")
}

fn price_info(snapshot: &StockSnapshot) -> String {
    [
        labeled("Price (Market Hrs)", &format_price(snapshot.price())),
        labeled("Premarket Price", &format_price(snapshot.pre_market_price)),
        labeled(
            "Aftermarket Price",
            &format_price(snapshot.post_market_price),
        ),
        labeled("Last Split", &snapshot.last_split_display),
        labeled("52W High", &format_price(snapshot.fifty_two_week_high)),
        labeled("52W Low", &format_price(snapshot.fifty_two_week_low)),
        labeled(
            "% Off 52W High",
            &format_percent(snapshot.percent_off_52week_high()),
        ),
    ]
    .join("\n")
}

fn trading_info(snapshot: &StockSnapshot, float_threshold: u64) -> String {
    let avg_volume = format_number(snapshot.average_volume_10days);
    let rvol = format_relative_volume(snapshot.relative_volume());
    let volume_line = if rvol.is_empty() {
        labeled("Avg Volume (10D)", &avg_volume)
    } else {
        labeled("Avg Volume (10D)", &format!("{avg_volume} (RVOL: {rvol})"))
    };

    [
        volume_line,
        labeled(
            "Shares Outstanding",
            &format_number(snapshot.shares_outstanding),
        ),
        labeled(
            "Float",
            &colorize_float(snapshot.float_shares, float_threshold),
        ),
        labeled(
            "Short % of Float",
            &format_ownership(snapshot.short_percent_of_float),
        ),
        labeled(
            "Short Ratio (days)",
            &snapshot
                .short_ratio
                .map(|r| format!("{r:.2}"))
                .unwrap_or_default(),
        ),
    ]
    .join("\n")
}

fn financial_info(snapshot: &StockSnapshot) -> String {
    let cash_flow = snapshot
        .operating_cash_flow
        .map(|cf| {
            let label = if cf >= 0.0 { "Positive" } else { "Negative" };
            format!("{label} ({})", format_number(Some(cf)))
        })
        .unwrap_or_default();

    [
        labeled("Debt", &format_number(snapshot.total_debt)),
        labeled("Cash Flow (oper.)", &cash_flow),
    ]
    .join("\n")
}

fn company_info(snapshot: &StockSnapshot) -> String {
    [
        labeled(
            "Employee Count",
            &snapshot
                .full_time_employees
                .map(|e| e.to_string())
                .unwrap_or_default(),
        ),
        labeled("Homepage", snapshot.website.as_deref().unwrap_or("")),
    ]
    .join("\n")
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn executives(directors: &[String]) -> String {
    let mut lines = vec![String::from("Key Executives:")];
    if directors.is_empty() {
        lines.push(String::from(" - (none found)"));
    } else {
        for director in directors {
            lines.push(format!(" - {director}"));
        }
    }
    lines.join("\n")
}

fn risk_details(report: &RiskReport) -> String {
    let mut lines = vec![format!(
        "{}RED FLAGS:{} - {}{}{}",
        ansi::UNDERLINE,
        ansi::RESET,
        ansi::NEGATIVE,
        report.ticker(),
        ansi::RESET
    )];

    for flag in report.flags() {
        lines.push(format!(" [!] -> {}", flag.message));
    }

    lines.join("\n")
}
