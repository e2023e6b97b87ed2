//! Secondary scrape source: Finviz quote pages for ADR detection and the
//! Yahoo profile page for directors.
//!
//! Everything here degrades: a network error, a non-200 status, or a page
//! without the expected tables yields `Undetermined` / an empty list, never
//! an error. The screening engine relies on that contract.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use scraper::{Html, Selector};

use crate::domain::{AdrVerdict, Ticker};
use crate::http_client::{HttpClient, HttpRequest};
use crate::source::ScrapeSource;

const FINVIZ_QUOTE_BASE: &str = "https://finviz.com/quote.ashx";
const YAHOO_PROFILE_BASE: &str = "https://finance.yahoo.com/quote";

/// Join the text nodes of every element matching `selector`.
fn selected_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .map(|el| {
            el.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inspect the Finviz header and snapshot tables for ADR markers.
fn adr_verdict_from_page(body: &str) -> AdrVerdict {
    let document = Html::parse_document(body);

    let Ok(title_selector) = Selector::parse("table.fullview-title") else {
        return AdrVerdict::Undetermined;
    };
    let Ok(snapshot_selector) = Selector::parse("table.snapshot-table2") else {
        return AdrVerdict::Undetermined;
    };

    let combined = format!(
        "{} {}",
        selected_text(&document, &title_selector),
        selected_text(&document, &snapshot_selector)
    )
    .trim()
    .to_lowercase();

    if combined.is_empty() {
        return AdrVerdict::Undetermined;
    }

    if combined.contains(" adr") || combined.contains("american depositary") {
        AdrVerdict::Adr
    } else {
        AdrVerdict::NotAdr
    }
}

/// Extract "{name} – {title}" entries for rows whose title mentions
/// "director", from the profile page's executives table.
fn directors_from_page(body: &str, max: usize) -> Vec<String> {
    let document = Html::parse_document(body);

    let Ok(row_selector) = Selector::parse("table tr") else {
        return Vec::new();
    };
    let Ok(cell_selector) = Selector::parse("td") else {
        return Vec::new();
    };

    let mut directors = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| {
                cell.text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        if cells.len() < 2 {
            continue;
        }

        let name = &cells[0];
        let title = &cells[1];
        if title.to_lowercase().contains("director") {
            directors.push(format!("{name} – {title}"));
        }

        if directors.len() >= max {
            break;
        }
    }

    directors
}

/// Scrape source backed by Finviz quote pages and Yahoo profile pages.
#[derive(Clone)]
pub struct FinvizScrapeAdapter {
    http_client: Arc<dyn HttpClient>,
}

impl FinvizScrapeAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

impl ScrapeSource for FinvizScrapeAdapter {
    fn check_adr<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = AdrVerdict> + Send + 'a>> {
        Box::pin(async move {
            let url = format!(
                "{FINVIZ_QUOTE_BASE}?t={}",
                urlencoding::encode(ticker.as_str())
            );
            tracing::info!(ticker = %ticker, "checking ADR status on finviz");

            let response = match self.http_client.execute(HttpRequest::get(url)).await {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(ticker = %ticker, error = %error, "finviz request failed");
                    return AdrVerdict::Undetermined;
                }
            };

            if !response.is_success() {
                tracing::warn!(
                    ticker = %ticker,
                    status = response.status,
                    "finviz returned non-success status"
                );
                return AdrVerdict::Undetermined;
            }

            adr_verdict_from_page(&response.body)
        })
    }

    fn fetch_directors<'a>(
        &'a self,
        ticker: &'a Ticker,
        max: usize,
    ) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!(
                "{YAHOO_PROFILE_BASE}/{}/profile/",
                urlencoding::encode(ticker.as_str())
            );
            tracing::info!(ticker = %ticker, "fetching directors");

            let response = match self.http_client.execute(HttpRequest::get(url)).await {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(ticker = %ticker, error = %error, "directors request failed");
                    return Vec::new();
                }
            };

            if !response.is_success() {
                tracing::warn!(
                    ticker = %ticker,
                    status = response.status,
                    "profile page returned non-success status"
                );
                return Vec::new();
            }

            let directors = directors_from_page(&response.body, max);
            tracing::debug!(ticker = %ticker, count = directors.len(), "directors extracted");
            directors
        })
    }
}
