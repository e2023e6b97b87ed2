use serde::Serialize;

use super::{RiskReport, StockSnapshot};

/// Outcome of screening a single ticker within a batch.
///
/// Exactly one side is populated: a successful screen carries the snapshot
/// and its risk report; a failed one carries an error message. The ticker is
/// kept as the raw display string so results for inputs that never parsed
/// into a valid [`super::Ticker`] are still representable.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub ticker: String,
    pub snapshot: Option<StockSnapshot>,
    pub report: Option<RiskReport>,
    pub error: Option<String>,
}

impl BatchResult {
    pub fn success(snapshot: StockSnapshot, report: RiskReport) -> Self {
        Self {
            ticker: snapshot.ticker.to_string(),
            snapshot: Some(snapshot),
            report: Some(report),
            error: None,
        }
    }

    pub fn failure(ticker: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            snapshot: None,
            report: None,
            error: Some(error.into()),
        }
    }

    /// Success is defined as "snapshot present".
    pub fn is_success(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Bundle a successful result for the presentation layer.
    pub fn screen_report(
        &self,
        float_threshold: u64,
        index_value: Option<f64>,
    ) -> Option<ScreenReport> {
        match (&self.snapshot, &self.report) {
            (Some(snapshot), Some(report)) => Some(ScreenReport::new(
                snapshot.clone(),
                report.clone(),
                float_threshold,
                index_value,
            )),
            _ => None,
        }
    }
}

/// Rendering-agnostic bundle handed to the presentation layer.
///
/// The core exposes the snapshot and report as-is; formatting into text,
/// JSON or CSV is the consumer's concern.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub snapshot: StockSnapshot,
    pub report: RiskReport,
    pub float_threshold: u64,
    pub index_value: Option<f64>,
}

impl ScreenReport {
    pub fn new(
        snapshot: StockSnapshot,
        report: RiskReport,
        float_threshold: u64,
        index_value: Option<f64>,
    ) -> Self {
        Self {
            snapshot,
            report,
            float_threshold,
            index_value,
        }
    }
}
