//! Rule-based risk classification of stock snapshots.
//!
//! Evaluation is deterministic and side-effect free: the analyzer reads a
//! snapshot and produces a fresh report. The four rule groups run
//! unconditionally and never short-circuit each other; flags are
//! concatenated in the fixed order country, headquarters, float, ADR.

use crate::config::{RiskThresholds, US_COUNTRY_VARIANTS};
use crate::domain::{RiskCategory, RiskFlag, RiskReport, RiskSeverity, StockSnapshot};

/// Case-insensitive containment of any pattern in `value`.
///
/// Containment, not equality: "Russian Federation" matches a "Russia"
/// pattern and "People's Republic of China" matches "China".
fn contains_any(value: &str, patterns: &[String]) -> bool {
    if value.is_empty() {
        return false;
    }
    let value = value.to_lowercase();
    patterns.iter().any(|p| value.contains(&p.to_lowercase()))
}

fn is_us_country(country: &str) -> bool {
    let country = country.trim().to_lowercase();
    US_COUNTRY_VARIANTS.contains(&country.as_str())
}

/// Analyzer for detecting structural risk factors in a stock.
#[derive(Debug, Clone, Default)]
pub struct RiskAnalyzer {
    thresholds: RiskThresholds,
}

impl RiskAnalyzer {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Country-of-origin checks. Skipped entirely when no country is known;
    /// otherwise the red-flag-list and non-US checks fire independently and
    /// may both produce a flag.
    pub fn country_flags(&self, snapshot: &StockSnapshot) -> Vec<RiskFlag> {
        let mut flags = Vec::new();
        let country = snapshot.country();

        if country.is_empty() {
            return flags;
        }

        if contains_any(country, &self.thresholds.risky_countries) {
            flags.push(RiskFlag::new(
                RiskCategory::Country,
                "Country of origin is in red-flag list",
                RiskSeverity::High,
            ));
        }

        if !is_us_country(country) {
            flags.push(RiskFlag::new(
                RiskCategory::Country,
                "Country of origin is non-US",
                RiskSeverity::Medium,
            ));
        }

        flags
    }

    /// Offshore-headquarters keyword check (e.g. Cayman, BVI).
    pub fn headquarters_flags(&self, snapshot: &StockSnapshot) -> Vec<RiskFlag> {
        let mut flags = Vec::new();
        let headquarters = snapshot.headquarters();

        if headquarters.is_empty() {
            return flags;
        }

        if contains_any(&headquarters, &self.thresholds.risky_hq_keywords) {
            flags.push(RiskFlag::new(
                RiskCategory::Headquarters,
                "Headquarters location includes red-flag keywords",
                RiskSeverity::High,
            ));
        }

        flags
    }

    /// Low-float illiquidity check. A float exactly at the threshold does
    /// not flag; a missing float never flags.
    pub fn float_flags(&self, snapshot: &StockSnapshot) -> Vec<RiskFlag> {
        let mut flags = Vec::new();

        if let Some(float_shares) = snapshot.float_shares {
            if float_shares < self.thresholds.min_float_shares as f64 {
                flags.push(RiskFlag::new(
                    RiskCategory::Float,
                    format!(
                        "Float below {:.1}M shares",
                        self.thresholds.min_float_shares as f64 / 1_000_000.0
                    ),
                    RiskSeverity::Medium,
                ));
            }
        }

        flags
    }

    /// ADR check against the snapshot's resolved ADR flag.
    pub fn adr_flags(&self, snapshot: &StockSnapshot) -> Vec<RiskFlag> {
        let mut flags = Vec::new();

        if snapshot.is_adr {
            flags.push(RiskFlag::new(
                RiskCategory::Adr,
                "ADR/listed foreign issuer",
                RiskSeverity::Medium,
            ));
        }

        flags
    }

    /// Run every rule group and collect the flags in detection order.
    pub fn analyze(&self, snapshot: &StockSnapshot) -> RiskReport {
        let mut report = RiskReport::new(snapshot.ticker.clone());

        for flag in self
            .country_flags(snapshot)
            .into_iter()
            .chain(self.headquarters_flags(snapshot))
            .chain(self.float_flags(snapshot))
            .chain(self.adr_flags(snapshot))
        {
            report.push(flag);
        }

        tracing::debug!(
            ticker = %snapshot.ticker,
            flags = report.flags().len(),
            "risk analysis complete"
        );

        report
    }
}
