use serde::{Deserialize, Serialize};

use super::Ticker;

/// Severity of a detected risk, ordered by ascending concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Category of a detected risk. Closed set; rules emit exactly these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Country,
    Headquarters,
    Float,
    Adr,
}

impl RiskCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Headquarters => "headquarters",
            Self::Float => "float",
            Self::Adr => "adr",
        }
    }
}

/// One detected concern. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub category: RiskCategory,
    pub message: String,
    pub severity: RiskSeverity,
}

impl RiskFlag {
    pub fn new(category: RiskCategory, message: impl Into<String>, severity: RiskSeverity) -> Self {
        Self {
            category,
            message: message.into(),
            severity,
        }
    }
}

/// Ordered risk report for one ticker.
///
/// Flag order is detection order: country, headquarters, float, ADR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    ticker: Ticker,
    flags: Vec<RiskFlag>,
}

impl RiskReport {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            flags: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn flags(&self) -> &[RiskFlag] {
        &self.flags
    }

    pub fn has_risks(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn flags_by_severity(&self, severity: RiskSeverity) -> Vec<&RiskFlag> {
        self.flags.iter().filter(|f| f.severity == severity).collect()
    }

    /// Append a flag during evaluation. The report is otherwise immutable.
    pub fn push(&mut self, flag: RiskFlag) {
        self.flags.push(flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_concern() {
        assert!(RiskSeverity::Low < RiskSeverity::Medium);
        assert!(RiskSeverity::Medium < RiskSeverity::High);
    }

    #[test]
    fn report_tracks_flags_in_insertion_order() {
        let mut report = RiskReport::new(Ticker::parse("ACME").expect("valid"));
        assert!(!report.has_risks());

        report.push(RiskFlag::new(
            RiskCategory::Country,
            "Country of origin is non-US",
            RiskSeverity::Medium,
        ));
        report.push(RiskFlag::new(
            RiskCategory::Adr,
            "ADR/listed foreign issuer",
            RiskSeverity::Medium,
        ));

        assert!(report.has_risks());
        assert_eq!(report.flags()[0].category, RiskCategory::Country);
        assert_eq!(report.flags()[1].category, RiskCategory::Adr);
        assert_eq!(report.flags_by_severity(RiskSeverity::Medium).len(), 2);
        assert!(report.flags_by_severity(RiskSeverity::High).is_empty());
    }
}
