//! Runtime configuration for screening, networking and display.

use std::time::Duration;

/// Default time-to-live for cache entries.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Recognized spellings of the United States for country comparisons.
pub const US_COUNTRY_VARIANTS: [&str; 5] = ["united states", "usa", "u.s.a.", "us", "u.s."];

/// Configurable thresholds for risk detection.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskThresholds {
    /// Country tokens matched by case-insensitive containment.
    pub risky_countries: Vec<String>,
    /// Headquarters keywords matched by case-insensitive containment.
    pub risky_hq_keywords: Vec<String>,
    /// Minimum float shares before the illiquidity flag fires.
    pub min_float_shares: u64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            risky_countries: vec![
                String::from("Russia"),
                String::from("China"),
                String::from("Iran"),
            ],
            risky_hq_keywords: vec![String::from("Cayman"), String::from("BVI")],
            min_float_shares: 3_000_000,
        }
    }
}

/// Outbound HTTP request configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: String::from("Mozilla/5.0 (compatible; tickervet/0.1)"),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Display formatting configuration for the text renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub summary_width: usize,
    pub label_width: usize,
    pub max_field_width: usize,
    /// Maximum number of directors fetched and shown per ticker.
    pub directors_max: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            summary_width: 70,
            label_width: 20,
            max_field_width: 40,
            directors_max: 10,
        }
    }
}
