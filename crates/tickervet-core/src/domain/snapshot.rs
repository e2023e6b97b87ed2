use serde::{Deserialize, Serialize};

use super::Ticker;

/// Company and market snapshot for one ticker at one point in time.
///
/// Every financial field is optional: absence means the source had no value,
/// which is a legitimate state distinct from zero. The mapping from the
/// provider's loosely-typed payload into this struct happens once, at the
/// adapter boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub ticker: Ticker,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub country: Option<String>,
    pub country_of_origin: Option<String>,
    pub address1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub exchange: Option<String>,
    pub market: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub pre_market_price: Option<f64>,
    pub post_market_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub average_volume_10days: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub float_shares: Option<f64>,
    pub total_debt: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub full_time_employees: Option<u32>,
    pub website: Option<String>,
    pub short_percent_of_float: Option<f64>,
    pub short_ratio: Option<f64>,
    pub held_percent_insiders: Option<f64>,
    pub held_percent_institutions: Option<f64>,
    pub last_split_factor: Option<String>,
    pub last_split_date: Option<i64>,
    pub operating_cash_flow: Option<f64>,
    pub last_split_display: String,
    pub is_adr: bool,
    pub directors: Vec<String>,
}

impl StockSnapshot {
    /// Create an empty snapshot for a ticker, with every field absent.
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            long_name: None,
            short_name: None,
            country: None,
            country_of_origin: None,
            address1: None,
            city: None,
            state: None,
            zip_code: None,
            exchange: None,
            market: None,
            sector: None,
            industry: None,
            market_cap: None,
            regular_market_price: None,
            pre_market_price: None,
            post_market_price: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            average_volume_10days: None,
            regular_market_volume: None,
            shares_outstanding: None,
            float_shares: None,
            total_debt: None,
            debt_to_equity: None,
            full_time_employees: None,
            website: None,
            short_percent_of_float: None,
            short_ratio: None,
            held_percent_insiders: None,
            held_percent_institutions: None,
            last_split_factor: None,
            last_split_date: None,
            operating_cash_flow: None,
            last_split_display: String::new(),
            is_adr: false,
            directors: Vec::new(),
        }
    }

    /// Country of origin, preferring `country` over `country_of_origin`.
    pub fn country(&self) -> &str {
        self.country
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.country_of_origin.as_deref())
            .unwrap_or("")
    }

    /// Full headquarters address joined from the non-empty components.
    pub fn headquarters(&self) -> String {
        let country = self.country();
        let parts = [
            self.address1.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip_code.as_deref(),
            if country.is_empty() { None } else { Some(country) },
        ];
        parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Display name, preferring `long_name` over `short_name`.
    pub fn display_name(&self) -> &str {
        self.long_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.short_name.as_deref())
            .unwrap_or("")
    }

    /// Regular market price.
    pub fn price(&self) -> Option<f64> {
        self.regular_market_price
    }

    /// Percentage off the 52-week high, e.g. -15.5 for 15.5% below the high.
    ///
    /// Defined only when both the price and a strictly positive high are
    /// present; a zero or missing high yields `None`, never a division.
    pub fn percent_off_52week_high(&self) -> Option<f64> {
        let price = self.price()?;
        let high = self.fifty_two_week_high?;
        if high > 0.0 {
            Some((price / high - 1.0) * 100.0)
        } else {
            None
        }
    }

    /// Relative volume: current volume over the 10-day average.
    pub fn relative_volume(&self) -> Option<f64> {
        let current = self.regular_market_volume?;
        let average = self.average_volume_10days?;
        if average > 0.0 {
            Some(current / average)
        } else {
            None
        }
    }
}
