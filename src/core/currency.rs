//! Exchange rate abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency every fetched rate is expressed against.
pub const BASE_CURRENCY: &str = "USD";

/// Currencies offered for conversion unless the config says otherwise.
pub const DEFAULT_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "PKR", "SAR", "AED", "MYR",
];

/// Display format for fetch and conversion timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Units of each currency per one unit of the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Builds a table, dropping any rate that is not a positive finite number.
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        let rates = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .collect();
        Self {
            base: base.to_uppercase(),
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rate for `code`. The base currency is 1.0 even when the source omits it.
    pub fn rate(&self, code: &str) -> Option<f64> {
        match self.rates.get(code) {
            Some(rate) => Some(*rate),
            None if code == self.base => Some(1.0),
            None => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Codes from `offered` that this table cannot convert.
    pub fn missing<'a>(&self, offered: &'a [String]) -> Vec<&'a str> {
        offered
            .iter()
            .map(String::as_str)
            .filter(|code| self.rate(code).is_none())
            .collect()
    }
}

/// A rate table together with the instant it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub table: RateTable,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(table: RateTable) -> Self {
        Self {
            table,
            fetched_at: Utc::now(),
        }
    }
}

/// Formats a timestamp in local time for display.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> RateTable {
        RateTable::new(
            "USD",
            entries.iter().map(|(c, r)| (c.to_string(), *r)).collect(),
        )
    }

    #[test]
    fn test_base_rate_is_implicit() {
        let t = table(&[("EUR", 0.9)]);
        assert_eq!(t.rate("USD"), Some(1.0));
        assert_eq!(t.rate("EUR"), Some(0.9));
        assert_eq!(t.rate("PKR"), None);
    }

    #[test]
    fn test_invalid_rates_are_dropped() {
        let t = table(&[("EUR", 0.9), ("BAD", 0.0), ("NEG", -1.0), ("NAN", f64::NAN)]);
        assert_eq!(t.len(), 1);
        assert!(t.rate("BAD").is_none());
        assert!(t.rate("NEG").is_none());
        assert!(t.rate("NAN").is_none());
    }

    #[test]
    fn test_missing_codes() {
        let t = table(&[("USD", 1.0), ("EUR", 0.9)]);
        let offered: Vec<String> = DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect();
        let missing = t.missing(&offered);
        assert_eq!(missing.len(), 8);
        assert!(!missing.contains(&"USD"));
        assert!(!missing.contains(&"EUR"));
        assert!(missing.contains(&"PKR"));
    }
}
