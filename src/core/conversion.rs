//! Conversion arithmetic over a base-relative rate table.
use crate::core::currency::{RateTable, format_timestamp};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Smallest amount accepted for a conversion.
pub const MIN_AMOUNT: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Amount must be at least 0.01, got {0}")]
    InvalidAmount(f64),
    #[error("Currency is not supported: {0}")]
    UnsupportedCurrency(String),
    #[error("No exchange rates are available")]
    RatesUnavailable,
    #[error("No exchange rate found for currency: {0}")]
    MissingRate(String),
}

/// One completed conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    pub timestamp: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: f64,
}

impl ConversionRecord {
    pub fn timestamp_display(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// `"10.00 USD = 2780.00 PKR"`
    pub fn summary(&self) -> String {
        format!(
            "{:.2} {} = {:.2} {}",
            self.amount, self.from, self.result, self.to
        )
    }
}

/// Ratio that turns one unit of `from` into units of `to`.
///
/// Rates are relative to the table's base, so a pair of non-base currencies
/// is converted through the base.
pub fn effective_rate(rates: &RateTable, from: &str, to: &str) -> Result<f64, ConversionError> {
    if rates.is_empty() {
        return Err(ConversionError::RatesUnavailable);
    }
    let target = rates
        .rate(to)
        .ok_or_else(|| ConversionError::MissingRate(to.to_string()))?;
    if from == to {
        return Ok(1.0);
    }
    if from == rates.base() {
        return Ok(target);
    }
    let source = rates
        .rate(from)
        .ok_or_else(|| ConversionError::MissingRate(from.to_string()))?;
    Ok(target / source)
}

/// Converts `amount` of `from` into `to`. The result is not rounded.
pub fn convert(
    rates: &RateTable,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<f64, ConversionError> {
    if !amount.is_finite() || amount < MIN_AMOUNT {
        return Err(ConversionError::InvalidAmount(amount));
    }
    let rate = effective_rate(rates, from, to)?;
    Ok(amount * rate)
}
