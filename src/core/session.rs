//! Per-session conversion state: the current rate table, when it was fetched,
//! and the history of conversions performed in this session.
use crate::core::conversion::{self, ConversionError, ConversionRecord};
use crate::core::currency::{RateSnapshot, RateTable, format_timestamp};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
enum LastOutcome {
    Converted(f64),
    Failed,
}

#[derive(Debug)]
pub struct ConversionSession {
    supported: Vec<String>,
    rates: Option<RateTable>,
    last_updated: Option<DateTime<Utc>>,
    fetch_error: Option<String>,
    history: Vec<ConversionRecord>,
    last_outcome: Option<LastOutcome>,
}

impl ConversionSession {
    pub fn new(supported: Vec<String>) -> Self {
        Self {
            supported: supported.into_iter().map(|c| c.to_uppercase()).collect(),
            rates: None,
            last_updated: None,
            fetch_error: None,
            history: Vec::new(),
            last_outcome: None,
        }
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn last_updated_display(&self) -> Option<String> {
        self.last_updated.as_ref().map(format_timestamp)
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn history(&self) -> &[ConversionRecord] {
        &self.history
    }

    /// Takes the outcome of a rate fetch.
    ///
    /// A failed fetch clears the table but keeps the last-updated time and the
    /// history, so the user still sees when rates were last good.
    pub fn apply_fetch(&mut self, result: Result<RateSnapshot>) {
        match result {
            Ok(snapshot) => {
                let missing = snapshot.table.missing(&self.supported);
                if !missing.is_empty() {
                    warn!(?missing, "Rate table lacks some offered currencies");
                }
                debug!(
                    rates = snapshot.table.len(),
                    fetched_at = %snapshot.fetched_at,
                    "Loaded rate table into session"
                );
                self.rates = Some(snapshot.table);
                self.last_updated = Some(snapshot.fetched_at);
                self.fetch_error = None;
            }
            Err(e) => {
                debug!(error = %e, "Rate fetch failed, clearing session rates");
                self.rates = None;
                self.fetch_error = Some(format!("Error fetching exchange rates: {e}"));
            }
        }
    }

    /// Converts `amount` from one supported currency to another and records it.
    ///
    /// Nothing is recorded when the conversion fails.
    pub fn convert(
        &mut self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<&ConversionRecord, ConversionError> {
        match self.try_convert(amount, from, to) {
            Ok(record) => {
                self.last_outcome = Some(LastOutcome::Converted(record.result));
                self.history.push(record);
                Ok(&self.history[self.history.len() - 1])
            }
            Err(e) => {
                debug!(error = %e, amount, from, to, "Conversion failed");
                self.last_outcome = Some(LastOutcome::Failed);
                Err(e)
            }
        }
    }

    fn try_convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<ConversionRecord, ConversionError> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();
        for code in [&from, &to] {
            if !self.supported.contains(code) {
                return Err(ConversionError::UnsupportedCurrency(code.clone()));
            }
        }
        let rates = self.rates.as_ref().ok_or(ConversionError::RatesUnavailable)?;
        let result = conversion::convert(rates, amount, &from, &to)?;
        Ok(ConversionRecord {
            timestamp: Utc::now(),
            from,
            to,
            amount,
            result,
        })
    }

    /// The last `limit` conversions, newest first.
    pub fn recent_history(&self, limit: usize) -> impl Iterator<Item = &ConversionRecord> {
        self.history.iter().rev().take(limit)
    }

    /// The last conversion result as shown to the user.
    pub fn converted_amount_display(&self) -> String {
        match &self.last_outcome {
            None => "0.00".to_string(),
            Some(LastOutcome::Converted(result)) => format!("{result:.2}"),
            Some(LastOutcome::Failed) => "Conversion failed".to_string(),
        }
    }
}
