use super::ui;
use crate::core::config::AppConfig;
use crate::core::{ConversionSession, RateProvider};
use anyhow::{Result, anyhow, bail};

/// Performs a single conversion and prints it.
pub async fn run(
    config: &AppConfig,
    source: &dyn RateProvider,
    amount: f64,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let mut session = ConversionSession::new(config.currencies.clone());
    super::refresh_rates(&mut session, source).await;
    if let Some(error) = session.fetch_error() {
        bail!("{error}");
    }

    let from = from.unwrap_or(config.default_source.as_str());
    let to = to.unwrap_or(config.default_target.as_str());
    let record = session
        .convert(amount, from, to)
        .map_err(|e| anyhow!(e).context("Conversion failed"))?;
    println!("{}", ui::style_text(&record.summary(), ui::StyleType::Result));

    if let Some(line) = ui::last_updated_line(&session) {
        println!("{line}");
    }
    Ok(())
}
