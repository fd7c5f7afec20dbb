use super::ui;
use crate::core::config::AppConfig;
use crate::core::{ConversionSession, RateProvider};
use anyhow::{Result, bail};

/// Prints the current rate of every offered currency.
pub async fn run(config: &AppConfig, source: &dyn RateProvider) -> Result<()> {
    let mut session = ConversionSession::new(config.currencies.clone());
    super::refresh_rates(&mut session, source).await;
    if let Some(error) = session.fetch_error() {
        bail!("{error}");
    }

    println!("{}", ui::rates_table(&session));
    if let Some(line) = ui::last_updated_line(&session) {
        println!("{line}");
    }
    Ok(())
}
