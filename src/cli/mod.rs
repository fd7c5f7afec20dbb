pub mod convert;
pub mod interactive;
pub mod rates;
pub mod setup;
pub mod ui;

use crate::core::{ConversionSession, RateProvider};

/// Consults the rate source and hands the outcome to the session.
pub(crate) async fn refresh_rates(session: &mut ConversionSession, source: &dyn RateProvider) {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = source.fetch_rates().await;
    pb.finish_and_clear();
    session.apply_fetch(result);
}
