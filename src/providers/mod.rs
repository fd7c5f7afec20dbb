pub mod caching;
pub mod exchange_rate_api;

use crate::core::config::AppConfig;
use crate::store::RateCache;
use caching::CachingRateProvider;
use exchange_rate_api::ExchangeRateApiProvider;

/// The rate source the application uses: the HTTP provider behind the TTL cache.
pub type RateSource = CachingRateProvider<ExchangeRateApiProvider>;

pub fn rate_source(config: &AppConfig, cache: RateCache) -> RateSource {
    let provider = ExchangeRateApiProvider::new(config.rates_base_url(), &config.base_currency);
    CachingRateProvider::new(provider, cache, &config.base_currency, config.cache.ttl())
}
