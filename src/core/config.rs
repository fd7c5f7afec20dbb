use crate::core::currency::{BASE_CURRENCY, DEFAULT_CURRENCIES};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchange_rate_api: Option<ExchangeRateApiConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rate_api: Some(ExchangeRateApiConfig {
                base_url: DEFAULT_RATES_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched rate table stays fresh
    pub ttl_secs: u64,
    /// Keep rates on disk so separate runs share them
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: 3600,
            persist: true,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub base_currency: String,
    pub currencies: Vec<String>,
    pub default_source: String,
    pub default_target: String,
    pub history_size: usize,
    pub cache: CacheConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            base_currency: BASE_CURRENCY.to_string(),
            currencies: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            default_source: "USD".to_string(),
            default_target: "PKR".to_string(),
            history_size: 5,
            cache: CacheConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or falls back to defaults
    /// when no file has been created there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn rates_base_url(&self) -> &str {
        self.providers
            .exchange_rate_api
            .as_ref()
            .map_or(DEFAULT_RATES_URL, |p| &p.base_url)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        let config = config.normalized()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn normalized(mut self) -> Result<Self> {
        self.base_currency = self.base_currency.to_uppercase();
        self.default_source = self.default_source.to_uppercase();
        self.default_target = self.default_target.to_uppercase();
        for code in self.currencies.iter_mut() {
            *code = code.to_uppercase();
        }

        if self.currencies.is_empty() {
            bail!("Config must list at least one currency");
        }
        for code in [&self.default_source, &self.default_target] {
            if !self.currencies.contains(code) {
                bail!("Default currency {code} is not in the configured currencies");
            }
        }
        if self.history_size == 0 {
            bail!("history_size must be greater than zero");
        }
        Ok(self)
    }
}
