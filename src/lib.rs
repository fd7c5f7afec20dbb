pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
    },
    Rates,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rate_cache = store::open_rate_cache(&config);
    let rate_source = providers::rate_source(&config, rate_cache);

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(
                &config,
                &rate_source,
                amount,
                from.as_deref(),
                to.as_deref(),
            )
            .await
        }
        AppCommand::Rates => cli::rates::run(&config, &rate_source).await,
        AppCommand::Interactive => cli::interactive::run(&config, &rate_source).await,
    }
}
