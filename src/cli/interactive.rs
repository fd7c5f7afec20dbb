//! Line-oriented conversion session.
//!
//! Every command first consults the rate source (served from cache while fresh),
//! then runs against the same `ConversionSession`, so history accumulates until
//! the user quits.
use super::ui;
use crate::core::config::AppConfig;
use crate::core::{ConversionSession, RateProvider};
use crate::providers::caching::CachingRateProvider;
use anyhow::{Result, anyhow, bail};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  convert [AMOUNT] [FROM] [TO]   convert, reusing the last amount and pair when omitted (alias: c)
  AMOUNT [FROM] [TO]             shorthand for convert
  history                        show recent conversions
  rates                          show rates for all offered currencies
  refresh                        discard cached rates and fetch them again
  help                           show this message
  quit                           leave the session (alias: exit)";

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Convert {
        amount: Option<f64>,
        from: Option<String>,
        to: Option<String>,
    },
    History,
    Rates,
    Refresh,
    Help,
    Quit,
}

/// Amount and pair used when a convert command leaves them out.
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    amount: f64,
    from: String,
    to: String,
}

impl Selection {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            amount: 1.0,
            from: config.default_source.clone(),
            to: config.default_target.clone(),
        }
    }
}

fn parse_convert_args(args: &[&str]) -> Result<SessionCommand> {
    let mut args = args.iter().peekable();
    let amount = match args.peek() {
        Some(first) if first.parse::<f64>().is_ok() => {
            let amount = first.parse::<f64>()?;
            args.next();
            Some(amount)
        }
        _ => None,
    };
    let from = args.next().map(|c| c.to_uppercase());
    let to = args.next().map(|c| c.to_uppercase());
    if let Some(extra) = args.next() {
        bail!("Unexpected argument: {extra}");
    }
    Ok(SessionCommand::Convert { amount, from, to })
}

fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "convert" | "c" => parse_convert_args(rest)?,
        "history" => SessionCommand::History,
        "rates" => SessionCommand::Rates,
        "refresh" => SessionCommand::Refresh,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        _ if head.parse::<f64>().is_ok() => parse_convert_args(&tokens)?,
        other => return Err(anyhow!("Unknown command: {other}. Type 'help' for commands")),
    };
    Ok(Some(command))
}

/// Runs the session on stdin until `quit` or end of input.
pub async fn run<T: RateProvider>(
    config: &AppConfig,
    source: &CachingRateProvider<T>,
) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_session(config, source, stdin).await.map(|_| ())
}

pub(crate) async fn run_session<T, R>(
    config: &AppConfig,
    source: &CachingRateProvider<T>,
    input: R,
) -> Result<ConversionSession>
where
    T: RateProvider,
    R: AsyncBufRead + Unpin,
{
    let mut session = ConversionSession::new(config.currencies.clone());
    let mut selection = Selection::from_config(config);

    println!(
        "{}",
        ui::style_text("Currency Converter", ui::StyleType::Title)
    );
    println!(
        "Offered currencies: {}",
        ui::style_text(&config.currencies.join(", "), ui::StyleType::Subtle)
    );
    println!("{HELP}\n");

    let mut lines = input.lines();
    loop {
        super::refresh_rates(&mut session, source).await;
        if let Some(error) = session.fetch_error() {
            println!("{}", ui::style_text(error, ui::StyleType::Error));
        }

        print!("{}", ui::style_text("> ", ui::StyleType::Subtle));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("Input closed, ending session");
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };
        debug!(?command, "Handling session command");

        match command {
            SessionCommand::Convert { amount, from, to } => {
                if let Some(amount) = amount {
                    selection.amount = amount;
                }
                if let Some(from) = from {
                    selection.from = from;
                }
                if let Some(to) = to {
                    selection.to = to;
                }
                let converted = session.convert(selection.amount, &selection.from, &selection.to);
                if let Err(e) = converted {
                    println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Subtle));
                }
                println!("{}", ui::render_session(&session, config.history_size));
            }
            SessionCommand::History => {
                if session.history().is_empty() {
                    println!("No conversions yet.");
                } else {
                    println!(
                        "{}",
                        ui::history_table(session.recent_history(config.history_size))
                    );
                }
            }
            SessionCommand::Rates => {
                println!("{}", ui::rates_table(&session));
                if let Some(line) = ui::last_updated_line(&session) {
                    println!("{line}");
                }
            }
            SessionCommand::Refresh => {
                source.invalidate().await;
                super::refresh_rates(&mut session, source).await;
                if session.fetch_error().is_none() {
                    if let Some(ts) = session.last_updated_display() {
                        println!("Rates refreshed at {ts}");
                    }
                }
            }
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => break,
        }
    }

    Ok(session)
}
