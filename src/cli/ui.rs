use crate::core::{ConversionRecord, ConversionSession};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Spinner shown while waiting on the network.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Table of conversions, in the order given.
pub fn history_table<'a>(records: impl IntoIterator<Item = &'a ConversionRecord>) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Time"),
        header_cell("Amount"),
        header_cell("Converted"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.timestamp_display()),
            Cell::new(format!("{:.2} {}", record.amount, record.from))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2} {}", record.result, record.to))
                .add_attribute(Attribute::Bold)
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Rates of every offered currency against the session's base.
pub fn rates_table(session: &ConversionSession) -> Table {
    let base = session.rates().map_or("", |r| r.base()).to_string();
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Currency"),
        header_cell(&format!("Per 1 {base}")),
    ]);
    for code in session.supported() {
        let rate = session.rates().and_then(|r| r.rate(code));
        table.add_row(vec![
            Cell::new(code),
            format_optional_cell(rate, |r| format!("{r:.4}")),
        ]);
    }
    table
}

/// The "Rates last updated" line, if rates were ever loaded.
pub fn last_updated_line(session: &ConversionSession) -> Option<String> {
    session.last_updated_display().map(|ts| {
        style_text(&format!("Rates last updated: {ts}"), StyleType::Subtle)
    })
}

/// Everything shown after a conversion: result, fetch status and recent history.
pub fn render_session(session: &ConversionSession, history_size: usize) -> String {
    let mut output = String::new();

    if let Some(error) = session.fetch_error() {
        output.push_str(&style_text(error, StyleType::Error));
        output.push('\n');
    }

    let amount = session.converted_amount_display();
    let amount_style = if amount == "Conversion failed" {
        StyleType::Error
    } else if session.history().is_empty() {
        StyleType::Subtle
    } else {
        StyleType::Result
    };
    output.push_str(&format!("Result: {}\n", style_text(&amount, amount_style)));

    if let Some(line) = last_updated_line(session) {
        output.push_str(&line);
        output.push('\n');
    }

    if !session.history().is_empty() {
        output.push_str(&format!(
            "\n{}\n",
            style_text("Conversion Result & History", StyleType::Title)
        ));
        output.push_str(&history_table(session.recent_history(history_size)).to_string());
        output.push('\n');
    }

    output
}
