//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use workbench_lib::api::Impact;
use workbench_lib::presenter::ProbabilityBand;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name as stored in the config file
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render rows as a rounded table
pub fn render_table<T: tabled::Tabled>(rows: Vec<T>) -> String {
    tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string()
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color text by probability band
pub fn color_band(band: ProbabilityBand, text: &str) -> String {
    match band {
        ProbabilityBand::VeryHigh => text.green().to_string(),
        ProbabilityBand::Good => text.blue().to_string(),
        ProbabilityBand::Moderate => text.yellow().to_string(),
    }
}

/// Color a factor impact
pub fn color_impact(impact: Impact) -> String {
    let label = impact.as_str();
    match impact {
        Impact::High => label.green().to_string(),
        Impact::Medium => label.yellow().to_string(),
        Impact::Low | Impact::Unknown => label.dimmed().to_string(),
    }
}
