//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Render a serializable value as JSON or YAML.
///
/// Returns `None` for [`OutputFormat::Table`], which each command renders
/// itself.
pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<Option<String>> {
    Ok(match format {
        OutputFormat::Table => None,
        OutputFormat::Json => Some(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(data)?),
    })
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(60));
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn render_structured_formats() {
        let value = serde_json::json!({ "levels": 3 });
        assert!(render(&value, OutputFormat::Table).unwrap().is_none());
        let json = render(&value, OutputFormat::Json).unwrap().unwrap();
        assert!(json.contains("\"levels\": 3"));
        let yaml = render(&value, OutputFormat::Yaml).unwrap().unwrap();
        assert_eq!(yaml.trim(), "levels: 3");
    }
}
