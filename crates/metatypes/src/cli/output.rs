//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use metatypes_diagnostics::DataTypeError;
use serde_json::Value;
use std::io::IsTerminal;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {}", "Error:".red().bold(), error)
}

/// Format a data type error with its code
pub fn format_type_error(error: &DataTypeError) -> String {
    format!(
        "{} {}",
        error.code().to_string().red().bold(),
        error.message()
    )
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// One input and what became of it
pub fn format_outcome(input: &str, outcome: &std::result::Result<String, DataTypeError>) -> String {
    match outcome {
        Ok(output) => format!("{} {} {}", input.cyan(), "→".dimmed(), output),
        Err(err) => format!("{} {} {}", input.cyan(), "✗".red(), format_type_error(err)),
    }
}

/// JSON record of an outcome
pub fn outcome_json(input: &str, outcome: &std::result::Result<String, DataTypeError>) -> Value {
    match outcome {
        Ok(output) => serde_json::json!({ "input": input, "output": output }),
        Err(err) => serde_json::json!({
            "input": input,
            "error": err.message(),
            "code": err.code().to_string(),
            "kind": format!("{:?}", err.kind()),
        }),
    }
}

/// Format JSON value for output
pub fn format_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}
