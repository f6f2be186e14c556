// Output formatting

use colored::Colorize;

use crate::error::CliResult;

/// Print a command result as pretty JSON on stdout
pub fn print_json(value: &serde_json::Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error message on stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}
