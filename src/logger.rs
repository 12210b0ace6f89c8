//! Categorized terminal output. Every line the tool prints is tagged as
//! informational, warning, success, or error so an operator can scan a run
//! at a glance. This is operator-facing side-effect only -- nothing in the
//! data contract depends on it.

use colored::Colorize;

/// Logs an informational line.
pub fn info(message: &str) {
    println!("{} {}", "[info]".bright_blue().bold(), message);
}

/// Logs a warning line.
pub fn warn(message: &str) {
    println!("{} {}", "[warn]".bright_yellow().bold(), message);
}

/// Logs a success line.
pub fn success(message: &str) {
    println!("{} {}", "[done]".bright_green().bold(), message);
}

/// Logs an error line to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "[error]".bright_red().bold(), message);
}
