//! Terminal styling for user-facing output

use colored::Colorize;

/// Line echoed before a command is dispatched
pub fn command_line(command: &str) -> String {
    format!("{} {}", "→".cyan().bold(), command)
}

/// Line printed for a command skipped by dry-run
pub fn dry_run_line(command: &str) -> String {
    format!("  {} Would execute: {}", "[DRY RUN]".yellow(), command)
}

/// Line announcing a target
pub fn target_line(target_name: &str) -> String {
    format!("{} {}", "::".blue().bold(), target_name.bold())
}

/// Line reporting a fatal error
pub fn error_line(message: &str) -> String {
    format!("{} {}", "error:".red().bold(), message)
}

/// Line reporting success of a non-execution command
pub fn success_line(message: &str) -> String {
    format!("{} {}", "ok:".green().bold(), message)
}
