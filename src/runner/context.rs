//! Execution context for target running
//!
//! The context tracks all the state that changes or is consulted while a
//! session executes: the working directory (moved by `cd` commands), the
//! verbosity and the dry-run switch.

use crate::ui;
use std::env;
use std::path::{Path, PathBuf};

/// Execution context that tracks state during target execution
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory commands run in; `cd` commands update it for the rest of the run
    pub working_dir: PathBuf,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Report commands instead of running them
    pub dry_run: bool,

    /// Run the epilogue even when a requested target failed
    pub always_run_epilogue: bool,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context rooted at the process working directory
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            verbosity: Verbosity::Normal,
            dry_run: false,
            always_run_epilogue: false,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the epilogue even after a failure
    pub fn with_always_run_epilogue(mut self, always: bool) -> Self {
        self.always_run_epilogue = always;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Whether commands are echoed before they are dispatched
    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    /// Echo a command about to run
    pub fn print_command(&self, command: &str) {
        if self.is_verbose() {
            eprintln!("{}", ui::command_line(command));
        }
    }

    /// Report a command skipped by dry-run
    pub fn print_dry_run(&self, command: &str) {
        if self.is_verbose() {
            eprintln!("{}", ui::dry_run_line(command));
        }
    }

    /// Print captured command output
    pub fn print_output(&self, output: &str) {
        if self.verbosity >= Verbosity::Quiet && !output.trim().is_empty() {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
    }

    /// Print target start message
    pub fn print_target_start(&self, target_name: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{}", ui::target_line(target_name));
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{}", ui::error_line(message));
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
