//! Aura - a declarative build-target runner
//!
//! Aura reads named targets from an `aura.yaml` file and runs their shell
//! commands after their dependencies, substituting `$VAR` references along
//! the way.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{AuraError, Result};

/// Current version of Aura
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
