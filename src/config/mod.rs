//! Configuration parsing and validation
//!
//! This module handles discovery and parsing of aura.yaml files, merging of
//! included files, and validation of the merged configuration.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
