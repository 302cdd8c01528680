//! Target execution engine
//!
//! This module handles variable resolution, dependency ordering, command
//! dispatch and the continue-on-error policy.

pub mod command;
pub mod context;
pub mod deps;
pub mod executor;
pub mod interpolate;
pub mod registry;

// Re-export main types
pub use command::*;
pub use context::*;
pub use deps::*;
pub use executor::*;
pub use interpolate::*;
pub use registry::*;
