//! Configuration validation
//!
//! This module checks a merged configuration before anything runs.

use crate::config::types::{Config, Target};
use crate::error::{ConfigError, ConfigResult, ExecutionError};
use crate::runner::{DependencyWalker, TargetRegistry, EPILOGUE, PROLOGUE};
use std::collections::HashSet;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for name in config.target_names() {
        validate_target(name, &config.targets[name])?;
    }
    validate_target(PROLOGUE, &config.prologue)?;
    validate_target(EPILOGUE, &config.epilogue)?;

    detect_dependency_problems(config)
}

/// Validate a single target
pub fn validate_target(name: &str, target: &Target) -> ConfigResult<()> {
    for (position, command) in target.run.iter().enumerate() {
        if command.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "target '{}' has an empty command at position {}",
                name,
                position + 1
            )));
        }
    }

    for dep in &target.deps {
        if dep.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "target '{}' has an empty dependency",
                name
            )));
        }
    }

    Ok(())
}

/// Detect unknown and circular dependencies
fn detect_dependency_problems(config: &Config) -> ConfigResult<()> {
    let registry = TargetRegistry::new(config);
    let walker = DependencyWalker::new(&registry);
    let none = HashSet::new();

    for id in registry.ids() {
        let name = registry.name(id);
        walker
            .walk_named(name, &none)
            .map_err(|e| dependency_error(name, e))?;
    }

    for (name, target) in [(PROLOGUE, &config.prologue), (EPILOGUE, &config.epilogue)] {
        walker
            .walk(target, &none)
            .map_err(|e| dependency_error(name, e))?;
    }

    Ok(())
}

fn dependency_error(target: &str, err: ExecutionError) -> ConfigError {
    match err {
        ExecutionError::CircularDependency(path) => ConfigError::CircularDependency(path),
        ExecutionError::TargetNotFound(dependency) => ConfigError::UnknownDependency {
            target: target.to_string(),
            dependency,
        },
        other => ConfigError::Invalid(other.to_string()),
    }
}
