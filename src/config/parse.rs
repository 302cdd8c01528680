//! Configuration file parsing and discovery

use crate::config::types::{Config, ConfigLayer};
use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["aura.yaml", "aura.yml"];

/// Find the configuration file starting from a specific directory
///
/// The directory and each of its parents are searched in turn.
pub fn find_config_file_from(start_dir: &Path) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Resolve an explicitly requested configuration file
///
/// Relative paths are taken relative to `working_dir`.
pub fn resolve_config_path(path: &Path, working_dir: &Path) -> ConfigResult<PathBuf> {
    let full_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    };

    if !full_path.is_file() {
        return Err(ConfigError::NotFound(full_path.display().to_string()));
    }

    Ok(full_path)
}

/// Parse a configuration file from a path, merging its includes
pub fn parse_config_file(path: &Path) -> ConfigResult<Config> {
    let contents = fs::read_to_string(path)
        .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;

    let layer = parse_layer(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut config = Config::default();
    config.apply(layer);

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    process_includes(&mut config, base_dir)?;

    Ok(config)
}

/// Parse configuration from a string
///
/// Include directives are kept but not loaded; there is no base directory
/// to resolve them against.
pub fn parse_config(yaml: &str) -> ConfigResult<Config> {
    let layer = parse_layer(yaml).map_err(|e| ConfigError::Parse {
        path: PathBuf::from("<string>"),
        error: e.to_string(),
    })?;

    let mut config = Config::default();
    config.apply(layer);
    Ok(config)
}

/// Find and parse the configuration for a working directory
pub fn parse_config_auto(working_dir: &Path) -> ConfigResult<(Config, PathBuf)> {
    let config_path = find_config_file_from(working_dir)?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

fn parse_layer(yaml: &str) -> Result<ConfigLayer, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    serde_yaml::from_str(yaml)
}

/// Merge every include of the primary file, in order
fn process_includes(config: &mut Config, base_dir: &Path) -> ConfigResult<()> {
    let includes = config.includes.clone();

    for include in &includes {
        let include_path = base_dir.join(include);

        let contents = match fs::read_to_string(&include_path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %include_path.display(), error = %e, "cannot load include, skipping");
                continue;
            }
        };

        let layer = parse_layer(&contents).map_err(|e| ConfigError::IncludeFile {
            path: include_path.clone(),
            error: e.to_string(),
        })?;

        if layer.includes.is_some() {
            debug!(path = %include_path.display(), "nested include list ignored");
        }

        config.apply(ConfigLayer {
            includes: None,
            ..layer
        });
    }

    Ok(())
}
