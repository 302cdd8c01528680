//! Core configuration types
//!
//! This module defines the data structures that represent an aura.yaml configuration file.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Variables available to `$NAME` / `${NAME}` tokens
    #[serde(default, deserialize_with = "deserialize_vars")]
    pub vars: HashMap<String, String>,

    /// Targets defined in the configuration
    #[serde(default)]
    pub targets: HashMap<String, Target>,

    /// Target run before the requested targets
    #[serde(default)]
    pub prologue: Target,

    /// Target run after the requested targets
    #[serde(default)]
    pub epilogue: Target,

    /// Global default for `continue_on_error`
    #[serde(default)]
    pub continue_on_error: bool,

    /// Files merged into this configuration after the primary file
    #[serde(rename = "include", default)]
    pub includes: Vec<String>,
}

/// A target definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Target {
    /// Commands to execute, in order
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub run: Vec<String>,

    /// Targets (or files, when the entry contains a `.`) to run first
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub deps: Vec<String>,

    /// Message reported instead of the raw error when a command fails
    #[serde(default)]
    pub onerror: Option<String>,

    /// Keep running the remaining commands when one fails
    #[serde(default)]
    pub continue_on_error: bool,
}

impl Target {
    /// Create a target from a list of commands
    pub fn with_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Target {
            run: commands.into_iter().map(Into::into).collect(),
            ..Target::default()
        }
    }

    /// True when the target declares neither commands nor dependencies
    pub fn is_empty(&self) -> bool {
        self.run.is_empty() && self.deps.is_empty()
    }

    /// The custom failure message, if one is set and not blank
    pub fn error_message(&self) -> Option<&str> {
        self.onerror
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// A single decoded configuration file
///
/// Every field is optional so that an include only overrides what it sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, deserialize_with = "deserialize_optional_vars")]
    pub vars: Option<HashMap<String, String>>,

    #[serde(default)]
    pub targets: Option<HashMap<String, Target>>,

    #[serde(default)]
    pub prologue: Option<Target>,

    #[serde(default)]
    pub epilogue: Option<Target>,

    #[serde(default)]
    pub continue_on_error: Option<bool>,

    #[serde(rename = "include", default)]
    pub includes: Option<Vec<String>>,
}

impl Config {
    /// Overlay a decoded file onto this configuration
    ///
    /// Maps merge key by key; prologue, epilogue and the global
    /// `continue_on_error` are replaced when the layer sets them.
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(vars) = layer.vars {
            self.vars.extend(vars);
        }
        if let Some(targets) = layer.targets {
            self.targets.extend(targets);
        }
        if let Some(prologue) = layer.prologue {
            self.prologue = prologue;
        }
        if let Some(epilogue) = layer.epilogue {
            self.epilogue = epilogue;
        }
        if let Some(continue_on_error) = layer.continue_on_error {
            self.continue_on_error = continue_on_error;
        }
        if let Some(includes) = layer.includes {
            self.includes = includes;
        }
    }

    /// Target names in sorted order
    pub fn target_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Custom deserializer for lists that may also be given as a single string
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| {
                scalar_to_string(item)
                    .ok_or_else(|| D::Error::custom("list entries must be strings"))
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("expected a string or a list of strings")),
    }
}

/// Custom deserializer for variables, accepting any scalar value
fn deserialize_vars<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_optional_vars(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_vars<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => {
            let mut vars = HashMap::with_capacity(mapping.len());
            for (key, value) in mapping {
                let name = scalar_to_string(key)
                    .ok_or_else(|| D::Error::custom("variable names must be scalars"))?;
                let value = scalar_to_string(value).ok_or_else(|| {
                    D::Error::custom(format!("variable '{}' must be a scalar value", name))
                })?;
                vars.insert(name, value);
            }
            Ok(Some(vars))
        }
        _ => Err(D::Error::custom("vars must be a mapping")),
    }
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
