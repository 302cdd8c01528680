//! Variable interpolation for command strings
//!
//! Tokens take the forms `$NAME`, `${NAME}` and `$@`. Names resolve through
//! the built-in variables, then the configured variables, then the process
//! environment.

use chrono::Local;
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\w+|\$\{[^}]+\}|\$@").expect("token pattern is valid"));

/// Format of the `TIMESTAMP` built-in
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolves variable names for one command
pub struct VariableResolver<'a> {
    vars: &'a HashMap<String, String>,
    working_dir: &'a Path,
}

/// Result of substituting the tokens of a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The text with every resolvable token replaced
    pub text: String,

    /// Tokens left in place because they resolved to nothing, one per occurrence
    pub undefined: Vec<String>,
}

impl<'a> VariableResolver<'a> {
    pub fn new(vars: &'a HashMap<String, String>, working_dir: &'a Path) -> Self {
        VariableResolver { vars, working_dir }
    }

    /// Resolve a variable name to its value, or an empty string
    pub fn resolve(&self, name: &str, target_name: &str) -> String {
        match name {
            "@" => target_name.to_string(),
            "cwd" => self.working_dir.display().to_string(),
            "TIMESTAMP" => Local::now().format(TIMESTAMP_FORMAT).to_string(),
            _ => match self.vars.get(name) {
                Some(value) if !value.trim().is_empty() => value.clone(),
                // blank configured values fall through to the environment
                _ => env::var(name).unwrap_or_default(),
            },
        }
    }

    /// Replace every token in `text`
    ///
    /// Each occurrence is replaced in place and substituted values are never
    /// scanned again, so a value containing `$` is inserted literally.
    pub fn substitute(&self, text: &str, target_name: &str) -> Substitution {
        let mut result = String::with_capacity(text.len());
        let mut undefined = Vec::new();
        let mut last = 0;

        for token in TOKEN_RE.find_iter(text) {
            let value = self.resolve(token_name(token.as_str()), target_name);

            result.push_str(&text[last..token.start()]);
            if value.is_empty() {
                warn!(token = token.as_str(), target_name, "undefined variable");
                result.push_str(token.as_str());
                undefined.push(token.as_str().to_string());
            } else {
                result.push_str(&value);
            }
            last = token.end();
        }
        result.push_str(&text[last..]);

        Substitution {
            text: result,
            undefined,
        }
    }
}

/// Strip the sigil and braces from a token
fn token_name(token: &str) -> &str {
    let name = token.strip_prefix('$').unwrap_or(token);
    name.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(name)
}
