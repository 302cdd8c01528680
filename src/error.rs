//! Error types for Aura

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Aura operations
pub type Result<T> = std::result::Result<T, AuraError>;

/// Main error type for Aura
#[derive(Error, Debug)]
pub enum AuraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Target execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML encoding errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found (searched: {0})")]
    NotFound(String),

    #[error("failed to parse '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    #[error("failed to include file '{path}': {error}")]
    IncludeFile { path: PathBuf, error: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("target '{target}' depends on undefined target '{dependency}'")]
    UnknownDependency { target: String, dependency: String },

    #[error("circular dependency detected: {0}")]
    CircularDependency(String),
}

/// Target and command execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("empty command")]
    EmptyCommand,

    #[error("no directory specified for cd")]
    MissingDirectory,

    #[error("cannot change directory to '{path}': {error}")]
    ChangeDirectory { path: PathBuf, error: String },

    #[error("failed to start '{command}': {error}")]
    Spawn { command: String, error: String },

    #[error("{}", exit_status_text(.code))]
    CommandFailed { code: Option<i32>, output: String },

    #[error("target '{0}' not found")]
    TargetNotFound(String),

    #[error("circular dependency detected: {0}")]
    CircularDependency(String),

    /// A command failure, carrying the diagnostic shown to the user
    #[error("TargetError: in {target} -> {message}")]
    TargetFailed {
        target: String,
        message: String,
        #[source]
        source: Box<ExecutionError>,
    },
}

fn exit_status_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Broad classification of an error, used for exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigNotFound,
    ConfigParse,
    TargetNotFound,
    CommandExecution,
    CircularDependency,
    Io,
}

impl ErrorKind {
    /// Process exit code reported for this kind of error
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::TargetNotFound => 1,
            ErrorKind::ConfigNotFound | ErrorKind::ConfigParse => 2,
            ErrorKind::CommandExecution | ErrorKind::CircularDependency | ErrorKind::Io => 3,
        }
    }
}

impl AuraError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuraError::Config(err) => err.kind(),
            AuraError::Execution(err) => err.kind(),
            // configuration parse failures arrive as `ConfigError`; these come from output
            AuraError::Io(_) | AuraError::Yaml(_) | AuraError::Json(_) => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NotFound(_) => ErrorKind::ConfigNotFound,
            ConfigError::CircularDependency(_) => ErrorKind::CircularDependency,
            ConfigError::UnknownDependency { .. } => ErrorKind::TargetNotFound,
            ConfigError::Parse { .. }
            | ConfigError::IncludeFile { .. }
            | ConfigError::Invalid(_) => ErrorKind::ConfigParse,
        }
    }
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecutionError::TargetNotFound(_) => ErrorKind::TargetNotFound,
            ExecutionError::CircularDependency(_) => ErrorKind::CircularDependency,
            _ => ErrorKind::CommandExecution,
        }
    }

    /// Output captured from the failed command, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecutionError::CommandFailed { output, .. } => Some(output),
            ExecutionError::TargetFailed { source, .. } => source.output(),
            _ => None,
        }
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
