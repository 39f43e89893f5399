//! Error types for the lint configuration loader

use thiserror::Error;

/// Main error type for the lint configuration loader
#[derive(Error, Debug)]
pub enum LintConfigError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem errors outside of loading (writing examples, rendering output)
    #[error("I/O error: {path}: {message}")]
    Io { path: String, message: String },

    /// Rendering settings to JSON or YAML failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for lint configuration operations
pub type Result<T> = std::result::Result<T, LintConfigError>;

/// Configuration specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// File exists but could not be read as text
    #[error("Failed to read configuration file {path}: {message}")]
    Unreadable { path: String, message: String },

    /// Malformed line; `line` is 1-based
    #[error("Configuration parse error at line {line}: {message} (`{content}`)")]
    ParseError {
        line: usize,
        content: String,
        message: String,
    },

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Invalid value
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl ConfigError {
    /// Build a parse error for the given 1-based line
    pub fn parse(line: usize, content: &str, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            line,
            content: content.trim_end().to_string(),
            message: message.into(),
        }
    }

    /// Line number of a parse error
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::ParseError { line, .. } => Some(*line),
            _ => None,
        }
    }
}
