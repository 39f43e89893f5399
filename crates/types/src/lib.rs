//! Shared types for the lint configuration loader
//!
//! This crate contains the setting values, rule-code tokens and error types
//! used by the loader and the command-line front end.

pub mod error;
pub mod rule;
pub mod setting;
pub mod utils;

// Re-export commonly used types
pub use error::{ConfigError, LintConfigError, Result};
pub use rule::{RuleCode, SuppressionSet};
pub use setting::{Setting, SettingValue};
