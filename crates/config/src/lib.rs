//! Configuration loading for flake8-style lint settings
//!
//! This crate parses INI-like configuration files (`.flake8`, `setup.cfg`,
//! `tox.ini`), types their values, applies environment overrides and
//! validates the result before handing it to a rule-checking engine.

pub mod document;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod validation;

pub use document::{IniDocument, Section};
pub use loader::{ConfigLoader, LoadedConfig};
pub use parser::parse_str;
pub use schema::*;
pub use validation::*;
