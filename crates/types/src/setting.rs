//! Setting names and typed values

use crate::utils::{parse_bool, split_tokens};
use crate::rule::SuppressionSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed value of a single option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// `true`/`false`/`yes`/`no`/`on`/`off`
    Boolean(bool),
    /// Signed integer such as `max-line-length = 88`
    Integer(i64),
    /// Token list of a multi-value option, in file order
    List(Vec<String>),
    /// Anything else, verbatim
    Text(String),
}

impl SettingValue {
    /// Type a scalar value: integer, then boolean, then text
    pub fn scalar(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(number) = raw.parse::<i64>() {
            return SettingValue::Integer(number);
        }
        match parse_bool(raw) {
            Some(flag) => SettingValue::Boolean(flag),
            None => SettingValue::Text(raw.to_string()),
        }
    }

    /// Type a multi-value option by splitting it into tokens
    pub fn list(raw: &str) -> Self {
        SettingValue::List(split_tokens(raw))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(tokens) => Some(tokens),
            _ => None,
        }
    }

    /// Collapse a list value into a suppression set; scalars yield `None`
    pub fn to_suppressions(&self) -> Option<SuppressionSet> {
        self.as_list()
            .map(|tokens| tokens.iter().map(String::as_str).collect())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(value) => write!(f, "{}", value),
            SettingValue::Integer(value) => write!(f, "{}", value),
            SettingValue::List(tokens) => write!(f, "{}", tokens.join(" ")),
            SettingValue::Text(value) => f.write_str(value),
        }
    }
}

/// A named option as it appears in a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Normalized option name (`max-line-length`)
    pub name: String,
    pub value: SettingValue,
}

impl Setting {
    pub fn new(name: impl Into<String>, value: SettingValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_typing() {
        assert_eq!(SettingValue::scalar("88"), SettingValue::Integer(88));
        assert_eq!(SettingValue::scalar("-3"), SettingValue::Integer(-3));
        assert_eq!(SettingValue::scalar("True"), SettingValue::Boolean(true));
        assert_eq!(SettingValue::scalar("no"), SettingValue::Boolean(false));
        assert_eq!(
            SettingValue::scalar(" double "),
            SettingValue::Text("double".to_string())
        );
        assert_eq!(SettingValue::scalar(""), SettingValue::Text(String::new()));
    }

    #[test]
    fn test_list_typing() {
        let value = SettingValue::list("D I\nFI, TC");
        assert_eq!(value.as_list().unwrap(), ["D", "I", "FI", "TC"]);
        assert_eq!(SettingValue::list(""), SettingValue::List(Vec::new()));
    }

    #[test]
    fn test_to_suppressions_collapses_duplicates() {
        let set = SettingValue::list("S101 D S101").to_suppressions().unwrap();
        assert_eq!(set.len(), 2);
        assert!(SettingValue::Integer(88).to_suppressions().is_none());
    }

    #[test]
    fn test_untagged_json_shape() {
        let json = serde_json::to_string(&SettingValue::list("D I")).unwrap();
        assert_eq!(json, r#"["D","I"]"#);
        let back: SettingValue = serde_json::from_str("88").unwrap();
        assert_eq!(back, SettingValue::Integer(88));
    }
}
