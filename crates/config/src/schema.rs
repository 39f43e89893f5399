//! Typed view of the lint section

use crate::document::Section;
use anyhow::{Context, Result};
use figment::{providers::Serialized, Figment};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use types::utils::{normalize_key, parse_bool, split_tokens};
use types::{ConfigError, Setting, SettingValue, SuppressionSet};

/// Section read from `.flake8`, `setup.cfg` and `tox.ini`
pub const LINT_SECTION: &str = "flake8";

/// flake8's own default line limit
pub const DEFAULT_MAX_LINE_LENGTH: u32 = 79;

/// Options whose value is a token list rather than a scalar
pub const LIST_KEYS: &[&str] = &[
    "enable-extensions",
    "exclude",
    "extend-default-ignore",
    "extend-exclude",
    "extend-ignore",
    "extend-select",
    "filename",
    "ignore",
    "per-file-ignores",
    "require-plugins",
    "select",
];

/// Whether a normalized option name holds a token list
pub fn is_list_key(key: &str) -> bool {
    LIST_KEYS.contains(&key)
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LintSettings {
    /// Maximum allowed line length
    pub max_line_length: u32,
    /// Maximum allowed doc/comment line length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_doc_length: Option<u32>,
    /// Codes replacing the checker's default ignore list
    pub ignore: SuppressionSet,
    /// Codes ignored in addition to the default list
    pub extend_ignore: SuppressionSet,
    /// Codes explicitly enabled
    pub select: SuppressionSet,
    /// Codes enabled in addition to the default selection
    pub extend_select: SuppressionSet,
    /// Path patterns skipped entirely
    #[serde(deserialize_with = "deserialize_tokens")]
    pub exclude: Vec<String>,
    /// Path patterns skipped in addition to `exclude`
    #[serde(deserialize_with = "deserialize_tokens")]
    pub extend_exclude: Vec<String>,
    /// Codes ignored only for matching files
    pub per_file_ignores: PerFileIgnores,
    /// Skip unused-argument reports for `_`-prefixed arguments
    #[serde(deserialize_with = "deserialize_flag")]
    pub suppress_dummy_args: bool,
    /// Every other option (plugin settings such as `literal-*`), verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, SettingValue>,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_doc_length: None,
            ignore: SuppressionSet::new(),
            extend_ignore: SuppressionSet::new(),
            select: SuppressionSet::new(),
            extend_select: SuppressionSet::new(),
            exclude: Vec::new(),
            extend_exclude: Vec::new(),
            per_file_ignores: PerFileIgnores::default(),
            suppress_dummy_args: false,
            extra: BTreeMap::new(),
        }
    }
}

impl LintSettings {
    /// Figment seeded with every option of the section
    pub fn figment(section: &Section) -> Figment {
        Figment::from(Serialized::defaults(section.to_map()))
    }

    /// Extract typed settings from a parsed section
    pub fn from_section(section: &Section) -> Result<Self> {
        Self::figment(section)
            .extract()
            .context("Failed to type lint settings")
    }

    /// Effective suppression set: `ignore` plus `extend-ignore`
    pub fn suppressed(&self) -> SuppressionSet {
        self.ignore.union(&self.extend_ignore)
    }

    /// Effective selection: `select` plus `extend-select`
    pub fn selected(&self) -> SuppressionSet {
        self.select.union(&self.extend_select)
    }

    /// Look up a plugin option kept verbatim
    pub fn extra(&self, name: &str) -> Option<&SettingValue> {
        self.extra.get(&normalize_key(name))
    }

    /// `literal-*` options, e.g. `literal-inline-quotes = double`
    pub fn literal_settings(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.extra
            .iter()
            .filter(|(name, _)| name.starts_with("literal-"))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Render the settings as a `[flake8]` section
    pub fn to_section(&self) -> Section {
        let mut section = Section::new(Some(LINT_SECTION.to_string()));
        section.push(Setting::new(
            "max-line-length",
            SettingValue::Integer(i64::from(self.max_line_length)),
        ));
        if let Some(length) = self.max_doc_length {
            section.push(Setting::new("max-doc-length", SettingValue::Integer(i64::from(length))));
        }

        let code_lists = [
            ("ignore", &self.ignore),
            ("extend-ignore", &self.extend_ignore),
            ("select", &self.select),
            ("extend-select", &self.extend_select),
        ];
        for (name, codes) in code_lists {
            if !codes.is_empty() {
                let tokens = codes.iter().map(|code| code.to_string()).collect();
                section.push(Setting::new(name, SettingValue::List(tokens)));
            }
        }

        let pattern_lists = [
            ("exclude", &self.exclude),
            ("extend-exclude", &self.extend_exclude),
        ];
        for (name, patterns) in pattern_lists {
            if !patterns.is_empty() {
                section.push(Setting::new(name, SettingValue::List(patterns.clone())));
            }
        }

        if !self.per_file_ignores.is_empty() {
            section.push(Setting::new(
                "per-file-ignores",
                SettingValue::List(self.per_file_ignores.to_tokens()),
            ));
        }

        section.push(Setting::new(
            "suppress-dummy-args",
            SettingValue::Boolean(self.suppress_dummy_args),
        ));

        for (name, value) in &self.extra {
            section.push(Setting::new(name.clone(), value.clone()));
        }
        section
    }
}

/// Codes ignored for files matching one pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerFileIgnore {
    pub pattern: String,
    pub codes: SuppressionSet,
}

/// `per-file-ignores` entries in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PerFileIgnores(Vec<PerFileIgnore>);

impl PerFileIgnores {
    /// Group tokens such as `tests/*.py:S101 WPS432 setup.py:D` by pattern
    pub fn from_tokens<I, S>(tokens: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<PerFileIgnore> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            match token.split_once(':') {
                Some((pattern, code)) => {
                    if pattern.is_empty() {
                        return Err(format!("missing file pattern before `:` in `{}`", token));
                    }
                    let mut codes = SuppressionSet::new();
                    if !code.is_empty() {
                        codes.insert(code);
                    }
                    entries.push(PerFileIgnore {
                        pattern: pattern.to_string(),
                        codes,
                    });
                }
                None => match entries.last_mut() {
                    Some(entry) => {
                        entry.codes.insert(token);
                    }
                    None => {
                        return Err(format!("code `{}` appears before any file pattern", token));
                    }
                },
            }
        }
        Ok(Self(entries))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerFileIgnore> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Codes listed for an exact pattern
    pub fn codes_for(&self, pattern: &str) -> Option<&SuppressionSet> {
        self.0
            .iter()
            .find(|entry| entry.pattern == pattern)
            .map(|entry| &entry.codes)
    }

    /// Token form accepted back by [`PerFileIgnores::from_tokens`]
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for entry in &self.0 {
            tokens.push(format!("{}:", entry.pattern));
            tokens.extend(entry.codes.iter().map(|code| code.to_string()));
        }
        tokens
    }
}

impl<'de> Deserialize<'de> for PerFileIgnores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tokens = deserializer.deserialize_any(TokensVisitor)?;
        PerFileIgnores::from_tokens(tokens).map_err(de::Error::custom)
    }
}

/// Accepts either a separated string or a sequence of strings
struct TokensVisitor;

impl<'de> Visitor<'de> for TokensVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of tokens or a whitespace/comma separated string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
        Ok(split_tokens(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut tokens = Vec::new();
        while let Some(token) = seq.next_element::<String>()? {
            tokens.extend(split_tokens(&token));
        }
        Ok(tokens)
    }
}

fn deserialize_tokens<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    deserializer.deserialize_any(TokensVisitor)
}

/// Accepts booleans, `0`/`1` and the `yes`/`on`/`true` string spellings
struct FlagVisitor {
    field: &'static str,
}

impl FlagVisitor {
    fn invalid<E: de::Error>(&self, value: impl fmt::Display) -> E {
        E::custom(ConfigError::InvalidValue {
            field: self.field.to_string(),
            value: value.to_string(),
        })
    }
}

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, 0/1, or one of true/false/yes/no/on/off")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<Self::Value, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Self::Value, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.invalid(other)),
        }
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Self::Value, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.invalid(other)),
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
        match value.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => parse_bool(other).ok_or_else(|| self.invalid(other)),
        }
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<bool, D::Error> {
    deserializer.deserialize_any(FlagVisitor {
        field: "suppress-dummy-args",
    })
}
