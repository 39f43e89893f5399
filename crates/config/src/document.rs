//! Parsed INI documents and their text form

use crate::schema::LINT_SECTION;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use types::utils::normalize_key;
use types::{LintConfigError, Setting, SettingValue, SuppressionSet};

const CONTINUATION_INDENT: &str = "    ";

/// Named, ordered group of settings; `name` is `None` for keys before any header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    name: Option<String>,
    settings: Vec<Setting>,
}

impl Section {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            settings: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Look up an option; the name is normalized the same way keys are
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        let key = normalize_key(key);
        self.settings
            .iter()
            .find(|setting| setting.name == key)
            .map(|setting| &setting.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Suppression set held by a list-valued option
    pub fn suppressions(&self, key: &str) -> Option<SuppressionSet> {
        self.get(key).and_then(SettingValue::to_suppressions)
    }

    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Name to value mapping of every option in the section
    pub fn to_map(&self) -> BTreeMap<String, SettingValue> {
        self.settings
            .iter()
            .map(|setting| (setting.name.clone(), setting.value.clone()))
            .collect()
    }

    /// Append a setting; callers guarantee the name is normalized and unique
    pub(crate) fn push(&mut self, setting: Setting) {
        self.settings.push(setting);
    }

    fn write_ini(&self, out: &mut String) {
        if let Some(name) = &self.name {
            let _ = writeln!(out, "[{}]", name);
        }
        for setting in &self.settings {
            match &setting.value {
                SettingValue::List(tokens) => {
                    let mut lines = list_lines(tokens);
                    let head = lines.remove(0);
                    if head.is_empty() {
                        let _ = writeln!(out, "{} =", setting.name);
                    } else {
                        let _ = writeln!(out, "{} = {}", setting.name, head);
                    }
                    for line in lines {
                        let _ = writeln!(out, "{}{}", CONTINUATION_INDENT, line);
                    }
                }
                SettingValue::Text(text) if text.contains('\n') => {
                    let mut lines = text.lines();
                    let first = lines.next().unwrap_or_default();
                    let _ = writeln!(out, "{} = {}", setting.name, first);
                    for line in lines {
                        let _ = writeln!(out, "{}{}", CONTINUATION_INDENT, line);
                    }
                }
                value => {
                    let _ = writeln!(out, "{} = {}", setting.name, value);
                }
            }
        }
    }
}

/// Lay out list tokens as the key-line value followed by continuation lines
///
/// A token starting with `#` or `;` would read back as a comment on a line of
/// its own, so it is glued with `,` onto the previous line instead.
fn list_lines(tokens: &[String]) -> Vec<String> {
    let mut lines = vec![String::new()];
    for token in tokens {
        if token.starts_with(['#', ';']) {
            // `lines` always holds the key-line entry
            if let Some(last) = lines.last_mut() {
                last.push(',');
                last.push_str(token);
            }
        } else {
            lines.push(token.clone());
        }
    }
    lines
}

/// Every section of a configuration file, in file order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name() == Some(name))
    }

    /// Keys that appeared before the first section header
    pub fn default_section(&self) -> Option<&Section> {
        self.sections.iter().find(|section| section.name.is_none())
    }

    /// The `[flake8]` section, or the default section for headerless files
    pub fn lint_section(&self) -> Option<&Section> {
        self.section(LINT_SECTION).or_else(|| self.default_section())
    }

    pub fn has_lint_section(&self) -> bool {
        self.section(LINT_SECTION).is_some()
    }

    pub(crate) fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    /// Render the document back to INI text
    ///
    /// List values go one token per continuation line; reparsing the output
    /// yields an equal document.
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            section.write_ini(&mut out);
        }
        out
    }

    /// Write the rendered document to `path`
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> types::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_ini_string()).map_err(|e| LintConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl From<Section> for IniDocument {
    fn from(section: Section) -> Self {
        Self {
            sections: vec![section],
        }
    }
}
