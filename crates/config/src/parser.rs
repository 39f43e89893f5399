//! Single-pass parser for INI-like configuration text

use crate::document::{IniDocument, Section};
use crate::schema::is_list_key;
use tracing::debug;
use types::utils::{normalize_key, strip_inline_comment};
use types::{ConfigError, Setting, SettingValue};

/// Option whose value is still being collected from continuation lines
struct PendingValue {
    key: String,
    fragments: Vec<String>,
}

impl PendingValue {
    fn finish(self) -> Setting {
        let value = if is_list_key(&self.key) {
            SettingValue::list(&self.fragments.join("\n"))
        } else {
            let lines: Vec<&str> = self
                .fragments
                .iter()
                .map(String::as_str)
                .filter(|fragment| !fragment.is_empty())
                .collect();
            match lines.as_slice() {
                [single] => SettingValue::scalar(single),
                _ => SettingValue::Text(lines.join("\n")),
            }
        };
        Setting::new(self.key, value)
    }
}

struct Parser {
    document: IniDocument,
    pending: Option<PendingValue>,
}

impl Parser {
    fn new() -> Self {
        Self {
            document: IniDocument::new(),
            pending: None,
        }
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            let setting = pending.finish();
            debug!(key = %setting.name, value = %setting.value, "parsed setting");
            // A pending value always has a section to land in
            if let Some(section) = self.document.sections_mut().last_mut() {
                section.push(setting);
            }
        }
    }

    fn line(&mut self, line_no: usize, raw: &str) -> Result<(), ConfigError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            self.flush();
            return Ok(());
        }

        // Comment lines never end a continuation block
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            return Ok(());
        }

        if raw.starts_with(char::is_whitespace) {
            return match self.pending.as_mut() {
                Some(pending) => {
                    pending.fragments.push(strip_inline_comment(trimmed).to_string());
                    Ok(())
                }
                None => Err(ConfigError::parse(
                    line_no,
                    raw,
                    "indented line without a preceding key",
                )),
            };
        }

        self.flush();

        if trimmed.starts_with('[') {
            return self.section_header(line_no, raw, strip_inline_comment(trimmed));
        }

        self.key_value(line_no, raw, trimmed)
    }

    fn section_header(
        &mut self,
        line_no: usize,
        raw: &str,
        trimmed: &str,
    ) -> Result<(), ConfigError> {
        let name = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .map(str::trim)
            .ok_or_else(|| ConfigError::parse(line_no, raw, "unterminated section header"))?;

        if name.is_empty() {
            return Err(ConfigError::parse(line_no, raw, "empty section name"));
        }
        if self.document.section(name).is_some() {
            return Err(ConfigError::parse(
                line_no,
                raw,
                format!("section [{}] already defined", name),
            ));
        }

        debug!(section = name, "entering section");
        self.document
            .sections_mut()
            .push(Section::new(Some(name.to_string())));
        Ok(())
    }

    fn key_value(
        &mut self,
        line_no: usize,
        raw: &str,
        trimmed: &str,
    ) -> Result<(), ConfigError> {
        let delimiter = trimmed
            .find(|c: char| c == '=' || c == ':')
            .ok_or_else(|| ConfigError::parse(line_no, raw, "expected `key = value`"))?;

        let key = normalize_key(&trimmed[..delimiter]);
        if key.is_empty() {
            return Err(ConfigError::parse(line_no, raw, "missing key before delimiter"));
        }

        let sections = self.document.sections_mut();
        // Keys before any header open the default section, which is then first
        if sections.is_empty() {
            sections.push(Section::new(None));
        }
        if sections.last().is_some_and(|section| section.contains(&key)) {
            return Err(ConfigError::parse(
                line_no,
                raw,
                format!("option `{}` already defined in this section", key),
            ));
        }

        let value = strip_inline_comment(trimmed[delimiter + 1..].trim());
        self.pending = Some(PendingValue {
            key,
            fragments: vec![value.to_string()],
        });
        Ok(())
    }

    fn finish(mut self) -> IniDocument {
        self.flush();
        self.document
    }
}

/// Parse configuration text into a document
///
/// Fails on the first malformed line; nothing is returned for a file that
/// does not parse completely.
pub fn parse_str(input: &str) -> Result<IniDocument, ConfigError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut parser = Parser::new();
    for (idx, raw) in input.lines().enumerate() {
        parser.line(idx + 1, raw)?;
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::SuppressionSet;

    const SAMPLE: &str = include_str!("../fixtures/flake8.ini");

    #[test]
    fn test_max_line_length_is_integer() {
        let doc = parse_str("[flake8]\nmax-line-length = 88\n").unwrap();
        let section = doc.section("flake8").unwrap();
        assert_eq!(section.get("max-line-length"), Some(&SettingValue::Integer(88)));
    }

    #[test]
    fn test_extend_ignore_tokens() {
        let doc = parse_str("[flake8]\nextend-ignore = D I FI TC Q U101 S101 WPS400\n").unwrap();
        let set = doc.lint_section().unwrap().suppressions("extend-ignore").unwrap();
        let expected: SuppressionSet = ["D", "I", "FI", "TC", "Q", "U101", "S101", "WPS400"]
            .into_iter()
            .collect();
        assert_eq!(set, expected);
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_sample_file() {
        let doc = parse_str(SAMPLE).unwrap();
        let section = doc.section("flake8").unwrap();
        assert_eq!(section.get("max-line-length"), Some(&SettingValue::Integer(88)));
        assert_eq!(section.get("suppress-dummy-args"), Some(&SettingValue::Boolean(true)));
        assert_eq!(
            section.get("literal-inline-quotes"),
            Some(&SettingValue::Text("double".to_string()))
        );
        let ignored = section.suppressions("extend-ignore").unwrap();
        for code in ["D", "I", "FI", "TC", "Q", "U101", "S101", "WPS400", "WPS348"] {
            assert!(ignored.contains(code), "{code} missing");
        }
        assert_eq!(ignored.len(), 9);
    }

    #[test]
    fn test_continuation_with_comments() {
        let text = concat!(
            "[flake8]\nextend-ignore =\n",
            "    # docstrings\n",
            "    D,\n",
            "    S101  # asserts are fine\n",
            "; trailing comment\n",
            "    WPS400\n",
            "max-line-length = 88\n",
        );
        let doc = parse_str(text).unwrap();
        let section = doc.lint_section().unwrap();
        assert_eq!(
            section.get("extend-ignore").unwrap().as_list().unwrap(),
            ["D", "S101", "WPS400"]
        );
        assert_eq!(section.len(), 2);
    }

    #[test]
    fn test_empty_extend_ignore_is_empty_set() {
        let doc = parse_str("[flake8]\nextend-ignore =\nmax-line-length = 88\n").unwrap();
        let set = doc.lint_section().unwrap().suppressions("extend-ignore").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_colon_delimiter_and_key_normalization() {
        let doc = parse_str("[flake8]\nMax_Line_Length: 100\n").unwrap();
        assert_eq!(
            doc.lint_section().unwrap().get("max-line-length"),
            Some(&SettingValue::Integer(100))
        );
    }

    #[test]
    fn test_first_delimiter_wins() {
        let doc = parse_str("[flake8]\nper-file-ignores = tests/*.py:S101\n").unwrap();
        assert_eq!(
            doc.lint_section().unwrap().get("per-file-ignores").unwrap().as_list().unwrap(),
            ["tests/*.py:S101"]
        );
    }

    #[test]
    fn test_bare_token_line_is_error() {
        let err = parse_str("[flake8]\nmax-line-length = 88\nWPS400\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("WPS400"));
    }

    #[test]
    fn test_indented_line_without_key_is_error() {
        let err = parse_str("[flake8]\n    D\n").unwrap_err();
        assert_eq!(err.line(), Some(2));

        // A blank line closes the value before the indented token
        let err = parse_str("[flake8]\nextend-ignore =\n\n    D\n").unwrap_err();
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(parse_str("[flake8\n").unwrap_err().line(), Some(1));
        assert_eq!(parse_str("[ ]\n").unwrap_err().line(), Some(1));
        let err = parse_str("[flake8]\na = 1\n[flake8]\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_duplicate_key_is_error() {
        let err = parse_str("[flake8]\nmax-line-length = 88\nmax_line_length = 90\n")
            .unwrap_err();
        assert_eq!(err.line(), Some(3));
        // Same key in different sections is fine
        assert!(parse_str("[a]\nx = 1\n[b]\nx = 2\n").is_ok());
    }

    #[test]
    fn test_missing_key_is_error() {
        assert_eq!(parse_str("[flake8]\n= 88\n").unwrap_err().line(), Some(2));
    }

    #[test]
    fn test_empty_and_comment_only_input() {
        assert_eq!(parse_str("").unwrap(), IniDocument::new());
        assert_eq!(parse_str("# nothing\n\n; here\n").unwrap(), IniDocument::new());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let doc = parse_str("\u{feff}[flake8]\nmax-line-length = 88\n").unwrap();
        assert!(doc.has_lint_section());
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_str(SAMPLE).unwrap(), parse_str(SAMPLE).unwrap());
    }

    #[test]
    fn test_sample_round_trip() {
        let doc = parse_str(SAMPLE).unwrap();
        let reparsed = parse_str(&doc.to_ini_string()).unwrap();
        assert_eq!(reparsed, doc);
    }

    fn code_strategy() -> impl Strategy<Value = String> {
        "[A-Z]{1,3}[0-9]{0,3}"
    }

    proptest! {
        #[test]
        fn prop_suppressions_ignore_token_order(
            codes in prop::collection::vec(code_strategy(), 0..20),
            seed in any::<u64>(),
        ) {
            let mut shuffled = codes.clone();
            // Deterministic permutation driven by the seed
            let len = shuffled.len();
            if len > 1 {
                for i in 0..len {
                    let j = ((seed >> (i % 64)) as usize).wrapping_add(i * 7) % len;
                    shuffled.swap(i, j);
                }
            }

            let inline = format!("[flake8]\nextend-ignore = {}\n", codes.join(" "));
            let stacked = format!("[flake8]\nextend-ignore =\n    {}\n", shuffled.join("\n    "));
            let original = parse_str(&inline).unwrap();
            let permuted = parse_str(&stacked).unwrap();

            let a = original.lint_section().unwrap().suppressions("extend-ignore").unwrap();
            let b = permuted.lint_section().unwrap().suppressions("extend-ignore").unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_document_round_trip(
            codes in prop::collection::vec(code_strategy(), 0..10),
            length in 1i64..500,
            flag in any::<bool>(),
            quotes in "[a-z]{1,10}",
            patterns in prop::collection::vec("[;#]?[a-z0-9_./*]{1,8}", 0..8),
        ) {
            let text = format!(
                concat!(
                    "[flake8]\nmax-line-length = {}\nextend-ignore = {}\n",
                    "suppress-dummy-args = {}\nliteral-inline-quotes = {}\n",
                    "exclude = {}\n",
                ),
                length,
                codes.join(", "),
                flag,
                quotes,
                patterns.join(","),
            );
            let doc = parse_str(&text).unwrap();
            prop_assert_eq!(parse_str(&doc.to_ini_string()).unwrap(), doc);
        }
    }
}
