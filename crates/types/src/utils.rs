//! Utility functions and helpers

/// Normalize an option name: trimmed, lowercased, `_` replaced by `-`
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

/// Split a list value into tokens on whitespace and commas
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cut a value fragment at the first `#` that starts it or follows whitespace
pub fn strip_inline_comment(fragment: &str) -> &str {
    let mut after_whitespace = true;
    for (idx, c) in fragment.char_indices() {
        if c == '#' && after_whitespace {
            return fragment[..idx].trim_end();
        }
        after_whitespace = c.is_whitespace();
    }
    fragment.trim_end()
}

/// Parse the boolean spellings accepted in config files
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
