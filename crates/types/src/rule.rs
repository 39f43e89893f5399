//! Rule-code tokens and suppression sets

use crate::utils::split_tokens;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Opaque identifier for a class of lint diagnostic (`WPS400`, `D`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleCode(String);

impl RuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token has the shape flake8 accepts: 1-3 capitals then 0-3 digits
    pub fn is_well_formed(&self) -> bool {
        let letters = self.0.chars().take_while(|c| c.is_ascii_uppercase()).count();
        let digits = self.0[letters..].chars().take_while(|c| c.is_ascii_digit()).count();
        (1..=3).contains(&letters) && digits <= 3 && letters + digits == self.0.len()
    }
}

impl Borrow<str> for RuleCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of rule codes excluded from reporting
///
/// Order of insertion is irrelevant and duplicates collapse. Membership is
/// exact: `D` does not cover `D100`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    codes: BTreeSet<RuleCode>,
}

impl SuppressionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a whitespace or comma separated token list
    pub fn parse(raw: &str) -> Self {
        split_tokens(raw).into_iter().collect()
    }

    /// Insert a code; returns `false` when it was already present
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        self.codes.insert(RuleCode::new(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &RuleCode> {
        self.codes.iter()
    }

    pub fn union(&self, other: &SuppressionSet) -> SuppressionSet {
        SuppressionSet {
            codes: self.codes.union(&other.codes).cloned().collect(),
        }
    }

    pub fn intersection(&self, other: &SuppressionSet) -> SuppressionSet {
        SuppressionSet {
            codes: self.codes.intersection(&other.codes).cloned().collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for SuppressionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(|code| RuleCode::new(code)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SuppressionSet {
    type Item = &'a RuleCode;
    type IntoIter = std::collections::btree_set::Iter<'a, RuleCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl Serialize for SuppressionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.codes.iter())
    }
}

// Accepts a token string ("D I, S101") as well as a sequence of tokens, so
// both list-typed settings and plain environment strings deserialize.
impl<'de> Deserialize<'de> for SuppressionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SuppressionVisitor;

        impl<'de> Visitor<'de> for SuppressionVisitor {
            type Value = SuppressionSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of rule codes or a separated string of rule codes")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(SuppressionSet::parse(value))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut set = SuppressionSet::new();
                while let Some(token) = seq.next_element::<String>()? {
                    for code in split_tokens(&token) {
                        set.insert(code);
                    }
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(SuppressionVisitor)
    }
}
