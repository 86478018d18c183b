use crate::error::Result;
use regex::bytes::{NoExpand, Regex};
use std::borrow::Cow;
use std::fmt;

/// Old and new `<name>.<version>` library references.
///
/// Matching is a literal, case-sensitive search over raw bytes; versions are
/// never parsed and recipes need not be valid UTF-8.
#[derive(Debug, Clone)]
pub struct SonameTokens {
    old: String,
    new: String,
    old_pattern: Regex,
    new_pattern: Regex,
}

impl SonameTokens {
    pub fn new(lib_name: &str, old_version: &str, new_version: &str) -> Result<Self> {
        let old = format!("{}.{}", lib_name, old_version);
        let new = format!("{}.{}", lib_name, new_version);

        Ok(Self {
            old_pattern: Regex::new(&regex::escape(&old))?,
            new_pattern: Regex::new(&regex::escape(&new))?,
            old,
            new,
        })
    }

    pub fn old_token(&self) -> &str {
        &self.old
    }

    pub fn new_token(&self) -> &str {
        &self.new
    }

    pub fn has_old(&self, line: &[u8]) -> bool {
        self.old_pattern.is_match(line)
    }

    pub fn has_new(&self, line: &[u8]) -> bool {
        self.new_pattern.is_match(line)
    }

    /// Replaces every occurrence of the old token with the new one.
    pub fn substitute<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        self.old_pattern
            .replace_all(line, NoExpand(self.new.as_bytes()))
    }
}

impl fmt::Display for SonameTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.old, self.new)
    }
}
