//! BCP-47 language tag (e.g. "en-US").
use std::borrow::Cow;

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Language(pub Cow<'static, str>);

impl Language {
    /// Create a new language tag.
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    /// Get the underlying language code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether two tags name the same locale.
    ///
    /// Hosts are inconsistent about casing and separators (`en_US`, `en-us`),
    /// so the comparison ignores both.
    pub fn matches(&self, other: &Language) -> bool {
        let lhs = self.0.chars().map(normalize);
        let rhs = other.0.chars().map(normalize);
        lhs.eq(rhs)
    }

    /// English (US)
    pub const ENGLISH_US: Self = Self(Cow::Borrowed("en-US"));

    /// English (UK)
    pub const ENGLISH_UK: Self = Self(Cow::Borrowed("en-GB"));

    /// French
    pub const FRENCH: Self = Self(Cow::Borrowed("fr-FR"));

    /// Japanese
    pub const JAPANESE: Self = Self(Cow::Borrowed("ja-JP"));
}

impl From<&'static str> for Language {
    fn from(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self(Cow::Owned(code))
    }
}

fn normalize(c: char) -> char {
    if c == '_' { '-' } else { c.to_ascii_lowercase() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_case_and_separator() {
        assert!(Language::ENGLISH_US.matches(&Language::from("en_us")));
        assert!(Language::ENGLISH_US.matches(&Language::from("EN-US")));
        assert!(!Language::ENGLISH_US.matches(&Language::ENGLISH_UK));
        assert!(!Language::ENGLISH_US.matches(&Language::from("en")));
    }
}
