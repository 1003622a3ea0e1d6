//! Cache key derivation.

use std::fmt;

/// Normalized form of an input text, used only for cache addressing.
///
/// Not reversible to the original input. Inputs differing only in letter case
/// or surrounding whitespace share a key; nothing else is collapsed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims surrounding whitespace and lowercases with the simple (one-to-one)
/// case mapping.
pub fn normalize_key(text: &str) -> CacheKey {
    CacheKey(
        text.trim()
            .chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(" Hello ", "hello" ; "surrounding spaces")]
    #[test_case("HELLO", "hello" ; "upper case")]
    #[test_case("\t\nMixed Case\r\n", "mixed case" ; "tabs and newlines")]
    #[test_case("Hi   There", "hi   there" ; "inner whitespace kept")]
    #[test_case("Hello, World!", "hello, world!" ; "punctuation kept")]
    #[test_case("", "" ; "empty")]
    #[test_case("   ", "" ; "blank")]
    #[test_case("ÉCOLE", "école" ; "non ascii")]
    #[test_case("\u{130}stanbul", "istanbul" ; "simple mapping for dotted capital i")]
    fn test_normalize(input: &str, expected: &str) {
        assert_eq!(normalize_key(input).as_str(), expected);
    }

    #[test]
    fn test_equivalence() {
        assert_eq!(normalize_key(" Hello "), normalize_key("hello"));
        assert_ne!(normalize_key("Hello"), normalize_key("hello world"));
        assert_ne!(normalize_key("hi there"), normalize_key("hi   there"));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_key("  Some TEXT ");
        let twice = normalize_key(once.as_str());
        assert_eq!(once, twice);
    }
}
