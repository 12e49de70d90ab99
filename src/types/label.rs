use std::borrow::Borrow;
use std::fmt;

/// A decision label such as `NO_OFFER` or `BIG`.
///
/// Labels are compared exactly. Whether a label is usable is decided by the
/// [`Policy`](super::Policy) vocabulary, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        let mut chars = self.0.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_with_str() {
        let label = Label::new("BIG");
        assert_eq!(label, "BIG");
        assert_ne!(label, "big");
        assert_eq!(label.as_str(), "BIG");
    }

    #[test]
    fn identifier_check() {
        assert!(Label::new("NO_OFFER").is_identifier());
        assert!(Label::new("_tier2").is_identifier());
        assert!(!Label::new("").is_identifier());
        assert!(!Label::new("2BIG").is_identifier());
        assert!(!Label::new("BIG OFFER").is_identifier());
    }

    #[test]
    fn display() {
        assert_eq!(Label::from("SMALL").to_string(), "SMALL");
    }
}
