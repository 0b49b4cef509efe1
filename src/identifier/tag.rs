//! Tag - optional short label qualifying a UUID
//!
//! A tag is 0 to 32 ASCII characters from `[A-Za-z0-9_]` whose first
//! character is a letter or underscore. The empty tag is legal and distinct
//! from every non-empty tag.

use std::fmt;
use std::str::FromStr;

use super::errors::{IdentifierError, IdentifierResult};

/// Maximum tag length in bytes.
pub const TAG_MAX_LENGTH: usize = 32;

#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(String);

impl Tag {
    /// Validate and wrap a tag.
    pub fn new(text: &str) -> IdentifierResult<Self> {
        if !Self::is_valid(text) {
            return Err(IdentifierError::MalformedTag(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    /// The empty tag.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns true if `text` is a legal tag.
    pub fn is_valid(text: &str) -> bool {
        if text.len() > TAG_MAX_LENGTH {
            return false;
        }
        let mut chars = text.chars();
        match chars.next() {
            None => true,
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            Some(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Tag {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tag_is_legal() {
        let tag = Tag::new("").unwrap();
        assert!(tag.is_empty());
        assert_eq!(tag, Tag::empty());
    }

    #[test]
    fn test_tag_character_class() {
        assert!(Tag::new("cc").is_ok());
        assert!(Tag::new("_batch_01").is_ok());
        assert!(Tag::new("Blue").is_ok());
        assert!(Tag::new("has-dash").is_err());
        assert!(Tag::new("has space").is_err());
        assert!(Tag::new("é").is_err());
    }

    #[test]
    fn test_tag_must_not_start_with_digit() {
        assert!(Tag::new("1abc").is_err());
        assert!(Tag::new("a1bc").is_ok());
    }

    #[test]
    fn test_tag_length_limit() {
        let max = "a".repeat(TAG_MAX_LENGTH);
        assert!(Tag::new(&max).is_ok());
        let over = "a".repeat(TAG_MAX_LENGTH + 1);
        assert_eq!(
            Tag::new(&over),
            Err(IdentifierError::MalformedTag(over.clone()))
        );
    }

    #[test]
    fn test_empty_tag_differs_from_non_empty() {
        assert_ne!(Tag::empty(), Tag::new("x").unwrap());
        assert!(Tag::empty() < Tag::new("x").unwrap());
    }
}
