//! Validated primitive text types shared by the MECS document model.
//!
//! Every type here wraps a `String` and guarantees its shape once constructed. They are used
//! where the model needs more than an opaque string: configuration, strict validation, and
//! callers that want to check values before handing them to a builder.

use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    #[error("invalid semantic version '{0}' (expected MAJOR.MINOR.PATCH)")]
    InvalidVersion(String),

    #[error("invalid language code '{0}' (expected a two-letter ISO 639-1 code)")]
    InvalidLanguageCode(String),

    #[error("invalid content type tag '{0}' (expected namespace:name using [a-z0-9-])")]
    InvalidContentTypeTag(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::Empty`] if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A `MAJOR.MINOR.PATCH` version string, as carried in a document's `mecs_version`.
///
/// Only plain numeric components are accepted; pre-release and build suffixes are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a version of the form `MAJOR.MINOR.PATCH`.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidVersion`] if there are not exactly three dot-separated
    /// components, or any component is empty or contains a non-digit.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidVersion(raw.to_string());

        let mut parts = raw.split('.');
        let mut next = || -> Result<u64, TypesError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };

        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for SemanticVersion {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An ISO 639-1 language code: exactly two ASCII lowercase letters (for example `en`).
///
/// This is a shape check only; the code is not looked up in the ISO registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if raw.len() == 2 && raw.bytes().all(|b| b.is_ascii_lowercase()) {
            return Ok(Self(raw.to_string()));
        }
        Err(TypesError::InvalidLanguageCode(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A section content type tag such as `mecs:text` or `acme:flashcards`.
///
/// Canonical form is `namespace:name` where both sides are non-empty and drawn from
/// `a-z`, `0-9` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentTypeTag(String);

impl ContentTypeTag {
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        fn is_segment(segment: &str) -> bool {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-'))
        }

        match raw.split_once(':') {
            Some((namespace, name)) if is_segment(namespace) && is_segment(name) => {
                Ok(Self(raw.to_string()))
            }
            _ => Err(TypesError::InvalidContentTypeTag(raw.to_string())),
        }
    }

    /// Returns the part before the colon (for example `mecs`).
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ContentTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContentTypeTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for SemanticVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for SemanticVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SemanticVersion::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for LanguageCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for LanguageCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LanguageCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for ContentTypeTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ContentTypeTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContentTypeTag::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let text = NonEmptyText::new("  Welcome  ").expect("non-empty");
        assert_eq!(text.as_str(), "Welcome");
        assert_eq!(NonEmptyText::new("   "), Err(TypesError::Empty));
    }

    #[test]
    fn semantic_version_parses_three_numeric_components() {
        let version = SemanticVersion::parse("0.2.0").expect("valid version");
        assert_eq!(version, SemanticVersion::new(0, 2, 0));
        assert_eq!(version.to_string(), "0.2.0");
        assert!(SemanticVersion::new(0, 3, 0) > version);
    }

    #[test]
    fn semantic_version_rejects_malformed_input() {
        for raw in ["", "1", "1.2", "1.2.3.4", "1.x.3", "1..3", "v1.2.3", "1.2.3-beta", " 1.2.3"] {
            let err = SemanticVersion::parse(raw).expect_err("should reject");
            assert_eq!(err, TypesError::InvalidVersion(raw.to_string()));
        }
    }

    #[test]
    fn language_code_requires_two_lowercase_letters() {
        assert_eq!(LanguageCode::parse("en").expect("valid").as_str(), "en");
        assert!(LanguageCode::parse("EN").is_err());
        assert!(LanguageCode::parse("eng").is_err());
        assert!(LanguageCode::parse("e1").is_err());
    }

    #[test]
    fn content_type_tag_requires_namespace_and_name() {
        let tag = ContentTypeTag::parse("mecs:module-ref").expect("valid tag");
        assert_eq!(tag.namespace(), "mecs");

        assert!(ContentTypeTag::parse("acme:flash-cards2").is_ok());
        assert!(ContentTypeTag::parse("mecs").is_err());
        assert!(ContentTypeTag::parse(":text").is_err());
        assert!(ContentTypeTag::parse("mecs:").is_err());
        assert!(ContentTypeTag::parse("MECS:Text").is_err());
        assert!(ContentTypeTag::parse("mecs:text:extra").is_err());
    }

    #[test]
    fn validated_types_serialise_as_plain_strings() {
        let version: SemanticVersion = serde_json::from_str("\"1.4.2\"").expect("deserialize");
        assert_eq!(serde_json::to_string(&version).expect("serialize"), "\"1.4.2\"");

        let err = serde_json::from_str::<LanguageCode>("\"english\"").expect_err("reject");
        assert!(err.to_string().contains("ISO 639-1"));
    }
}
