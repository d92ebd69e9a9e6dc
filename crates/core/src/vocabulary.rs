//! Closed vocabularies used by MECS documents.
//!
//! Each vocabulary is a fixed set of string values. Parsing is exact (case-sensitive) and any
//! value outside the set fails with [`MecsError::InvalidEnumValue`]; nothing is silently
//! defaulted.

use crate::{MecsError, MecsResult};

/// A closed set of wire strings backed by an enum.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Human-readable name of the vocabulary, used in error messages.
    const NAME: &'static str;

    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// The wire spelling of this member.
    fn as_str(&self) -> &'static str;

    /// Parses a wire string into a member of this vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`MecsError::InvalidEnumValue`] if `raw` is not one of the members' wire
    /// spellings.
    fn parse(raw: &str) -> MecsResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.as_str() == raw)
            .ok_or_else(|| MecsError::InvalidEnumValue {
                vocabulary: Self::NAME,
                value: raw.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|member| member.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Parses an optional wire string, keeping `None` as `None`.
pub(crate) fn parse_optional<V: Vocabulary>(raw: Option<&str>) -> MecsResult<Option<V>> {
    raw.map(V::parse).transpose()
}

/// Course/module difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Vocabulary for DifficultyLevel {
    const NAME: &'static str = "difficulty level";
    const ALL: &'static [Self] = &[
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

/// Section difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionDifficulty {
    Easy,
    Medium,
    Hard,
}

impl Vocabulary for SectionDifficulty {
    const NAME: &'static str = "section difficulty";
    const ALL: &'static [Self] = &[Self::Easy, Self::Medium, Self::Hard];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Markup format of text content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    Markdown,
    Html,
    Plain,
}

impl Vocabulary for ContentFormat {
    const NAME: &'static str = "content format";
    const ALL: &'static [Self] = &[Self::Markdown, Self::Html, Self::Plain];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Plain => "plain",
        }
    }
}

/// Video hosting provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VideoProvider {
    Youtube,
    Vimeo,
    Custom,
}

impl Vocabulary for VideoProvider {
    const NAME: &'static str = "video provider";
    const ALL: &'static [Self] = &[Self::Youtube, Self::Vimeo, Self::Custom];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
            Self::Custom => "custom",
        }
    }
}

/// Unit of a [`crate::Duration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

impl Vocabulary for TimeUnit {
    const NAME: &'static str = "time unit";
    const ALL: &'static [Self] = &[
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }
}

/// How an external resolver should treat a module reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CacheStrategyKind {
    AlwaysFetch,
    CacheFirst,
    #[default]
    NetworkFirst,
}

impl Vocabulary for CacheStrategyKind {
    const NAME: &'static str = "cache strategy";
    const ALL: &'static [Self] = &[Self::AlwaysFetch, Self::CacheFirst, Self::NetworkFirst];

    fn as_str(&self) -> &'static str {
        match self {
            Self::AlwaysFetch => "always-fetch",
            Self::CacheFirst => "cache-first",
            Self::NetworkFirst => "network-first",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_member_from_its_wire_spelling() {
        for level in DifficultyLevel::ALL {
            assert_eq!(DifficultyLevel::parse(level.as_str()).expect("parse"), *level);
        }
        for unit in TimeUnit::ALL {
            assert_eq!(TimeUnit::parse(unit.as_str()).expect("parse"), *unit);
        }
        assert_eq!(
            CacheStrategyKind::parse("always-fetch").expect("parse"),
            CacheStrategyKind::AlwaysFetch
        );
    }

    #[test]
    fn rejects_values_outside_the_vocabulary() {
        let err = DifficultyLevel::parse("novice").expect_err("should reject");
        match err {
            MecsError::InvalidEnumValue {
                vocabulary,
                value,
                expected,
            } => {
                assert_eq!(vocabulary, "difficulty level");
                assert_eq!(value, "novice");
                assert_eq!(expected, "beginner, intermediate, advanced, expert");
            }
            other => panic!("expected InvalidEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!(ContentFormat::parse("Markdown").is_err());
        assert!(VideoProvider::parse("YOUTUBE").is_err());
        assert!(CacheStrategyKind::parse("cache_first").is_err());
    }

    #[test]
    fn cache_strategy_defaults_to_network_first() {
        assert_eq!(CacheStrategyKind::default(), CacheStrategyKind::NetworkFirst);
    }
}
