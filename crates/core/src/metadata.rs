//! Descriptive metadata attached to courses, modules and sections.
//!
//! Course and module metadata share one shape ([`DocumentMetadata`]); the aliases exist so
//! call sites read naturally. All fields are optional.

use crate::classification::{
    AcademicLevel, CanonicalConceptRef, CanonicalConceptWire, LearningClassification,
    LearningType, ProficiencyLevel, RelatedCourse, RelatedCourseWire,
};
use crate::values::{Duration, DurationWire};
use crate::vocabulary::{parse_optional, DifficultyLevel, SectionDifficulty, Vocabulary};
use crate::MecsResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Metadata for a course or module.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentMetadata {
    pub author: Option<String>,
    pub institution: Option<String>,
    pub subject: Option<String>,
    pub level: Option<DifficultyLevel>,

    /// ISO 639-1 language code, for example `en`.
    pub language: Option<String>,
    pub duration: Option<Duration>,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub tags: BTreeSet<String>,

    /// License identifier, for example `CC-BY-4.0`.
    pub license: Option<String>,

    /// Semantic version of the content itself (not the format).
    pub version: Option<String>,

    pub canonical_concept: Option<CanonicalConceptRef>,
    pub learning_type: Option<LearningType>,
    pub academic_level: Option<AcademicLevel>,
    pub proficiency_level: Option<ProficiencyLevel>,
    pub related_courses: Vec<RelatedCourse>,
}

pub type CourseMetadata = DocumentMetadata;
pub type ModuleMetadata = DocumentMetadata;

impl DocumentMetadata {
    /// The learning classification, if all three of its parts are set.
    pub fn classification(&self) -> Option<LearningClassification> {
        Some(LearningClassification::new(
            self.learning_type?,
            self.academic_level?,
            self.proficiency_level?,
        ))
    }

    /// Sets all three classification parts at once.
    pub fn set_classification(&mut self, classification: LearningClassification) {
        self.learning_type = Some(classification.learning_type);
        self.academic_level = Some(classification.academic_level);
        self.proficiency_level = Some(classification.proficiency_level);
    }
}

/// Metadata for a single section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionMetadata {
    pub duration: Option<Duration>,
    pub difficulty: Option<SectionDifficulty>,
    pub learning_objectives: Vec<String>,
    pub keywords: BTreeSet<String>,
    pub is_optional: bool,

    /// Ids of sections to complete first. They are not required to exist in the document.
    pub prerequisites: Vec<String>,
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct DocumentMetadataWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<DurationWire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    learning_objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canonical_concept: Option<CanonicalConceptWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    learning_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    academic_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    proficiency_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    related_courses: Vec<RelatedCourseWire>,
}

impl DocumentMetadataWire {
    pub(crate) fn into_domain(self) -> MecsResult<DocumentMetadata> {
        Ok(DocumentMetadata {
            author: self.author,
            institution: self.institution,
            subject: self.subject,
            level: parse_optional(self.level.as_deref())?,
            language: self.language,
            duration: self.duration.map(DurationWire::into_domain).transpose()?,
            prerequisites: self.prerequisites,
            learning_objectives: self.learning_objectives,
            tags: self.tags.into_iter().collect(),
            license: self.license,
            version: self.version,
            canonical_concept: self
                .canonical_concept
                .map(CanonicalConceptWire::into_domain)
                .transpose()?,
            learning_type: parse_optional(self.learning_type.as_deref())?,
            academic_level: parse_optional(self.academic_level.as_deref())?,
            proficiency_level: parse_optional(self.proficiency_level.as_deref())?,
            related_courses: self
                .related_courses
                .into_iter()
                .map(RelatedCourseWire::into_domain)
                .collect::<MecsResult<_>>()?,
        })
    }

    pub(crate) fn from_domain(metadata: &DocumentMetadata) -> Self {
        Self {
            author: metadata.author.clone(),
            institution: metadata.institution.clone(),
            subject: metadata.subject.clone(),
            level: metadata.level.map(|v| v.as_str().to_string()),
            language: metadata.language.clone(),
            duration: metadata.duration.as_ref().map(DurationWire::from_domain),
            prerequisites: metadata.prerequisites.clone(),
            learning_objectives: metadata.learning_objectives.clone(),
            tags: metadata.tags.iter().cloned().collect(),
            license: metadata.license.clone(),
            version: metadata.version.clone(),
            canonical_concept: metadata
                .canonical_concept
                .as_ref()
                .map(CanonicalConceptWire::from_domain),
            learning_type: metadata.learning_type.map(|v| v.as_str().to_string()),
            academic_level: metadata.academic_level.map(|v| v.as_str().to_string()),
            proficiency_level: metadata.proficiency_level.map(|v| v.as_str().to_string()),
            related_courses: metadata
                .related_courses
                .iter()
                .map(RelatedCourseWire::from_domain)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct SectionMetadataWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<DurationWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    learning_objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    is_optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prerequisites: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SectionMetadataWire {
    pub(crate) fn into_domain(self) -> MecsResult<SectionMetadata> {
        Ok(SectionMetadata {
            duration: self.duration.map(DurationWire::into_domain).transpose()?,
            difficulty: parse_optional(self.difficulty.as_deref())?,
            learning_objectives: self.learning_objectives,
            keywords: self.keywords.into_iter().collect(),
            is_optional: self.is_optional,
            prerequisites: self.prerequisites,
        })
    }

    pub(crate) fn from_domain(metadata: &SectionMetadata) -> Self {
        Self {
            duration: metadata.duration.as_ref().map(DurationWire::from_domain),
            difficulty: metadata.difficulty.map(|v| v.as_str().to_string()),
            learning_objectives: metadata.learning_objectives.clone(),
            keywords: metadata.keywords.iter().cloned().collect(),
            is_optional: metadata.is_optional,
            prerequisites: metadata.prerequisites.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::TimeUnit;
    use crate::MecsError;

    #[test]
    fn document_metadata_parses_and_deduplicates_tags() {
        let input = r#"{
            "author": "Dr. Jane Doe",
            "level": "beginner",
            "language": "en",
            "duration": {"value": 8, "unit": "weeks"},
            "tags": ["python", "programming", "python"]
        }"#;
        let wire: DocumentMetadataWire = serde_json::from_str(input).expect("parse metadata");
        let metadata = wire.into_domain().expect("valid metadata");

        assert_eq!(metadata.author.as_deref(), Some("Dr. Jane Doe"));
        assert_eq!(metadata.level, Some(DifficultyLevel::Beginner));
        assert_eq!(
            metadata.duration,
            Some(Duration::new(8.0, TimeUnit::Weeks).expect("duration"))
        );
        assert_eq!(metadata.tags.len(), 2);
    }

    #[test]
    fn document_metadata_rejects_unknown_level() {
        let wire: DocumentMetadataWire =
            serde_json::from_str(r#"{"level": "guru"}"#).expect("parse metadata");
        let err = wire.into_domain().expect_err("should reject level");
        assert!(matches!(
            err,
            MecsError::InvalidEnumValue { vocabulary: "difficulty level", .. }
        ));
    }

    #[test]
    fn document_metadata_rejects_negative_duration() {
        let wire: DocumentMetadataWire =
            serde_json::from_str(r#"{"duration": {"value": -2, "unit": "days"}}"#)
                .expect("parse metadata");
        let err = wire.into_domain().expect_err("should reject duration");
        assert!(matches!(err, MecsError::InvalidValue { .. }));
    }

    #[test]
    fn classification_requires_all_three_parts() {
        let mut metadata = DocumentMetadata {
            learning_type: Some(LearningType::Concept),
            academic_level: Some(AcademicLevel::UndergradLower),
            ..DocumentMetadata::default()
        };
        assert_eq!(metadata.classification(), None);

        metadata.proficiency_level = Some(ProficiencyLevel::Understand);
        let classification = metadata.classification().expect("complete classification");
        assert_eq!(classification.academic_level, AcademicLevel::UndergradLower);
    }

    #[test]
    fn empty_section_metadata_renders_as_empty_object() {
        let wire = SectionMetadataWire::from_domain(&SectionMetadata::default());
        assert_eq!(serde_json::to_string(&wire).expect("serialize"), "{}");
    }

    #[test]
    fn section_metadata_keeps_optional_flag_and_prerequisites() {
        let input = r#"{"difficulty": "hard", "is_optional": true, "prerequisites": ["sec-001", "sec-404"]}"#;
        let wire: SectionMetadataWire = serde_json::from_str(input).expect("parse metadata");
        let metadata = wire.into_domain().expect("valid metadata");
        assert_eq!(metadata.difficulty, Some(SectionDifficulty::Hard));
        assert!(metadata.is_optional);
        assert_eq!(metadata.prerequisites, vec!["sec-001", "sec-404"]);
    }

    #[test]
    fn section_metadata_rejects_unknown_keys() {
        let result = serde_json::from_str::<SectionMetadataWire>(r#"{"optional": true}"#);
        assert!(result.is_err());
    }
}
