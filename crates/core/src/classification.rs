//! Learning classification for courses and modules.
//!
//! Classification describes *what kind* of learning a document targets (a skill, a concept or
//! an event), *who* it is for (academic level) and *how far* it takes them (proficiency). It
//! also carries a reference to the canonical concept being taught, typically sourced from an
//! external knowledge base; this crate only stores those values, it never fetches them.

use crate::vocabulary::{parse_optional, Vocabulary};
use crate::MecsResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Type of learning content being taught.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LearningType {
    /// Practical ability to perform actions.
    Skill,
    /// Theoretical understanding of ideas.
    Concept,
    /// Historical or specific occurrences.
    Event,
}

impl Vocabulary for LearningType {
    const NAME: &'static str = "learning type";
    const ALL: &'static [Self] = &[Self::Skill, Self::Concept, Self::Event];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Concept => "concept",
            Self::Event => "event",
        }
    }
}

/// Academic level of the target learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcademicLevel {
    PreK,
    K2,
    Grades3To6,
    Grades7To8,
    Grades9To10,
    Grades11To12,
    UndergradLower,
    UndergradUpper,
    GradBreadth,
    PhdDepth,
}

impl Vocabulary for AcademicLevel {
    const NAME: &'static str = "academic level";
    const ALL: &'static [Self] = &[
        Self::PreK,
        Self::K2,
        Self::Grades3To6,
        Self::Grades7To8,
        Self::Grades9To10,
        Self::Grades11To12,
        Self::UndergradLower,
        Self::UndergradUpper,
        Self::GradBreadth,
        Self::PhdDepth,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::PreK => "pre-k",
            Self::K2 => "k-2",
            Self::Grades3To6 => "3-6",
            Self::Grades7To8 => "7-8",
            Self::Grades9To10 => "9-10",
            Self::Grades11To12 => "11-12",
            Self::UndergradLower => "undergrad-lower",
            Self::UndergradUpper => "undergrad-upper",
            Self::GradBreadth => "grad-breadth",
            Self::PhdDepth => "phd-depth",
        }
    }
}

impl AcademicLevel {
    /// Display name for this level.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreK => "Pre-Kindergarten",
            Self::K2 => "K-2nd Grade",
            Self::Grades3To6 => "3rd-6th Grade",
            Self::Grades7To8 => "7th-8th Grade",
            Self::Grades9To10 => "9th-10th Grade",
            Self::Grades11To12 => "11th-12th Grade",
            Self::UndergradLower => "College Underclassman",
            Self::UndergradUpper => "College Upperclassman",
            Self::GradBreadth => "Graduate Breadth",
            Self::PhdDepth => "PhD/Research Level",
        }
    }

    fn is_elementary_or_middle(&self) -> bool {
        matches!(
            self,
            Self::PreK | Self::K2 | Self::Grades3To6 | Self::Grades7To8
        )
    }
}

/// Proficiency the learner should reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProficiencyLevel {
    Understand,
    Discuss,
    Teach,
    Research,
}

impl Vocabulary for ProficiencyLevel {
    const NAME: &'static str = "proficiency level";
    const ALL: &'static [Self] = &[
        Self::Understand,
        Self::Discuss,
        Self::Teach,
        Self::Research,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Understand => "understand",
            Self::Discuss => "discuss",
            Self::Teach => "teach",
            Self::Research => "research",
        }
    }
}

impl ProficiencyLevel {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Understand => "Can comprehend discussions and ask meaningful questions",
            Self::Discuss => "Can hold conversations and explain to others",
            Self::Teach => "Can lecture, write articles, or lead independent projects",
            Self::Research => "Can conduct novel research and create new concepts",
        }
    }
}

/// Where a canonical concept was sourced from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConceptSourceType {
    Wikipedia,
    Academic,
    Textbook,
    Custom,
}

impl Vocabulary for ConceptSourceType {
    const NAME: &'static str = "concept source type";
    const ALL: &'static [Self] = &[
        Self::Wikipedia,
        Self::Academic,
        Self::Textbook,
        Self::Custom,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::Academic => "academic",
            Self::Textbook => "textbook",
            Self::Custom => "custom",
        }
    }
}

/// How a related course relates to the one that lists it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CourseRelationship {
    Prerequisite,
    NextLevel,
    Alternative,
    Supplement,
}

impl Vocabulary for CourseRelationship {
    const NAME: &'static str = "course relationship";
    const ALL: &'static [Self] = &[
        Self::Prerequisite,
        Self::NextLevel,
        Self::Alternative,
        Self::Supplement,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Prerequisite => "prerequisite",
            Self::NextLevel => "next-level",
            Self::Alternative => "alternative",
            Self::Supplement => "supplement",
        }
    }
}

/// Reference to the canonical concept a document teaches.
///
/// `metadata` holds whatever the acquisition side supplied (extract text, thumbnail URL,
/// categories, related concepts, verification timestamp) as an open map.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalConceptRef {
    pub concept_id: String,
    pub title: String,
    pub source_url: Option<String>,
    pub source_type: Option<ConceptSourceType>,
    pub metadata: Map<String, Value>,
}

impl CanonicalConceptRef {
    pub fn new(concept_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            title: title.into(),
            source_url: None,
            source_type: None,
            metadata: Map::new(),
        }
    }
}

/// A course covering the same concept under a different classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedCourse {
    pub course_id: String,
    pub title: String,
    pub mecs_url: Option<String>,
    pub relationship: CourseRelationship,
    pub learning_type: Option<LearningType>,
    pub academic_level: Option<AcademicLevel>,
    pub proficiency_level: Option<ProficiencyLevel>,
}

/// A complete learning classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LearningClassification {
    pub learning_type: LearningType,
    pub academic_level: AcademicLevel,
    pub proficiency_level: ProficiencyLevel,
}

/// Outcome of [`LearningClassification::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

impl LearningClassification {
    pub fn new(
        learning_type: LearningType,
        academic_level: AcademicLevel,
        proficiency_level: ProficiencyLevel,
    ) -> Self {
        Self {
            learning_type,
            academic_level,
            proficiency_level,
        }
    }

    /// Checks whether this combination is a sensible one to publish.
    ///
    /// Only errors make the classification invalid; warnings and suggestions are advisory.
    pub fn validate(&self) -> ClassificationReport {
        let mut report = ClassificationReport::default();

        if self.academic_level == AcademicLevel::PreK
            && self.proficiency_level != ProficiencyLevel::Understand
        {
            report
                .warnings
                .push("Pre-K courses typically target 'understand' proficiency level".into());
        }

        if self.academic_level == AcademicLevel::PhdDepth
            && self.proficiency_level == ProficiencyLevel::Understand
        {
            report
                .warnings
                .push("PhD-level courses typically target 'teach' or 'research' proficiency".into());
        }

        if self.proficiency_level == ProficiencyLevel::Research
            && self.academic_level.is_elementary_or_middle()
        {
            report.errors.push(
                "Research proficiency is not appropriate for elementary/middle school levels"
                    .into(),
            );
        }

        if self.learning_type == LearningType::Event
            && matches!(self.academic_level, AcademicLevel::PreK | AcademicLevel::K2)
        {
            report.suggestions.push(
                "Consider teaching historical events as simplified concepts for young learners"
                    .into(),
            );
        }

        report.valid = report.errors.is_empty();
        report
    }

    /// Derives a course id of the form `{concept}-{academic}-{learning}-{proficiency}`.
    pub fn course_id(&self, concept_id: &str) -> String {
        format!(
            "{}-{}-{}-{}",
            concept_id,
            self.academic_level.as_str(),
            self.learning_type.as_str(),
            self.proficiency_level.as_str()
        )
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct CanonicalConceptWire {
    pub concept_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl CanonicalConceptWire {
    pub(crate) fn into_domain(self) -> MecsResult<CanonicalConceptRef> {
        Ok(CanonicalConceptRef {
            concept_id: self.concept_id,
            title: self.title,
            source_url: self.source_url,
            source_type: parse_optional(self.source_type.as_deref())?,
            metadata: self.metadata,
        })
    }

    pub(crate) fn from_domain(concept: &CanonicalConceptRef) -> Self {
        Self {
            concept_id: concept.concept_id.clone(),
            title: concept.title.clone(),
            source_url: concept.source_url.clone(),
            source_type: concept.source_type.map(|s| s.as_str().to_string()),
            metadata: concept.metadata.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct RelatedCourseWire {
    pub course_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mecs_url: Option<String>,
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency_level: Option<String>,
}

impl RelatedCourseWire {
    pub(crate) fn into_domain(self) -> MecsResult<RelatedCourse> {
        Ok(RelatedCourse {
            course_id: self.course_id,
            title: self.title,
            mecs_url: self.mecs_url,
            relationship: CourseRelationship::parse(&self.relationship)?,
            learning_type: parse_optional(self.learning_type.as_deref())?,
            academic_level: parse_optional(self.academic_level.as_deref())?,
            proficiency_level: parse_optional(self.proficiency_level.as_deref())?,
        })
    }

    pub(crate) fn from_domain(related: &RelatedCourse) -> Self {
        Self {
            course_id: related.course_id.clone(),
            title: related.title.clone(),
            mecs_url: related.mecs_url.clone(),
            relationship: related.relationship.as_str().to_string(),
            learning_type: related.learning_type.map(|v| v.as_str().to_string()),
            academic_level: related.academic_level.map(|v| v.as_str().to_string()),
            proficiency_level: related.proficiency_level.map(|v| v.as_str().to_string()),
        }
    }
}
