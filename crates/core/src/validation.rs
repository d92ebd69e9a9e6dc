//! On-demand structural validation of courses and modules.
//!
//! Construction only guarantees the `type` literal and a non-empty section list. A document
//! can still carry duplicate section ids, sections whose payload disagrees with their tag,
//! or payloads with blank required fields (for example after being edited in place, or when
//! it was assembled by hand). [`Validator::validate`] reports every such defect without
//! failing: it always returns a [`ValidationResult`].
//!
//! Strict mode adds format checks on identifiers, versions and language codes.

use crate::config::MecsConfig;
use crate::content::{ContentKind, SectionContent};
use crate::document::{Document, MecsDocument};
use crate::section::Section;
use crate::MecsError;
use mecs_types::{ContentTypeTag, LanguageCode, NonEmptyText, SemanticVersion};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stable, machine-readable code for a validation defect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    InvalidType,
    EmptySectionList,
    DuplicateSectionId,
    ContentTypeMismatch,
    MissingRequiredField,
    ReservedCustomField,

    // Strict mode only.
    InvalidVersion,
    InvalidLanguageCode,
    InvalidContentTypeTag,
    BlankField,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidType => "INVALID_TYPE",
            Self::EmptySectionList => "EMPTY_SECTION_LIST",
            Self::DuplicateSectionId => "DUPLICATE_SECTION_ID",
            Self::ContentTypeMismatch => "CONTENT_TYPE_MISMATCH",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::ReservedCustomField => "RESERVED_CUSTOM_FIELD",
            Self::InvalidVersion => "INVALID_VERSION",
            Self::InvalidLanguageCode => "INVALID_LANGUAGE_CODE",
            Self::InvalidContentTypeTag => "INVALID_CONTENT_TYPE_TAG",
            Self::BlankField => "BLANK_FIELD",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One defect found by the validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path to the offending field, for example `sections[1].content_type`.
    pub field: String,
    pub message: String,
    pub code: ValidationCode,
}

impl ValidationError {
    fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// Outcome of a validation pass. `valid` is true exactly when `errors` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors carrying the given code, in report order.
    pub fn errors_with_code(&self, code: ValidationCode) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |error| error.code == code)
    }

    pub fn has_code(&self, code: ValidationCode) -> bool {
        self.errors_with_code(code).next().is_some()
    }
}

/// Structural checker for courses and modules.
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator {
    strict: bool,
}

impl Validator {
    pub fn new(config: &MecsConfig) -> Self {
        Self {
            strict: config.strict_validation(),
        }
    }

    /// A validator with the strict format checks enabled.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Checks a course or module. Never fails; defects are collected in the result.
    ///
    /// Rules, in report order:
    /// 1. `type` matches the literal for the document kind,
    /// 2. `sections` is not empty,
    /// 3. section ids are unique (one error per repeated occurrence),
    /// 4. each section's payload agrees with its `content_type`,
    /// 5. required payload fields are present and not blank,
    /// 6. video and document custom fields do not reuse a typed field's key.
    ///
    /// Strict mode then checks `mecs_version`, `metadata.language`, tag syntax and blank
    /// ids/titles.
    pub fn validate<D: MecsDocument>(&self, document: &D) -> ValidationResult {
        let mut errors = Vec::new();

        let expected = D::KIND.type_literal();
        if document.doc_type() != expected {
            errors.push(ValidationError::new(
                "type",
                ValidationCode::InvalidType,
                format!(
                    "document type '{}' does not match '{}'",
                    document.doc_type(),
                    expected
                ),
            ));
        }

        let sections = document.sections();
        if sections.is_empty() {
            errors.push(ValidationError::new(
                "sections",
                ValidationCode::EmptySectionList,
                format!("{} must have at least one section", D::KIND),
            ));
        }

        let mut seen = HashSet::new();
        for (index, section) in sections.iter().enumerate() {
            if !seen.insert(section.id.as_str()) {
                errors.push(ValidationError::new(
                    format!("sections[{index}].id"),
                    ValidationCode::DuplicateSectionId,
                    format!("duplicate section id '{}'", section.id),
                ));
            }
        }

        for (index, section) in sections.iter().enumerate() {
            check_section_content(index, section, &mut errors);
        }

        if self.strict {
            check_strict(document, &mut errors);
        }

        let result = ValidationResult::from_errors(errors);
        if result.valid {
            tracing::debug!("{} '{}' passed validation", D::KIND, document.id());
        } else {
            tracing::warn!(
                "{} '{}' failed validation with {} error(s)",
                D::KIND,
                document.id(),
                result.errors.len()
            );
        }
        result
    }

    /// Checks either kind of document.
    pub fn validate_document(&self, document: &Document) -> ValidationResult {
        match document {
            Document::Course(course) => self.validate(course),
            Document::Module(module) => self.validate(module),
        }
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn check_section_content(index: usize, section: &Section, errors: &mut Vec<ValidationError>) {
    let tag = section.content_type.as_str();
    let claimed = ContentKind::from_tag(tag);

    match (claimed, &section.content) {
        (None, SectionContent::Opaque(_)) => {}
        (Some(kind), SectionContent::Opaque(payload)) => {
            // A known tag must hold its typed payload; opaque content there does not survive a
            // round trip unchanged.
            let detail = match SectionContent::from_tagged(kind.tag(), payload.clone()) {
                Err(MecsError::MissingRequiredField { field, .. }) => {
                    errors.push(ValidationError::new(
                        format!("sections[{index}].content.{field}"),
                        ValidationCode::MissingRequiredField,
                        format!("section '{}' ({tag}) is missing '{field}'", section.id),
                    ));
                    return;
                }
                Ok(_) => "an untyped payload".to_string(),
                Err(err) => format!("a payload that does not match it: {err}"),
            };
            errors.push(ValidationError::new(
                format!("sections[{index}].content_type"),
                ValidationCode::ContentTypeMismatch,
                format!("section '{}' is tagged {tag} but holds {detail}", section.id),
            ));
        }
        (claimed, content) => {
            let stored = content.kind();
            if stored != claimed {
                let stored_tag = stored.map_or("opaque", |kind| kind.tag());
                errors.push(ValidationError::new(
                    format!("sections[{index}].content_type"),
                    ValidationCode::ContentTypeMismatch,
                    format!(
                        "section '{}' is tagged {tag} but holds {stored_tag} content",
                        section.id
                    ),
                ));
                return;
            }
            check_required_fields(index, section, errors);
            check_custom_fields(index, section, errors);
        }
    }
}

fn check_custom_fields(index: usize, section: &Section, errors: &mut Vec<ValidationError>) {
    for key in section.content.shadowed_custom_fields() {
        errors.push(ValidationError::new(
            format!("sections[{index}].content.custom_fields.{key}"),
            ValidationCode::ReservedCustomField,
            format!(
                "section '{}' custom field '{key}' collides with a {} field",
                section.id, section.content_type
            ),
        ));
    }
}

fn check_required_fields(index: usize, section: &Section, errors: &mut Vec<ValidationError>) {
    let url = match &section.content {
        SectionContent::Video(video) => &video.url,
        SectionContent::Document(document) => &document.url,
        SectionContent::ModuleRef(module_ref) => &module_ref.url,
        SectionContent::Text(_) | SectionContent::Opaque(_) => return,
    };

    if url.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("sections[{index}].content.url"),
            ValidationCode::MissingRequiredField,
            format!("section '{}' ({}) has no url", section.id, section.content_type),
        ));
    }
}

fn check_strict<D: MecsDocument>(document: &D, errors: &mut Vec<ValidationError>) {
    if let Err(err) = SemanticVersion::parse(document.mecs_version()) {
        errors.push(ValidationError::new(
            "mecs_version",
            ValidationCode::InvalidVersion,
            err.to_string(),
        ));
    }

    if let Some(language) = document.metadata().and_then(|m| m.language.as_deref()) {
        if let Err(err) = LanguageCode::parse(language) {
            errors.push(ValidationError::new(
                "metadata.language",
                ValidationCode::InvalidLanguageCode,
                err.to_string(),
            ));
        }
    }

    check_not_blank("id", document.id(), errors);
    check_not_blank("title", document.title(), errors);

    for (index, section) in document.sections().iter().enumerate() {
        if let Err(err) = ContentTypeTag::parse(&section.content_type) {
            errors.push(ValidationError::new(
                format!("sections[{index}].content_type"),
                ValidationCode::InvalidContentTypeTag,
                err.to_string(),
            ));
        }
        check_not_blank(&format!("sections[{index}].id"), &section.id, errors);
        check_not_blank(&format!("sections[{index}].title"), &section.title, errors);
    }
}

fn check_not_blank(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if NonEmptyText::new(value).is_err() {
        errors.push(ValidationError::new(
            field,
            ValidationCode::BlankField,
            format!("{field} must not be blank"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{CourseBuilder, ModuleBuilder};
    use crate::content::{DocumentContent, ModuleRefContent, TextContent, VideoContent};
    use crate::document::Course;
    use crate::metadata::CourseMetadata;
    use crate::vocabulary::ContentFormat;
    use serde_json::json;

    fn text(id: &str) -> Section {
        Section::text(id, "Text", TextContent::new(ContentFormat::Plain, "hello"))
    }

    fn course_with(sections: Vec<Section>) -> Course {
        CourseBuilder::new("intro-python", "Introduction to Python")
            .sections(sections)
            .build()
            .expect("valid course")
    }

    #[test]
    fn freshly_built_documents_are_valid() {
        let course = course_with(vec![
            text("sec-001"),
            Section::video("sec-002", "Video", VideoContent::new("https://youtube.com/watch?v=a")),
            Section::from_raw("sec-003", "Quiz", "acme:quiz", json!({"q": 1})).expect("opaque"),
        ]);
        let result = Validator::default().validate(&course);
        assert!(result.valid);
        assert!(result.errors.is_empty());

        let module = ModuleBuilder::new("loops", "Loops")
            .add_section(text("a"))
            .build()
            .expect("valid module");
        assert!(Validator::strict().validate(&module).valid);
    }

    #[test]
    fn duplicate_ids_are_reported_once_per_repeat() {
        let course = course_with(vec![text("sec-001"), text("sec-001")]);
        let result = Validator::default().validate(&course);

        assert!(!result.valid);
        let duplicates: Vec<_> = result
            .errors_with_code(ValidationCode::DuplicateSectionId)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].field, "sections[1].id");
        assert!(duplicates[0].message.contains("sec-001"));

        let course = course_with(vec![text("a"), text("a"), text("b"), text("a")]);
        let result = Validator::default().validate(&course);
        assert_eq!(
            result
                .errors_with_code(ValidationCode::DuplicateSectionId)
                .count(),
            2
        );
    }

    #[test]
    fn text_tag_with_video_payload_is_a_mismatch() {
        let mislabelled = Section::new(
            "sec-002",
            "Mislabelled",
            "mecs:text",
            VideoContent::new("https://example.org/v.mp4").into(),
        );
        let course = course_with(vec![text("sec-001"), mislabelled]);
        let result = Validator::default().validate(&course);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.code, ValidationCode::ContentTypeMismatch);
        assert_eq!(error.field, "sections[1].content_type");
        assert!(error.message.contains("sec-002"));
    }

    #[test]
    fn unknown_tag_with_typed_payload_is_a_mismatch() {
        let section = Section::new(
            "sec-001",
            "Custom",
            "acme:slides",
            DocumentContent::new("https://example.org/deck.pdf").into(),
        );
        let result = Validator::default().validate(&course_with(vec![section]));
        assert!(result.has_code(ValidationCode::ContentTypeMismatch));
    }

    #[test]
    fn known_tag_with_opaque_payload_is_checked_against_the_tag() {
        let missing_url = Section::new(
            "sec-001",
            "Video",
            "mecs:video",
            SectionContent::Opaque(json!({"title": "Python Basics"})),
        );
        let wrong_shape = Section::new(
            "sec-002",
            "Text",
            "mecs:text",
            SectionContent::Opaque(json!("not an object")),
        );
        let untyped = Section::new(
            "sec-003",
            "Text",
            "mecs:text",
            SectionContent::Opaque(json!({"format": "plain", "text": "ok"})),
        );
        let result =
            Validator::default().validate(&course_with(vec![missing_url, wrong_shape, untyped]));

        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[0].code, ValidationCode::MissingRequiredField);
        assert_eq!(result.errors[0].field, "sections[0].content.url");
        assert_eq!(result.errors[1].code, ValidationCode::ContentTypeMismatch);
        assert_eq!(result.errors[1].field, "sections[1].content_type");
        assert_eq!(result.errors[2].code, ValidationCode::ContentTypeMismatch);
        assert_eq!(result.errors[2].field, "sections[2].content_type");
        assert!(result.errors[2].message.contains("untyped"));
    }

    #[test]
    fn custom_fields_reusing_typed_keys_are_reported() {
        let mut video = VideoContent::new("https://youtube.com/watch?v=a");
        video.custom_fields.insert("url".into(), json!("https://elsewhere.example/x"));
        video.custom_fields.insert("chapters".into(), json!([]));
        let mut document = DocumentContent::new("https://example.org/a.pdf");
        document.custom_fields.insert("doc_type".into(), json!("slides"));

        let course = course_with(vec![
            Section::video("sec-001", "Video", video),
            Section::document("sec-002", "Handout", document),
        ]);
        let result = Validator::default().validate(&course);

        assert!(!result.valid);
        let fields: Vec<_> = result
            .errors_with_code(ValidationCode::ReservedCustomField)
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(
            fields,
            vec![
                "sections[0].content.custom_fields.url",
                "sections[1].content.custom_fields.doc_type",
            ]
        );
        assert_eq!(result.errors.len(), 2);
        assert!(course.to_json().is_err());
    }

    #[test]
    fn blank_urls_are_missing_required_fields() {
        let section = Section::module_ref("sec-001", "Loops", ModuleRefContent::new("  "));
        let result = Validator::default().validate(&course_with(vec![section]));
        assert!(!result.valid);
        assert_eq!(result.errors[0].code, ValidationCode::MissingRequiredField);
        assert_eq!(result.errors[0].field, "sections[0].content.url");
    }

    #[test]
    fn edited_documents_are_revalidated() {
        let mut course = course_with(vec![text("sec-001")]);
        course.doc_type = "mecs:lesson".into();
        course.remove_section("sec-001");

        let result = Validator::default().validate(&course);
        let codes: Vec<_> = result.errors.iter().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![ValidationCode::InvalidType, ValidationCode::EmptySectionList]
        );
    }

    #[test]
    fn strict_mode_adds_format_checks() {
        let mut course = CourseBuilder::new("intro-python", "  ")
            .mecs_version("0.2")
            .metadata(CourseMetadata {
                language: Some("english".into()),
                ..CourseMetadata::default()
            })
            .add_section(
                Section::from_raw("", "Quiz", "Quiz", json!({})).expect("opaque section"),
            )
            .build()
            .expect("valid course");

        assert!(Validator::default().validate(&course).valid);

        let result = Validator::strict().validate(&course);
        for code in [
            ValidationCode::InvalidVersion,
            ValidationCode::InvalidLanguageCode,
            ValidationCode::InvalidContentTypeTag,
            ValidationCode::BlankField,
        ] {
            assert!(result.has_code(code), "missing {code}");
        }
        let blank: Vec<_> = result
            .errors_with_code(ValidationCode::BlankField)
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(blank, vec!["title", "sections[0].id"]);

        course.mecs_version = "0.2.0".into();
        let result = Validator::strict().validate(&course);
        assert!(!result.has_code(ValidationCode::InvalidVersion));
    }

    #[test]
    fn validator_follows_config() {
        let strict = MecsConfig::from_env_values(None, Some("true".into())).expect("config");
        assert!(Validator::new(&strict).is_strict());
        assert!(!Validator::new(&MecsConfig::default()).is_strict());
    }

    #[test]
    fn validate_document_covers_both_kinds() {
        let document = Document::from(course_with(vec![text("a"), text("a")]));
        let result = Validator::default().validate_document(&document);
        assert!(!result.valid);
    }

    #[test]
    fn result_serialises_with_stable_codes() {
        let course = course_with(vec![text("sec-001"), text("sec-001")]);
        let result = Validator::default().validate(&course);
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["valid"], json!(false));
        assert_eq!(value["errors"][0]["code"], json!("DUPLICATE_SECTION_ID"));
        assert_eq!(value["errors"][0]["field"], json!("sections[1].id"));
    }
}
