//! Course and module documents and their JSON/YAML codec.
//!
//! Both document kinds share one structural contract, captured by [`MecsDocument`]:
//! - construction checks only the `type` literal and that `sections` is non-empty,
//! - section edits (`add_section`, `remove_section`) never fail, so a document may pass
//!   through states that would not validate,
//! - everything else (duplicate ids, tag/payload agreement) is left to
//!   [`crate::Validator`].
//!
//! Decoding is two-phase: the text is first parsed into internal wire structs (shape errors
//! become [`MecsError::SchemaMismatch`] with a field path), then converted into domain values
//! (vocabulary and construction errors).

use crate::constants::{COURSE_TYPE, MODULE_TYPE};
use crate::metadata::{CourseMetadata, DocumentMetadata, DocumentMetadataWire, ModuleMetadata};
use crate::section::{Section, SectionWire};
use crate::{MecsError, MecsResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Public domain-level types
// ============================================================================

/// The two kinds of MECS document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Course,
    Module,
}

impl DocumentKind {
    /// The `type` literal documents of this kind must carry.
    pub fn type_literal(&self) -> &'static str {
        match self {
            Self::Course => COURSE_TYPE,
            Self::Module => MODULE_TYPE,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course => f.write_str("course"),
            Self::Module => f.write_str("module"),
        }
    }
}

/// Behaviour shared by [`Course`] and [`Module`].
pub trait MecsDocument {
    const KIND: DocumentKind;

    fn id(&self) -> &str;
    fn title(&self) -> &str;

    /// The stored `type` discriminator.
    fn doc_type(&self) -> &str;
    fn mecs_version(&self) -> &str;
    fn metadata(&self) -> Option<&DocumentMetadata>;
    fn sections(&self) -> &[Section];
    fn sections_mut(&mut self) -> &mut Vec<Section>;

    /// First section with the given id. Duplicates are not an error here.
    fn get_section(&self, id: &str) -> Option<&Section> {
        self.sections().iter().find(|section| section.id == id)
    }

    /// Appends a section without checking for duplicate ids.
    fn add_section(&mut self, section: Section) {
        self.sections_mut().push(section);
    }

    /// Removes every section with the given id. Returns whether anything was removed.
    ///
    /// Removing the last section is allowed; the document will then fail validation.
    fn remove_section(&mut self, id: &str) -> bool {
        let sections = self.sections_mut();
        let before = sections.len();
        sections.retain(|section| section.id != id);
        sections.len() != before
    }

    /// Sections in traversal order.
    ///
    /// A section's sort key is its `order` if set, otherwise its position in the list. The
    /// sort is stable, so ties keep storage order. Storage order is left untouched.
    fn ordered_sections(&self) -> Vec<&Section> {
        let mut keyed: Vec<(i64, &Section)> = self
            .sections()
            .iter()
            .enumerate()
            .map(|(position, section)| (section.order.unwrap_or(position as i64), section))
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, section)| section).collect()
    }
}

/// A course: the top-level MECS document.
#[derive(Clone, Debug, PartialEq)]
pub struct Course {
    pub mecs_version: String,
    pub doc_type: String,
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub sections: Vec<Section>,
    pub metadata: Option<CourseMetadata>,

    /// Assessment data, carried without interpretation. `Some(Value::Null)` is an explicit
    /// `null` on the wire, kept apart from an absent key.
    pub assessments: Option<Value>,
    pub extensions: Map<String, Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Creates a course, checking the `type` literal and that there is at least one section.
    ///
    /// # Errors
    ///
    /// - [`MecsError::InvalidType`] if `doc_type` is not `mecs:course`,
    /// - [`MecsError::EmptySectionList`] if `sections` is empty.
    pub fn new(
        mecs_version: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
        title: impl Into<String>,
        sections: Vec<Section>,
    ) -> MecsResult<Self> {
        let doc_type = doc_type.into();
        check_construction(DocumentKind::Course, &doc_type, &sections)?;
        Ok(Self {
            mecs_version: mecs_version.into(),
            doc_type,
            id: id.into(),
            title: title.into(),
            description: None,
            sections,
            metadata: None,
            assessments: None,
            extensions: Map::new(),
            created_at: None,
            updated_at: None,
        })
    }

    /// Parses a course from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MecsError::SchemaMismatch`] if the text does not match the wire shape, or
    /// any construction error listed on [`Course::new`] and on
    /// [`crate::SectionContent::from_tagged`].
    pub fn from_json(input: &str) -> MecsResult<Self> {
        Self::from_wire(decode_json(input)?)
    }

    /// Parses a course from YAML text. Same shape and errors as [`Course::from_json`].
    pub fn from_yaml(input: &str) -> MecsResult<Self> {
        Self::from_wire(decode_yaml(input)?)
    }

    pub fn to_json(&self) -> MecsResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire()?)?)
    }

    pub fn to_yaml(&self) -> MecsResult<String> {
        Ok(serde_yaml::to_string(&self.to_wire()?)?)
    }

    fn from_wire(wire: DocumentWire) -> MecsResult<Self> {
        check_type(DocumentKind::Course, &wire.doc_type)?;
        let parts = wire.into_parts()?;
        let mut course = Self::new(
            parts.mecs_version,
            parts.doc_type,
            parts.id,
            parts.title,
            parts.sections,
        )?;
        course.description = parts.description;
        course.metadata = parts.metadata;
        course.assessments = parts.assessments;
        course.extensions = parts.extensions;
        course.created_at = parts.created_at;
        course.updated_at = parts.updated_at;
        Ok(course)
    }

    fn to_wire(&self) -> MecsResult<DocumentWire> {
        Ok(DocumentWire {
            mecs_version: self.mecs_version.clone(),
            doc_type: self.doc_type.clone(),
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            metadata: self.metadata.as_ref().map(DocumentMetadataWire::from_domain),
            sections: sections_to_wire(&self.sections)?,
            assessments: self.assessments.clone(),
            extensions: self.extensions.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl MecsDocument for Course {
    const KIND: DocumentKind = DocumentKind::Course;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn doc_type(&self) -> &str {
        &self.doc_type
    }

    fn mecs_version(&self) -> &str {
        &self.mecs_version
    }

    fn metadata(&self) -> Option<&DocumentMetadata> {
        self.metadata.as_ref()
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }
}

/// A module: a reusable, standalone document. Same shape as [`Course`] without assessments.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub mecs_version: String,
    pub doc_type: String,
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub sections: Vec<Section>,
    pub metadata: Option<ModuleMetadata>,
    pub extensions: Map<String, Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Module {
    /// Creates a module, checking the `type` literal and that there is at least one section.
    ///
    /// # Errors
    ///
    /// - [`MecsError::InvalidType`] if `doc_type` is not `mecs:module`,
    /// - [`MecsError::EmptySectionList`] if `sections` is empty.
    pub fn new(
        mecs_version: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
        title: impl Into<String>,
        sections: Vec<Section>,
    ) -> MecsResult<Self> {
        let doc_type = doc_type.into();
        check_construction(DocumentKind::Module, &doc_type, &sections)?;
        Ok(Self {
            mecs_version: mecs_version.into(),
            doc_type,
            id: id.into(),
            title: title.into(),
            description: None,
            sections,
            metadata: None,
            extensions: Map::new(),
            created_at: None,
            updated_at: None,
        })
    }

    /// Parses a module from JSON text.
    ///
    /// # Errors
    ///
    /// As [`Course::from_json`]. An `assessments` key is a schema mismatch for modules.
    pub fn from_json(input: &str) -> MecsResult<Self> {
        Self::from_wire(decode_json(input)?)
    }

    pub fn from_yaml(input: &str) -> MecsResult<Self> {
        Self::from_wire(decode_yaml(input)?)
    }

    pub fn to_json(&self) -> MecsResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire()?)?)
    }

    pub fn to_yaml(&self) -> MecsResult<String> {
        Ok(serde_yaml::to_string(&self.to_wire()?)?)
    }

    fn from_wire(wire: DocumentWire) -> MecsResult<Self> {
        check_type(DocumentKind::Module, &wire.doc_type)?;
        if wire.assessments.is_some() {
            return Err(MecsError::SchemaMismatch {
                path: "assessments".into(),
                message: "modules do not carry assessments".into(),
            });
        }
        let parts = wire.into_parts()?;
        let mut module = Self::new(
            parts.mecs_version,
            parts.doc_type,
            parts.id,
            parts.title,
            parts.sections,
        )?;
        module.description = parts.description;
        module.metadata = parts.metadata;
        module.extensions = parts.extensions;
        module.created_at = parts.created_at;
        module.updated_at = parts.updated_at;
        Ok(module)
    }

    fn to_wire(&self) -> MecsResult<DocumentWire> {
        Ok(DocumentWire {
            mecs_version: self.mecs_version.clone(),
            doc_type: self.doc_type.clone(),
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            metadata: self.metadata.as_ref().map(DocumentMetadataWire::from_domain),
            sections: sections_to_wire(&self.sections)?,
            assessments: None,
            extensions: self.extensions.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl MecsDocument for Module {
    const KIND: DocumentKind = DocumentKind::Module;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn doc_type(&self) -> &str {
        &self.doc_type
    }

    fn mecs_version(&self) -> &str {
        &self.mecs_version
    }

    fn metadata(&self) -> Option<&DocumentMetadata> {
        self.metadata.as_ref()
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }
}

/// Either kind of document, selected by the `type` field when decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Course(Course),
    Module(Module),
}

impl Document {
    /// Parses a course or a module from JSON text, depending on its `type`.
    ///
    /// # Errors
    ///
    /// Returns [`MecsError::InvalidType`] if `type` names neither kind, otherwise the errors
    /// of [`Course::from_json`] / [`Module::from_json`].
    pub fn from_json(input: &str) -> MecsResult<Self> {
        Self::from_wire(decode_json(input)?)
    }

    pub fn from_yaml(input: &str) -> MecsResult<Self> {
        Self::from_wire(decode_yaml(input)?)
    }

    pub fn to_json(&self) -> MecsResult<String> {
        match self {
            Self::Course(course) => course.to_json(),
            Self::Module(module) => module.to_json(),
        }
    }

    pub fn to_yaml(&self) -> MecsResult<String> {
        match self {
            Self::Course(course) => course.to_yaml(),
            Self::Module(module) => module.to_yaml(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Course(_) => DocumentKind::Course,
            Self::Module(_) => DocumentKind::Module,
        }
    }

    pub fn is_course(&self) -> bool {
        matches!(self, Self::Course(_))
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module(_))
    }

    pub fn as_course(&self) -> Option<&Course> {
        match self {
            Self::Course(course) => Some(course),
            Self::Module(_) => None,
        }
    }

    pub fn as_module(&self) -> Option<&Module> {
        match self {
            Self::Module(module) => Some(module),
            Self::Course(_) => None,
        }
    }

    fn from_wire(wire: DocumentWire) -> MecsResult<Self> {
        match wire.doc_type.as_str() {
            COURSE_TYPE => Course::from_wire(wire).map(Self::Course),
            MODULE_TYPE => Module::from_wire(wire).map(Self::Module),
            _ => Err(MecsError::InvalidType {
                expected: "mecs:course or mecs:module",
                found: wire.doc_type,
            }),
        }
    }
}

impl From<Course> for Document {
    fn from(course: Course) -> Self {
        Self::Course(course)
    }
}

impl From<Module> for Document {
    fn from(module: Module) -> Self {
        Self::Module(module)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct DocumentWire {
    mecs_version: String,
    #[serde(rename = "type")]
    doc_type: String,
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<DocumentMetadataWire>,

    // Missing `sections` decodes as empty so that it is reported as `EmptySectionList`.
    #[serde(default)]
    sections: Vec<SectionWire>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    assessments: Option<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    extensions: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// A decoded wire document with domain-level sections and metadata.
struct DocumentParts {
    mecs_version: String,
    doc_type: String,
    id: String,
    title: String,
    description: Option<String>,
    metadata: Option<DocumentMetadata>,
    sections: Vec<Section>,
    assessments: Option<Value>,
    extensions: Map<String, Value>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl DocumentWire {
    fn into_parts(self) -> MecsResult<DocumentParts> {
        let sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(index, wire)| wire.into_domain().map_err(|err| at_section(index, err)))
            .collect::<MecsResult<Vec<_>>>()?;

        Ok(DocumentParts {
            mecs_version: self.mecs_version,
            doc_type: self.doc_type,
            id: self.id,
            title: self.title,
            description: self.description,
            metadata: self
                .metadata
                .map(DocumentMetadataWire::into_domain)
                .transpose()?,
            sections,
            assessments: self.assessments,
            extensions: self.extensions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Decodes a key that is present, `null` included, as `Some`. Absent keys fall back to the
/// field default.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn check_type(kind: DocumentKind, doc_type: &str) -> MecsResult<()> {
    if doc_type != kind.type_literal() {
        return Err(MecsError::InvalidType {
            expected: kind.type_literal(),
            found: doc_type.to_string(),
        });
    }
    Ok(())
}

fn check_construction(kind: DocumentKind, doc_type: &str, sections: &[Section]) -> MecsResult<()> {
    check_type(kind, doc_type)?;
    if sections.is_empty() {
        return Err(MecsError::EmptySectionList { kind });
    }
    Ok(())
}

fn sections_to_wire(sections: &[Section]) -> MecsResult<Vec<SectionWire>> {
    sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            SectionWire::from_domain(section).map_err(|err| at_section(index, err))
        })
        .collect()
}

/// Prefixes error paths from a section with its position in the document.
fn at_section(index: usize, err: MecsError) -> MecsError {
    match err {
        MecsError::SchemaMismatch { path, message } => MecsError::SchemaMismatch {
            path: format!("sections[{index}].{path}"),
            message,
        },
        MecsError::InvalidValue { field, reason } => MecsError::InvalidValue {
            field: format!("sections[{index}].{field}"),
            reason,
        },
        other => other,
    }
}

fn decode_json(input: &str) -> MecsResult<DocumentWire> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    let wire = decode_with(&mut deserializer)?;
    deserializer.end()?;
    Ok(wire)
}

fn decode_yaml(input: &str) -> MecsResult<DocumentWire> {
    decode_with(serde_yaml::Deserializer::from_str(input))
}

/// Deserialises the wire document, surfacing the failing field path on shape errors.
fn decode_with<'de, D, T>(deserializer: D) -> MecsResult<T>
where
    D: serde::Deserializer<'de>,
    D::Error: fmt::Display,
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        let message = err.into_inner().to_string();
        tracing::warn!("MECS document schema mismatch at {}: {}", path, message);
        MecsError::SchemaMismatch { path, message }
    })
}
