//! Staged builders for courses and modules.
//!
//! A builder only accumulates fields. Nothing is checked until [`CourseBuilder::build`] /
//! [`ModuleBuilder::build`], which run the same construction checks as [`Course::new`] and
//! [`Module::new`].
//!
//! ```
//! use mecs_core::{ContentFormat, CourseBuilder, MecsDocument, Section, TextContent};
//!
//! let course = CourseBuilder::new("intro-python", "Introduction to Python")
//!     .description("Learn Python from scratch")
//!     .add_section(Section::text(
//!         "sec-001",
//!         "Welcome",
//!         TextContent::new(ContentFormat::Markdown, "# Welcome"),
//!     ))
//!     .build()
//!     .expect("valid course");
//!
//! assert_eq!(course.sections().len(), 1);
//! ```

use crate::config::MecsConfig;
use crate::constants::{COURSE_TYPE, DEFAULT_MECS_VERSION, MODULE_TYPE};
use crate::document::{Course, Module};
use crate::metadata::{CourseMetadata, ModuleMetadata};
use crate::section::Section;
use crate::MecsResult;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Accumulates the parts of a [`Course`].
#[derive(Clone, Debug)]
pub struct CourseBuilder {
    mecs_version: String,
    id: String,
    title: String,
    description: Option<String>,
    metadata: Option<CourseMetadata>,
    sections: Vec<Section>,
    assessments: Option<Value>,
    extensions: Map<String, Value>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl CourseBuilder {
    /// Create a new builder stamped with the default format version.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            mecs_version: DEFAULT_MECS_VERSION.to_string(),
            id: id.into(),
            title: title.into(),
            description: None,
            metadata: None,
            sections: Vec::new(),
            assessments: None,
            extensions: Map::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Create a new builder stamped with the configured format version.
    pub fn from_config(
        config: &MecsConfig,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self::new(id, title).mecs_version(config.default_mecs_version().to_string())
    }

    pub fn mecs_version(mut self, mecs_version: impl Into<String>) -> Self {
        self.mecs_version = mecs_version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: CourseMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Append one section.
    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Append several sections, keeping their order.
    pub fn sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections.extend(sections);
        self
    }

    /// Set the opaque assessments payload. A JSON `null` is kept and encoded as `null`.
    pub fn assessments(mut self, assessments: Value) -> Self {
        self.assessments = Some(assessments);
        self
    }

    /// Replace the whole extensions map.
    pub fn extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Build the course.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MecsError::EmptySectionList`] if no section was added.
    pub fn build(self) -> MecsResult<Course> {
        let mut course = Course::new(
            self.mecs_version,
            COURSE_TYPE,
            self.id,
            self.title,
            self.sections,
        )?;
        course.description = self.description;
        course.metadata = self.metadata;
        course.assessments = self.assessments;
        course.extensions = self.extensions;
        course.created_at = self.created_at;
        course.updated_at = self.updated_at;

        tracing::debug!(
            "built course '{}' with {} section(s)",
            course.id,
            course.sections.len()
        );
        Ok(course)
    }
}

/// Accumulates the parts of a [`Module`].
#[derive(Clone, Debug)]
pub struct ModuleBuilder {
    mecs_version: String,
    id: String,
    title: String,
    description: Option<String>,
    metadata: Option<ModuleMetadata>,
    sections: Vec<Section>,
    extensions: Map<String, Value>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ModuleBuilder {
    /// Create a new builder stamped with the default format version.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            mecs_version: DEFAULT_MECS_VERSION.to_string(),
            id: id.into(),
            title: title.into(),
            description: None,
            metadata: None,
            sections: Vec::new(),
            extensions: Map::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Create a new builder stamped with the configured format version.
    pub fn from_config(
        config: &MecsConfig,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self::new(id, title).mecs_version(config.default_mecs_version().to_string())
    }

    pub fn mecs_version(mut self, mecs_version: impl Into<String>) -> Self {
        self.mecs_version = mecs_version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: ModuleMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections.extend(sections);
        self
    }

    pub fn extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Build the module.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MecsError::EmptySectionList`] if no section was added.
    pub fn build(self) -> MecsResult<Module> {
        let mut module = Module::new(
            self.mecs_version,
            MODULE_TYPE,
            self.id,
            self.title,
            self.sections,
        )?;
        module.description = self.description;
        module.metadata = self.metadata;
        module.extensions = self.extensions;
        module.created_at = self.created_at;
        module.updated_at = self.updated_at;

        tracing::debug!(
            "built module '{}' with {} section(s)",
            module.id,
            module.sections.len()
        );
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{TextContent, VideoContent};
    use crate::document::MecsDocument;
    use crate::vocabulary::{ContentFormat, DifficultyLevel, VideoProvider};
    use crate::MecsError;
    use chrono::TimeZone;
    use mecs_types::SemanticVersion;
    use serde_json::json;

    fn welcome() -> Section {
        Section::text(
            "sec-001",
            "Welcome",
            TextContent::new(ContentFormat::Markdown, "# Welcome to Python"),
        )
    }

    fn basics_video() -> Section {
        let mut video = VideoContent::new("https://youtube.com/watch?v=abc");
        video.provider = Some(VideoProvider::Youtube);
        video.duration = Some(754);
        Section::video("sec-002", "Python Basics", video)
    }

    #[test]
    fn builds_intro_python_course() {
        let course = CourseBuilder::new("intro-python", "Introduction to Python")
            .add_section(welcome())
            .add_section(basics_video())
            .build()
            .expect("valid course");

        assert_eq!(course.sections.len(), 2);
        assert_eq!(course.sections[0].id, "sec-001");
        let video = course.get_section("sec-002").expect("video section");
        assert!(video.is_video());
        assert_eq!(course.doc_type, "mecs:course");
        assert_eq!(course.mecs_version, "0.2.0");
    }

    #[test]
    fn forwards_every_field_verbatim() {
        let stamp = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        let metadata = CourseMetadata {
            author: Some("Dr. Jane Doe".into()),
            level: Some(DifficultyLevel::Beginner),
            ..CourseMetadata::default()
        };

        let course = CourseBuilder::new("intro-python", "Introduction to Python")
            .mecs_version("0.2.1")
            .description("Learn Python from scratch")
            .metadata(metadata.clone())
            .sections([welcome(), basics_video()])
            .assessments(json!({"final": {"weight": 0.4}}))
            .extension("x-source", json!("wikipedia"))
            .created_at(stamp)
            .updated_at(stamp)
            .build()
            .expect("valid course");

        assert_eq!(course.mecs_version, "0.2.1");
        assert_eq!(course.description.as_deref(), Some("Learn Python from scratch"));
        assert_eq!(course.metadata, Some(metadata));
        assert_eq!(course.assessments, Some(json!({"final": {"weight": 0.4}})));
        assert_eq!(course.extensions.get("x-source"), Some(&json!("wikipedia")));
        assert_eq!(course.created_at, Some(stamp));
        assert_eq!(course.updated_at, Some(stamp));
    }

    #[test]
    fn null_assessments_are_kept() {
        let course = CourseBuilder::new("c", "C")
            .add_section(welcome())
            .assessments(Value::Null)
            .build()
            .expect("valid course");
        assert_eq!(course.assessments, Some(Value::Null));
        assert!(course.to_json().expect("encode").contains("\"assessments\": null"));
    }

    #[test]
    fn build_without_sections_fails() {
        let err = CourseBuilder::new("c", "C")
            .build()
            .expect_err("should reject empty course");
        assert!(matches!(err, MecsError::EmptySectionList { .. }));

        let err = ModuleBuilder::new("m", "M")
            .build()
            .expect_err("should reject empty module");
        assert!(matches!(err, MecsError::EmptySectionList { .. }));
    }

    #[test]
    fn builds_module_and_round_trips() {
        let module = ModuleBuilder::new("python-loops", "Python Loops")
            .add_section(welcome())
            .extension("x-origin", json!({"imported": true}))
            .build()
            .expect("valid module");
        assert_eq!(module.doc_type, "mecs:module");

        let reparsed = Module::from_json(&module.to_json().expect("render")).expect("reparse");
        assert_eq!(reparsed, module);
    }

    #[test]
    fn from_config_uses_configured_version() {
        let config = MecsConfig::new(SemanticVersion::new(0, 3, 0), false);
        let module = ModuleBuilder::from_config(&config, "m", "M")
            .add_section(welcome())
            .build()
            .expect("valid module");
        assert_eq!(module.mecs_version, "0.3.0");

        let course = CourseBuilder::from_config(&config, "c", "C")
            .add_section(welcome())
            .build()
            .expect("valid course");
        assert_eq!(course.mecs_version(), "0.3.0");
    }
}
