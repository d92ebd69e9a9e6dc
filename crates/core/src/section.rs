//! The section entity: one unit of content inside a course or module.

use crate::content::{
    ContentKind, DocumentContent, ModuleRefContent, SectionContent, TextContent, VideoContent,
};
use crate::metadata::{SectionMetadata, SectionMetadataWire};
use crate::MecsResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Public domain-level types
// ============================================================================

/// A section of a course or module.
///
/// `content_type` is the discriminator tag and `content` the payload it selects. The two are
/// expected to agree; [`Section::new`] does not check this, the validator does.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Unique within the owning document only.
    pub id: String,
    pub title: String,
    pub content_type: String,
    pub content: SectionContent,

    /// Traversal position. Overrides list position when present.
    pub order: Option<i64>,
    pub metadata: Option<SectionMetadata>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Section {
    /// Assembles a section from its parts without checking tag/payload agreement.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content_type: impl Into<String>,
        content: SectionContent,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content_type: content_type.into(),
            content,
            order: None,
            metadata: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builds a section from a tag and a raw payload, dispatching on the tag.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`SectionContent::from_tagged`].
    pub fn from_raw(
        id: impl Into<String>,
        title: impl Into<String>,
        content_type: impl Into<String>,
        payload: Value,
    ) -> MecsResult<Self> {
        let content_type = content_type.into();
        let content = SectionContent::from_tagged(&content_type, payload)?;
        Ok(Self::new(id, title, content_type, content))
    }

    pub fn text(id: impl Into<String>, title: impl Into<String>, content: TextContent) -> Self {
        Self::typed(id, title, ContentKind::Text, content.into())
    }

    pub fn video(id: impl Into<String>, title: impl Into<String>, content: VideoContent) -> Self {
        Self::typed(id, title, ContentKind::Video, content.into())
    }

    pub fn document(
        id: impl Into<String>,
        title: impl Into<String>,
        content: DocumentContent,
    ) -> Self {
        Self::typed(id, title, ContentKind::Document, content.into())
    }

    pub fn module_ref(
        id: impl Into<String>,
        title: impl Into<String>,
        content: ModuleRefContent,
    ) -> Self {
        Self::typed(id, title, ContentKind::ModuleRef, content.into())
    }

    fn typed(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ContentKind,
        content: SectionContent,
    ) -> Self {
        Self::new(id, title, kind.tag(), content)
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_metadata(mut self, metadata: SectionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    // Capability queries look at the stored payload, not at `content_type`.

    pub fn is_text(&self) -> bool {
        matches!(self.content, SectionContent::Text(_))
    }

    pub fn is_video(&self) -> bool {
        matches!(self.content, SectionContent::Video(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self.content, SectionContent::Document(_))
    }

    pub fn is_module_ref(&self) -> bool {
        matches!(self.content, SectionContent::ModuleRef(_))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SectionWire {
    id: String,
    title: String,
    content_type: String,
    content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<SectionMetadataWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl SectionWire {
    pub(crate) fn into_domain(self) -> MecsResult<Section> {
        let content = SectionContent::from_tagged(&self.content_type, self.content)?;
        Ok(Section {
            id: self.id,
            title: self.title,
            content_type: self.content_type,
            content,
            order: self.order,
            metadata: self
                .metadata
                .map(SectionMetadataWire::into_domain)
                .transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    pub(crate) fn from_domain(section: &Section) -> MecsResult<Self> {
        Ok(Self {
            id: section.id.clone(),
            title: section.title.clone(),
            content_type: section.content_type.clone(),
            content: section.content.to_value()?,
            order: section.order,
            metadata: section.metadata.as_ref().map(SectionMetadataWire::from_domain),
            created_at: section.created_at,
            updated_at: section.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::ContentFormat;
    use crate::MecsError;
    use serde_json::json;

    #[test]
    fn typed_constructors_set_matching_tag() {
        let section = Section::text(
            "sec-001",
            "Introduction",
            TextContent::new(ContentFormat::Markdown, "# Welcome"),
        );
        assert_eq!(section.content_type, "mecs:text");
        assert!(section.is_text());

        let section = Section::module_ref(
            "sec-003",
            "Loops",
            ModuleRefContent::new("https://mecs.example.org/modules/loops.json"),
        );
        assert_eq!(section.content_type, "mecs:module-ref");
        assert!(section.is_module_ref());
    }

    #[test]
    fn capability_queries_trust_stored_payload() {
        let section = Section::new(
            "sec-001",
            "Mislabelled",
            "mecs:text",
            VideoContent::new("https://example.org/v.mp4").into(),
        );
        assert!(section.is_video());
        assert!(!section.is_text());
        assert!(!section.is_document());
    }

    #[test]
    fn from_raw_dispatches_on_tag() {
        let section = Section::from_raw(
            "sec-002",
            "Video",
            "mecs:video",
            json!({"url": "https://youtube.com/watch?v=abc"}),
        )
        .expect("video section");
        assert!(section.is_video());

        let err = Section::from_raw("sec-002", "Video", "mecs:video", json!({}))
            .expect_err("should require url");
        assert!(matches!(err, MecsError::MissingRequiredField { field: "url", .. }));
    }

    #[test]
    fn wire_section_keeps_optional_fields() {
        let input = r#"{
            "id": "sec-001",
            "title": "Intro",
            "content_type": "mecs:text",
            "content": {"format": "plain", "text": "hello"},
            "order": 2,
            "metadata": {"difficulty": "easy"},
            "created_at": "2024-01-15T10:00:00Z"
        }"#;
        let wire: SectionWire = serde_json::from_str(input).expect("parse section");
        let section = wire.into_domain().expect("valid section");
        assert_eq!(section.order, Some(2));
        assert!(section.metadata.is_some());
        assert!(section.created_at.is_some());
        assert_eq!(section.updated_at, None);

        let rendered = serde_json::to_value(SectionWire::from_domain(&section).expect("render"))
            .expect("serialize");
        assert_eq!(rendered["order"], json!(2));
        assert!(rendered.get("updated_at").is_none());
    }

    #[test]
    fn wire_section_requires_content_type() {
        let input = r#"{"id": "sec-001", "title": "Intro", "content": {}}"#;
        assert!(serde_json::from_str::<SectionWire>(input).is_err());
    }
}
