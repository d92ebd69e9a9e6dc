//! Section content variants and tag-based dispatch.
//!
//! A section carries a `content_type` tag and a payload. [`SectionContent::from_tagged`] turns
//! a tag plus a raw JSON payload into the matching variant:
//! - a recognised `mecs:*` tag produces its typed variant, failing on missing required fields
//!   or out-of-vocabulary values;
//! - any other tag keeps the payload verbatim as [`SectionContent::Opaque`], so documents using
//!   content types this crate does not know about still load and re-serialise losslessly.
//!
//! Consumers should switch on the section's tag (or on [`SectionContent::kind`]) rather than
//! inspecting payload fields.

use crate::constants::{
    DOCUMENT_CONTENT_TYPE, MODULE_REF_CONTENT_TYPE, TEXT_CONTENT_TYPE, VIDEO_CONTENT_TYPE,
};
use crate::values::{CacheStrategy, CacheStrategyWire, ModuleOverrides};
use crate::vocabulary::{parse_optional, ContentFormat, VideoProvider, Vocabulary};
use crate::{MecsError, MecsResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Keys of [`VideoContent`] that `custom_fields` must not reuse.
pub const VIDEO_FIELDS: [&str; 7] = [
    "url",
    "provider",
    "title",
    "description",
    "duration",
    "transcript",
    "thumbnail_url",
];

/// Keys of [`DocumentContent`] that `custom_fields` must not reuse.
pub const DOCUMENT_FIELDS: [&str; 7] = [
    "url",
    "title",
    "doc_type",
    "description",
    "file_size",
    "pages",
    "downloadable",
];

/// The content types this crate understands natively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Video,
    Document,
    ModuleRef,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Text,
        ContentKind::Video,
        ContentKind::Document,
        ContentKind::ModuleRef,
    ];

    /// The `content_type` tag for this kind, for example `mecs:video`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text => TEXT_CONTENT_TYPE,
            Self::Video => VIDEO_CONTENT_TYPE,
            Self::Document => DOCUMENT_CONTENT_TYPE,
            Self::ModuleRef => MODULE_REF_CONTENT_TYPE,
        }
    }

    /// Looks up a recognised tag. Returns `None` for custom or unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Text content: markdown, HTML or plain text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextContent {
    pub format: ContentFormat,
    pub text: String,
}

impl TextContent {
    pub fn new(format: ContentFormat, text: impl Into<String>) -> Self {
        Self {
            format,
            text: text.into(),
        }
    }
}

/// Video content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoContent {
    pub url: String,
    pub provider: Option<VideoProvider>,
    pub title: Option<String>,
    pub description: Option<String>,

    /// Running time in seconds.
    pub duration: Option<u64>,
    pub transcript: Option<String>,
    pub thumbnail_url: Option<String>,

    /// Extra keys found alongside the known fields, re-emitted verbatim. Keys listed in
    /// [`VIDEO_FIELDS`] are not allowed here.
    pub custom_fields: Map<String, Value>,
}

impl VideoContent {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Document content (PDF, slides, spreadsheets and so on).
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentContent {
    pub url: String,
    pub title: Option<String>,

    /// Free-form document type such as `pdf` or `docx`.
    pub doc_type: Option<String>,
    pub description: Option<String>,

    /// Size in bytes.
    pub file_size: Option<u64>,
    pub pages: Option<u32>,
    pub downloadable: bool,

    /// Extra keys, re-emitted verbatim. Keys listed in [`DOCUMENT_FIELDS`] are not allowed here.
    pub custom_fields: Map<String, Value>,
}

impl DocumentContent {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            doc_type: None,
            description: None,
            file_size: None,
            pages: None,
            downloadable: true,
            custom_fields: Map::new(),
        }
    }
}

/// A reference to another module, to be pulled in by an external resolver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleRefContent {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cache: Option<CacheStrategy>,
    pub overrides: Option<ModuleOverrides>,
}

impl ModuleRefContent {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// The payload of a section.
#[derive(Clone, Debug, PartialEq)]
pub enum SectionContent {
    Text(TextContent),
    Video(VideoContent),
    Document(DocumentContent),
    ModuleRef(ModuleRefContent),

    /// Payload of a content type this crate does not interpret. Any JSON shape.
    Opaque(Value),
}

impl SectionContent {
    /// Builds the variant selected by `content_type` from a raw payload.
    ///
    /// # Errors
    ///
    /// For recognised tags only:
    /// - [`MecsError::MissingRequiredField`] when a required field is absent or null,
    /// - [`MecsError::InvalidEnumValue`] when a vocabulary field holds an unknown value,
    /// - [`MecsError::SchemaMismatch`] when the payload is not an object or a field has the
    ///   wrong JSON type.
    ///
    /// Unrecognised tags never fail.
    pub fn from_tagged(content_type: &str, payload: Value) -> MecsResult<Self> {
        let Some(kind) = ContentKind::from_tag(content_type) else {
            tracing::debug!(
                "preserving unrecognised content type '{}' as opaque payload",
                content_type
            );
            return Ok(Self::Opaque(payload));
        };

        match kind {
            ContentKind::Text => {
                let wire: TextWire = decode_payload(payload)?;
                Ok(Self::Text(TextContent {
                    format: ContentFormat::parse(&required(kind, "format", wire.format)?)?,
                    text: required(kind, "text", wire.text)?,
                }))
            }
            ContentKind::Video => {
                let wire: VideoWire = decode_payload(payload)?;
                Ok(Self::Video(VideoContent {
                    url: required(kind, "url", wire.url)?,
                    provider: parse_optional(wire.provider.as_deref())?,
                    title: wire.title,
                    description: wire.description,
                    duration: wire.duration,
                    transcript: wire.transcript,
                    thumbnail_url: wire.thumbnail_url,
                    custom_fields: wire.custom_fields,
                }))
            }
            ContentKind::Document => {
                let wire: DocumentWire = decode_payload(payload)?;
                Ok(Self::Document(DocumentContent {
                    url: required(kind, "url", wire.url)?,
                    title: wire.title,
                    doc_type: wire.doc_type,
                    description: wire.description,
                    file_size: wire.file_size,
                    pages: wire.pages,
                    downloadable: wire.downloadable.unwrap_or(true),
                    custom_fields: wire.custom_fields,
                }))
            }
            ContentKind::ModuleRef => {
                let wire: ModuleRefWire = decode_payload(payload)?;
                Ok(Self::ModuleRef(ModuleRefContent {
                    url: required(kind, "url", wire.url)?,
                    title: wire.title,
                    description: wire.description,
                    cache: wire.cache.map(CacheStrategyWire::into_domain).transpose()?,
                    overrides: wire.overrides,
                }))
            }
        }
    }

    /// The natively understood kind of the stored payload, or `None` for opaque payloads.
    ///
    /// This looks at the stored variant only, never at a section's `content_type` tag.
    pub fn kind(&self) -> Option<ContentKind> {
        match self {
            Self::Text(_) => Some(ContentKind::Text),
            Self::Video(_) => Some(ContentKind::Video),
            Self::Document(_) => Some(ContentKind::Document),
            Self::ModuleRef(_) => Some(ContentKind::ModuleRef),
            Self::Opaque(_) => None,
        }
    }

    /// Custom field keys that collide with a typed field of the payload, in key order.
    pub fn shadowed_custom_fields(&self) -> Vec<&str> {
        let (custom_fields, reserved): (&Map<String, Value>, &[&str]) = match self {
            Self::Video(video) => (&video.custom_fields, &VIDEO_FIELDS),
            Self::Document(document) => (&document.custom_fields, &DOCUMENT_FIELDS),
            Self::Text(_) | Self::ModuleRef(_) | Self::Opaque(_) => return Vec::new(),
        };
        custom_fields
            .keys()
            .map(String::as_str)
            .filter(|key| reserved.contains(key))
            .collect()
    }

    /// Renders the payload into its wire JSON shape.
    ///
    /// # Errors
    ///
    /// Returns [`MecsError::InvalidValue`] if a custom field would overwrite a typed field.
    pub(crate) fn to_value(&self) -> MecsResult<Value> {
        if let Some(key) = self.shadowed_custom_fields().first() {
            return Err(MecsError::InvalidValue {
                field: format!("content.custom_fields.{key}"),
                reason: "custom field collides with a typed field".into(),
            });
        }

        let value = match self {
            Self::Text(text) => serde_json::to_value(TextWire {
                format: Some(text.format.as_str().to_string()),
                text: Some(text.text.clone()),
            })?,
            Self::Video(video) => serde_json::to_value(VideoWire {
                url: Some(video.url.clone()),
                provider: video.provider.map(|p| p.as_str().to_string()),
                title: video.title.clone(),
                description: video.description.clone(),
                duration: video.duration,
                transcript: video.transcript.clone(),
                thumbnail_url: video.thumbnail_url.clone(),
                custom_fields: video.custom_fields.clone(),
            })?,
            Self::Document(document) => serde_json::to_value(DocumentWire {
                url: Some(document.url.clone()),
                title: document.title.clone(),
                doc_type: document.doc_type.clone(),
                description: document.description.clone(),
                file_size: document.file_size,
                pages: document.pages,
                downloadable: Some(document.downloadable),
                custom_fields: document.custom_fields.clone(),
            })?,
            Self::ModuleRef(module_ref) => serde_json::to_value(ModuleRefWire {
                url: Some(module_ref.url.clone()),
                title: module_ref.title.clone(),
                description: module_ref.description.clone(),
                cache: module_ref.cache.as_ref().map(CacheStrategyWire::from_domain),
                overrides: module_ref.overrides.clone(),
            })?,
            Self::Opaque(value) => value.clone(),
        };
        Ok(value)
    }
}

impl From<TextContent> for SectionContent {
    fn from(content: TextContent) -> Self {
        Self::Text(content)
    }
}

impl From<VideoContent> for SectionContent {
    fn from(content: VideoContent) -> Self {
        Self::Video(content)
    }
}

impl From<DocumentContent> for SectionContent {
    fn from(content: DocumentContent) -> Self {
        Self::Document(content)
    }
}

impl From<ModuleRefContent> for SectionContent {
    fn from(content: ModuleRefContent) -> Self {
        Self::ModuleRef(content)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================
//
// Required fields are `Option` here so that their absence is reported as
// `MissingRequiredField` rather than a generic serde error.

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TextWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct VideoWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<String>,
    #[serde(flatten)]
    custom_fields: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct DocumentWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    downloadable: Option<bool>,
    #[serde(flatten)]
    custom_fields: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ModuleRefWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache: Option<CacheStrategyWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overrides: Option<ModuleOverrides>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Deserialises a content payload, reporting the failing field as `content.<path>`.
fn decode_payload<T: DeserializeOwned>(payload: Value) -> MecsResult<T> {
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "content".to_string()
        } else {
            format!("content.{path}")
        };
        MecsError::SchemaMismatch {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

fn required<T>(kind: ContentKind, field: &'static str, value: Option<T>) -> MecsResult<T> {
    value.ok_or_else(|| MecsError::MissingRequiredField {
        content_type: kind.tag().to_string(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CacheStrategyKind;
    use serde_json::json;

    #[test]
    fn dispatches_text_payload() {
        let content = SectionContent::from_tagged(
            "mecs:text",
            json!({"format": "markdown", "text": "# Welcome"}),
        )
        .expect("text content");
        assert_eq!(
            content,
            SectionContent::Text(TextContent::new(ContentFormat::Markdown, "# Welcome"))
        );
        assert_eq!(content.kind(), Some(ContentKind::Text));
    }

    #[test]
    fn video_without_url_is_missing_required_field() {
        let err = SectionContent::from_tagged("mecs:video", json!({"title": "Python Basics"}))
            .expect_err("should require url");
        match err {
            MecsError::MissingRequiredField {
                content_type,
                field,
            } => {
                assert_eq!(content_type, "mecs:video");
                assert_eq!(field, "url");
            }
            other => panic!("expected MissingRequiredField, got {other:?}"),
        }
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let err = SectionContent::from_tagged("mecs:document", json!({"url": null}))
            .expect_err("should require url");
        assert!(matches!(err, MecsError::MissingRequiredField { field: "url", .. }));
    }

    #[test]
    fn text_requires_both_format_and_text() {
        let err = SectionContent::from_tagged("mecs:text", json!({"text": "hi"}))
            .expect_err("should require format");
        assert!(matches!(err, MecsError::MissingRequiredField { field: "format", .. }));

        let err = SectionContent::from_tagged("mecs:text", json!({"format": "plain"}))
            .expect_err("should require text");
        assert!(matches!(err, MecsError::MissingRequiredField { field: "text", .. }));
    }

    #[test]
    fn unknown_vocabulary_value_is_rejected() {
        let err = SectionContent::from_tagged(
            "mecs:video",
            json!({"url": "https://example.org/v.mp4", "provider": "dailymotion"}),
        )
        .expect_err("should reject provider");
        assert!(matches!(
            err,
            MecsError::InvalidEnumValue { vocabulary: "video provider", ref value, .. } if value == "dailymotion"
        ));
    }

    #[test]
    fn wrong_field_type_reports_path() {
        let err = SectionContent::from_tagged(
            "mecs:module-ref",
            json!({"url": "https://example.org/m.json", "title": 12}),
        )
        .expect_err("should reject title");
        match err {
            MecsError::SchemaMismatch { path, .. } => assert_eq!(path, "content.title"),
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_for_known_tag_is_schema_mismatch() {
        let err = SectionContent::from_tagged("mecs:text", json!("just a string"))
            .expect_err("should reject");
        assert!(matches!(err, MecsError::SchemaMismatch { ref path, .. } if path == "content"));
    }

    #[test]
    fn unknown_tag_is_preserved_verbatim() {
        let payload = json!({"questions": [{"prompt": "2 + 2?", "answer": 4}], "shuffle": true});
        let content =
            SectionContent::from_tagged("acme:quiz", payload.clone()).expect("opaque content");
        assert_eq!(content, SectionContent::Opaque(payload.clone()));
        assert_eq!(content.kind(), None);
        assert_eq!(content.to_value().expect("render"), payload);
    }

    #[test]
    fn unknown_tag_accepts_any_shape() {
        let content = SectionContent::from_tagged("acme:counter", json!(42)).expect("opaque");
        assert_eq!(content, SectionContent::Opaque(json!(42)));
    }

    #[test]
    fn video_custom_fields_are_collected_and_re_emitted() {
        let payload = json!({
            "url": "https://youtube.com/watch?v=abc",
            "provider": "youtube",
            "duration": 754,
            "chapters": [{"at": 0, "title": "Intro"}]
        });
        let content =
            SectionContent::from_tagged("mecs:video", payload.clone()).expect("video content");
        let SectionContent::Video(video) = &content else {
            panic!("expected video content");
        };
        assert_eq!(video.provider, Some(VideoProvider::Youtube));
        assert_eq!(video.duration, Some(754));
        assert!(video.custom_fields.contains_key("chapters"));
        assert_eq!(content.to_value().expect("render"), payload);
    }

    #[test]
    fn custom_fields_may_not_shadow_typed_fields() {
        let mut video = VideoContent::new("https://real.example/v.mp4");
        video
            .custom_fields
            .insert("url".into(), json!("https://elsewhere.example/x"));
        video.custom_fields.insert("title".into(), json!("shadow"));
        video.custom_fields.insert("chapters".into(), json!([]));
        let content = SectionContent::Video(video);

        assert_eq!(content.shadowed_custom_fields(), vec!["title", "url"]);
        let err = content.to_value().expect_err("should refuse shadowing keys");
        assert!(matches!(
            err,
            MecsError::InvalidValue { ref field, .. } if field == "content.custom_fields.title"
        ));

        let mut document = DocumentContent::new("https://x.org/a.pdf");
        document.custom_fields.insert("downloadable".into(), json!(false));
        let content = SectionContent::Document(document);
        assert_eq!(content.shadowed_custom_fields(), vec!["downloadable"]);
        assert!(content.to_value().is_err());
    }

    #[test]
    fn decoded_custom_fields_never_shadow() {
        let content = SectionContent::from_tagged(
            "mecs:document",
            json!({"url": "https://x.org/a.pdf", "pages": 3, "checksum": "abc"}),
        )
        .expect("document content");
        assert!(content.shadowed_custom_fields().is_empty());
    }

    #[test]
    fn document_downloadable_defaults_to_true() {
        let content =
            SectionContent::from_tagged("mecs:document", json!({"url": "https://x.org/a.pdf"}))
                .expect("document content");
        let SectionContent::Document(document) = content else {
            panic!("expected document content");
        };
        assert!(document.downloadable);
        assert_eq!(document, DocumentContent::new("https://x.org/a.pdf"));
    }

    #[test]
    fn module_ref_carries_cache_and_overrides() {
        let payload = json!({
            "url": "https://mecs.example.org/modules/loops.json",
            "cache": {"strategy": "cache-first", "ttl": 86400},
            "overrides": {"exclude_sections": ["appendix"]}
        });
        let content =
            SectionContent::from_tagged("mecs:module-ref", payload.clone()).expect("module ref");
        let SectionContent::ModuleRef(module_ref) = &content else {
            panic!("expected module reference");
        };
        let cache = module_ref.cache.expect("cache strategy");
        assert_eq!(cache.strategy, CacheStrategyKind::CacheFirst);
        assert_eq!(cache.ttl, Some(86400));
        assert_eq!(content.to_value().expect("render"), payload);
    }

    #[test]
    fn module_ref_rejects_unknown_keys() {
        let err = SectionContent::from_tagged(
            "mecs:module-ref",
            json!({"url": "https://x.org/m.json", "docType": "pdf"}),
        )
        .expect_err("should reject unknown key");
        assert!(matches!(err, MecsError::SchemaMismatch { .. }));
    }

    #[test]
    fn content_kind_tags_round_trip() {
        for kind in ContentKind::ALL {
            assert_eq!(ContentKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ContentKind::from_tag("mecs:quiz"), None);
    }
}
