//! Constants used throughout the MECS core crate.
//!
//! Discriminator literals and defaults live here so the wire codec, builders and validator
//! agree on a single spelling.

use mecs_types::SemanticVersion;

/// Format version stamped on new documents when the caller does not choose one.
pub const DEFAULT_MECS_VERSION: SemanticVersion = SemanticVersion::new(0, 2, 0);

/// `type` literal for course documents.
pub const COURSE_TYPE: &str = "mecs:course";

/// `type` literal for module documents.
pub const MODULE_TYPE: &str = "mecs:module";

/// Section `content_type` tag for text content.
pub const TEXT_CONTENT_TYPE: &str = "mecs:text";

/// Section `content_type` tag for video content.
pub const VIDEO_CONTENT_TYPE: &str = "mecs:video";

/// Section `content_type` tag for document content.
pub const DOCUMENT_CONTENT_TYPE: &str = "mecs:document";

/// Section `content_type` tag for module references.
pub const MODULE_REF_CONTENT_TYPE: &str = "mecs:module-ref";
