//! # MECS Core
//!
//! Document model for MECS, a portable format for modular educational content.
//!
//! This crate contains pure, in-memory operations only:
//! - courses and modules made of ordered, typed sections,
//! - tag-based content dispatch that keeps unknown content types verbatim,
//! - builders that defer construction checks to a single `build()` call,
//! - an on-demand [`Validator`] that reports structural defects without failing,
//! - a JSON/YAML codec over internal wire types.
//!
//! **No I/O**: fetching external data, resolving module references and rendering content
//! belong to the applications that embed this crate.

pub mod builder;
pub mod classification;
pub mod config;
pub mod constants;
pub mod content;
pub mod document;
pub mod error;
pub mod metadata;
pub mod section;
pub mod validation;
pub mod values;
pub mod vocabulary;

pub use builder::{CourseBuilder, ModuleBuilder};
pub use classification::{
    AcademicLevel, CanonicalConceptRef, ClassificationReport, ConceptSourceType,
    CourseRelationship, LearningClassification, LearningType, ProficiencyLevel, RelatedCourse,
};
pub use config::MecsConfig;
pub use content::{
    ContentKind, DocumentContent, ModuleRefContent, SectionContent, TextContent, VideoContent,
};
pub use document::{Course, Document, DocumentKind, MecsDocument, Module};
pub use error::{MecsError, MecsResult};
pub use metadata::{CourseMetadata, DocumentMetadata, ModuleMetadata, SectionMetadata};
pub use section::Section;
pub use validation::{ValidationCode, ValidationError, ValidationResult, Validator};
pub use values::{CacheStrategy, Duration, ModuleOverrides};
pub use vocabulary::{
    CacheStrategyKind, ContentFormat, DifficultyLevel, SectionDifficulty, TimeUnit,
    VideoProvider, Vocabulary,
};
