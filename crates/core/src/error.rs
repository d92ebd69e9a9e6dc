use crate::document::DocumentKind;

/// Errors returned by MECS construction and decoding.
///
/// Every variant is a construction-time failure: the call that produced it returned no
/// entity. Structural defects that a document may legitimately carry while being edited are
/// reported by [`crate::Validator`] instead.
#[derive(Debug, thiserror::Error)]
pub enum MecsError {
    #[error("invalid document type '{found}' (expected '{expected}')")]
    InvalidType {
        expected: &'static str,
        found: String,
    },

    #[error("{kind} must have at least one section")]
    EmptySectionList { kind: DocumentKind },

    #[error("invalid {vocabulary} '{value}' (expected one of: {expected})")]
    InvalidEnumValue {
        vocabulary: &'static str,
        value: String,
        expected: String,
    },

    #[error("{content_type} content is missing required field '{field}'")]
    MissingRequiredField {
        content_type: String,
        field: &'static str,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("schema mismatch at {path}: {message}")]
    SchemaMismatch { path: String, message: String },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid value: {0}")]
    Types(#[from] mecs_types::TypesError),
}

/// Type alias for Results that can fail with a [`MecsError`].
pub type MecsResult<T> = std::result::Result<T, MecsError>;
