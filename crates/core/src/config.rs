//! Core runtime configuration.
//!
//! Configuration is resolved once by the embedding application and then passed into builders
//! and the validator. Nothing in this crate reads environment variables; the
//! `*_from_env_value` helpers only parse raw values the caller has already read.

use crate::constants::DEFAULT_MECS_VERSION;
use crate::{MecsError, MecsResult};
use mecs_types::SemanticVersion;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MecsConfig {
    default_mecs_version: SemanticVersion,
    strict_validation: bool,
}

impl Default for MecsConfig {
    fn default() -> Self {
        Self {
            default_mecs_version: DEFAULT_MECS_VERSION,
            strict_validation: false,
        }
    }
}

impl MecsConfig {
    pub fn new(default_mecs_version: SemanticVersion, strict_validation: bool) -> Self {
        Self {
            default_mecs_version,
            strict_validation,
        }
    }

    /// Builds a configuration from raw values read by the caller (for example from
    /// `MECS_VERSION` and `MECS_STRICT_VALIDATION`). Blank or absent values fall back to the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MecsError::Types`] for a malformed version and [`MecsError::InvalidInput`] for
    /// an unrecognised strictness flag.
    pub fn from_env_values(
        mecs_version: Option<String>,
        strict_validation: Option<String>,
    ) -> MecsResult<Self> {
        Ok(Self {
            default_mecs_version: mecs_version_from_env_value(mecs_version)?,
            strict_validation: strict_validation_from_env_value(strict_validation)?,
        })
    }

    pub fn default_mecs_version(&self) -> SemanticVersion {
        self.default_mecs_version
    }

    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }
}

/// Parse the default MECS version from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MECS_VERSION`].
pub fn mecs_version_from_env_value(value: Option<String>) -> MecsResult<SemanticVersion> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<SemanticVersion>()).transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_MECS_VERSION))
}

/// Parse the strict-validation flag from an optional string value.
///
/// Accepts `true/false/1/0/yes/no` in any case. `None` or blank means `false`.
pub fn strict_validation_from_env_value(value: Option<String>) -> MecsResult<bool> {
    let Some(value) = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
    else {
        return Ok(false);
    };

    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(MecsError::InvalidInput(format!(
            "strict validation flag must be one of true/false/1/0/yes/no, got '{other}'"
        ))),
    }
}
