//! Compound value types: durations and module-reference resolver settings.
//!
//! `CacheStrategy` and `ModuleOverrides` are carried for the module-reference resolver, which
//! lives outside this crate. They are shape-checked here and otherwise passed through
//! untouched.

use crate::vocabulary::{CacheStrategyKind, TimeUnit, Vocabulary};
use crate::{MecsError, MecsResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Public domain-level types
// ============================================================================

/// A non-negative amount of time in a given unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Duration {
    value: f64,
    unit: TimeUnit,
}

impl Duration {
    /// Creates a duration.
    ///
    /// # Errors
    ///
    /// Returns [`MecsError::InvalidValue`] if `value` is negative, NaN or infinite.
    pub fn new(value: f64, unit: TimeUnit) -> MecsResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(MecsError::InvalidValue {
                field: "duration.value".into(),
                reason: format!("must be a finite number >= 0, got {value}"),
            });
        }
        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }
}

/// Caching policy a resolver should apply to a module reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStrategy {
    pub strategy: CacheStrategyKind,

    /// Time to live in seconds.
    pub ttl: Option<u64>,
}

/// How an imported module's sections should be reshaped by the resolver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleOverrides {
    /// Replacement metadata for the imported module, kept as an open map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Explicit section ordering by section id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Vec<String>>,

    /// Section ids to leave out of the import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_sections: Option<Vec<String>>,
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct DurationWire {
    pub value: f64,
    pub unit: String,
}

impl DurationWire {
    pub(crate) fn into_domain(self) -> MecsResult<Duration> {
        Duration::new(self.value, TimeUnit::parse(&self.unit)?)
    }

    pub(crate) fn from_domain(duration: &Duration) -> Self {
        Self {
            value: duration.value,
            unit: duration.unit.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct CacheStrategyWire {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl CacheStrategyWire {
    /// An absent `strategy` falls back to network-first.
    pub(crate) fn into_domain(self) -> MecsResult<CacheStrategy> {
        let strategy = match self.strategy.as_deref() {
            Some(raw) => CacheStrategyKind::parse(raw)?,
            None => CacheStrategyKind::default(),
        };
        Ok(CacheStrategy {
            strategy,
            ttl: self.ttl,
        })
    }

    pub(crate) fn from_domain(cache: &CacheStrategy) -> Self {
        Self {
            strategy: Some(cache.strategy.as_str().to_string()),
            ttl: cache.ttl,
        }
    }
}
