// crates/perf-results-core/src/core/value.rs
// ============================================================================
// Module: Perf Results Value Tree
// Description: Tagged payload tree for opaque metrics and snapshot data.
// Purpose: Give encoders a well-defined input type instead of runtime inspection.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`ResultValue`] is the payload type accepted by every encoder in this
//! workspace. Callers hand over metrics summaries, CPU profiles, heap snapshot
//! sections, and timeline entries as a tree of scalars, lists, and maps. The
//! recorder never inspects the meaning of the tree; it only renders it.
//!
//! Maps are ordered by key so rendered output is deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Value Tree
// ============================================================================

/// Opaque payload tree recorded by the perf results recorder.
///
/// # Invariants
/// - `Map` keys iterate in ordinal order.
/// - Rendering never fails for trees built from this type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultValue {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Ordered sequence of values.
    List(Vec<ResultValue>),
    /// Mapping from string keys to values.
    Map(BTreeMap<String, ResultValue>),
}

impl ResultValue {
    /// Creates an empty map value.
    #[must_use]
    pub const fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Returns the string payload when this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the items when this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries when this is a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a key when this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|entries| entries.get(key))
    }
}

// ============================================================================
// SECTION: Serde
// ============================================================================

impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => value.serialize(serializer),
            Self::String(value) => serializer.serialize_str(value),
            Self::List(items) => serializer.collect_seq(items),
            Self::Map(entries) => serializer.collect_map(entries),
        }
    }
}

impl<'de> Deserialize<'de> for ResultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<Value> for ResultValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(value) => Self::Number(value),
            Value::String(value) => Self::String(value),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(key, value)| (key, Self::from(value))).collect())
            }
        }
    }
}

impl From<ResultValue> for Value {
    fn from(value: ResultValue) -> Self {
        match value {
            ResultValue::Null => Self::Null,
            ResultValue::Bool(value) => Self::Bool(value),
            ResultValue::Number(value) => Self::Number(value),
            ResultValue::String(value) => Self::String(value),
            ResultValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            ResultValue::Map(entries) => {
                Self::Object(entries.into_iter().map(|(key, value)| (key, Self::from(value))).collect())
            }
        }
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ResultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ResultValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for ResultValue {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<f64> for ResultValue {
    /// Non-finite floats have no structured-text form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<Vec<Self>> for ResultValue {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Self>> for ResultValue {
    fn from(entries: BTreeMap<String, Self>) -> Self {
        Self::Map(entries)
    }
}

impl FromIterator<(String, Self)> for ResultValue {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}
