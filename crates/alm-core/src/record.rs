//! One college or exam entry.
//!
//! Records are kept as raw JSON so that fields the auditor does not know
//! about survive a rewrite untouched. Typed accessors cover the fields the
//! audit cares about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields;

/// A college or exam entry as it appears in a collection file.
///
/// Non-object entries are kept as-is so they can be reported and written
/// back verbatim; every accessor returns `None` for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build a record from an object map.
    #[must_use]
    pub const fn from_fields(fields: Map<String, Value>) -> Self {
        Self(Value::Object(fields))
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    #[must_use]
    pub const fn fields(&self) -> Option<&Map<String, Value>> {
        match &self.0 {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub const fn fields_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match &mut self.0 {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields().and_then(|map| map.get(field))
    }

    /// String value of `field`, exactly as stored.
    ///
    /// Blank strings read as absent. Surrounding whitespace is kept so that
    /// identifier lookups stay exact.
    #[must_use]
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str).filter(|value| !is_blank(value))
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.str_field(fields::ID)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str_field(fields::NAME)
    }

    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.str_field(fields::SHORT_NAME)
    }

    /// Array value of `field`; missing or non-array fields read as empty.
    #[must_use]
    pub fn array(&self, field: &str) -> &[Value] {
        self.get(field)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// String entries of an array field together with their index.
    ///
    /// Non-string entries are skipped; their index is not reused.
    #[must_use]
    pub fn string_list(&self, field: &str) -> Vec<(usize, &str)> {
        indexed_strings(self.array(field))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Non-blank string entries of a JSON array with their index, unmodified.
#[must_use]
pub fn indexed_strings(values: &[Value]) -> Vec<(usize, &str)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            value
                .as_str()
                .filter(|s| !is_blank(s))
                .map(|s| (index, s))
        })
        .collect()
}

/// Empty or whitespace-only.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
