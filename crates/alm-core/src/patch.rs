//! Patch sets: record identifier -> partial record.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field updates keyed by the identifier of the record they apply to.
///
/// Serialized as a plain JSON object: `{ "nit-x": { "acceptedExams": [...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PatchSet(pub BTreeMap<String, Map<String, Value>>);

impl PatchSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `field` for `id`, creating the entry if needed.
    pub fn set(&mut self, id: impl Into<String>, field: impl Into<String>, value: Value) {
        self.0.entry(id.into()).or_default().insert(field.into(), value);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Map<String, Value>> {
        self.0.get(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_as_plain_object() {
        let mut patch = PatchSet::new();
        patch.set("nit-x", "acceptedExams", json!(["a", "b"]));
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "nit-x": { "acceptedExams": ["a", "b"] } }));
    }

    #[test]
    fn set_accumulates_fields_per_id() {
        let mut patch = PatchSet::new();
        patch.set("nit-x", "acceptedExams", json!([]));
        patch.set("nit-x", "pastCutoffs", json!([]));
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("nit-x").map(Map::len), Some(2));
    }
}
