//! Record loader: file content -> canonical record list.
//!
//! Accepted top-level shapes, tried in order:
//! 1. a bare array of records
//! 2. an object with an `institutions` array
//! 3. an object with a `colleges` array
//! 4. an object's first array-valued field
//!
//! Anything else yields an empty record list, never an error. Only content
//! that is not JSON at all fails to load.

use std::path::Path;

use alm_core::collection::CollectionSpec;
use alm_core::issue::Location;
use alm_core::record::Record;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Byte-order mark some editors prepend to UTF-8 files.
pub const BOM: char = '\u{feff}';

const PREFERRED_FIELDS: [&str; 2] = ["institutions", "colleges"];

/// Top-level layout of a collection file, kept so writes reproduce it.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerShape {
    BareArray,
    /// An object wrapping the records. `root` holds every top-level field;
    /// the records field (if any) is left as `null` in place so key order
    /// survives a rewrite.
    Object {
        root: Map<String, Value>,
        field: Option<String>,
    },
    /// A scalar document. Written back as a bare array.
    Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub records: Vec<Record>,
    pub shape: ContainerShape,
    pub had_bom: bool,
}

/// One collection as loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCollection {
    pub spec: CollectionSpec,
    pub shape: ContainerShape,
    pub records: Vec<Record>,
    pub had_bom: bool,
    /// The file did not exist; loaded as empty.
    pub missing: bool,
}

impl LoadedCollection {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    #[must_use]
    pub const fn kind(&self) -> alm_core::enums::EntityKind {
        self.spec.kind
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.spec.path
    }

    #[must_use]
    pub fn location(&self, record_index: usize) -> Location {
        Location {
            collection: self.spec.name.clone(),
            path: self.spec.path.clone(),
            record_index,
        }
    }

    /// An empty collection that does not exist on disk yet.
    #[must_use]
    pub const fn empty(spec: CollectionSpec) -> Self {
        Self {
            spec,
            shape: ContainerShape::BareArray,
            records: Vec::new(),
            had_bom: false,
            missing: true,
        }
    }
}

/// Remove one leading byte-order mark. Returns whether one was present.
#[must_use]
pub fn strip_bom(text: &str) -> (&str, bool) {
    text.strip_prefix(BOM)
        .map_or((text, false), |rest| (rest, true))
}

/// Parse collection file content into records.
///
/// # Errors
///
/// Returns the parser error if the content (after BOM stripping) is not JSON.
pub fn parse_document(text: &str) -> Result<ParsedDocument, serde_json::Error> {
    let (body, had_bom) = strip_bom(text);
    let document: Value = serde_json::from_str(body)?;

    let (records, shape) = match document {
        Value::Array(items) => (items, ContainerShape::BareArray),
        Value::Object(mut root) => {
            let field = records_field(&root);
            let items = field
                .as_ref()
                .and_then(|name| root.get_mut(name))
                .map(Value::take)
                .and_then(|value| match value {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .unwrap_or_default();
            (items, ContainerShape::Object { root, field })
        }
        _ => (Vec::new(), ContainerShape::Scalar),
    };

    Ok(ParsedDocument {
        records: records.into_iter().map(Record::new).collect(),
        shape,
        had_bom,
    })
}

/// Name of the field holding the records inside a wrapper object.
fn records_field(root: &Map<String, Value>) -> Option<String> {
    PREFERRED_FIELDS
        .iter()
        .find(|name| root.get(**name).is_some_and(Value::is_array))
        .map(ToString::to_string)
        .or_else(|| {
            root.iter()
                .find(|(_, value)| value.is_array())
                .map(|(name, _)| name.clone())
        })
}

/// Load one collection. A file that does not exist loads as empty.
///
/// # Errors
///
/// Returns `StoreError::Io` if the file exists but cannot be read, or
/// `StoreError::Parse` if it is not JSON.
pub fn load_collection(spec: &CollectionSpec) -> Result<LoadedCollection, StoreError> {
    let text = match std::fs::read_to_string(&spec.path) {
        Ok(text) => text,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                collection = %spec.name,
                path = %spec.path.display(),
                "collection file not found; auditing it as empty"
            );
            return Ok(LoadedCollection::empty(spec.clone()));
        }
        Err(error) => return Err(StoreError::io(&spec.path, error)),
    };

    let parsed = parse_document(&text).map_err(|source| StoreError::Parse {
        path: spec.path.clone(),
        source,
    })?;

    tracing::debug!(
        collection = %spec.name,
        records = parsed.records.len(),
        bom = parsed.had_bom,
        "loaded collection"
    );

    Ok(LoadedCollection {
        spec: spec.clone(),
        shape: parsed.shape,
        records: parsed.records,
        had_bom: parsed.had_bom,
        missing: false,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn ids(parsed: &ParsedDocument) -> Vec<&str> {
        parsed.records.iter().filter_map(Record::id).collect()
    }

    #[rstest]
    #[case::bare_array(r#"[{"id":"a"},{"id":"b"}]"#)]
    #[case::institutions(r#"{"state":"Gujarat","institutions":[{"id":"a"},{"id":"b"}]}"#)]
    #[case::colleges(r#"{"colleges":[{"id":"a"},{"id":"b"}]}"#)]
    #[case::first_array_field(r#"{"version":2,"items":[{"id":"a"},{"id":"b"}],"tags":["x"]}"#)]
    fn accepted_shapes_yield_same_records(#[case] text: &str) {
        let parsed = parse_document(text).unwrap();
        assert_eq!(ids(&parsed), vec!["a", "b"]);
    }

    #[test]
    fn institutions_preferred_over_earlier_array_field() {
        let parsed =
            parse_document(r#"{"tags":["x"],"colleges":[{"id":"c"}],"institutions":[{"id":"i"}]}"#)
                .unwrap();
        assert_eq!(ids(&parsed), vec!["i"]);
        match parsed.shape {
            ContainerShape::Object { field, .. } => assert_eq!(field.as_deref(), Some("institutions")),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn non_array_institutions_falls_through_to_first_array() {
        let parsed = parse_document(r#"{"institutions":"see below","list":[{"id":"z"}]}"#).unwrap();
        assert_eq!(ids(&parsed), vec!["z"]);
    }

    #[rstest]
    #[case::object_without_arrays(r#"{"state":"Goa","count":0}"#)]
    #[case::scalar("42")]
    #[case::null("null")]
    fn no_sequence_yields_empty(#[case] text: &str) {
        let parsed = parse_document(text).unwrap();
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn bom_is_stripped_before_parsing() {
        let plain = r#"[{"id":"nit-x","name":"NIT X"}]"#;
        let with_bom = format!("{BOM}{plain}");

        let a = parse_document(plain).unwrap();
        let b = parse_document(&with_bom).unwrap();
        assert_eq!(a.records, b.records);
        assert!(!a.had_bom);
        assert!(b.had_bom);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_document(r#"[{"id": "a",]"#).is_err());
    }

    #[test]
    fn wrapper_keeps_other_fields_and_key_order() {
        let parsed = parse_document(r#"{"state":"Gujarat","colleges":[{"id":"a"}],"updated":"2024"}"#)
            .unwrap();
        match parsed.shape {
            ContainerShape::Object { root, field } => {
                assert_eq!(field.as_deref(), Some("colleges"));
                let keys: Vec<_> = root.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["state", "colleges", "updated"]);
                assert_eq!(root["colleges"], json!(null));
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }
}
