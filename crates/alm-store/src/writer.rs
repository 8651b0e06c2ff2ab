//! Whole-file atomic rewrites.
//!
//! The full new content is rendered in memory first, written to a temporary
//! file next to the target, and only then renamed over it. Any failure before
//! the rename leaves the original untouched. The byte-order mark is never
//! written back.

use std::io::Write;
use std::path::{Path, PathBuf};

use alm_core::responses::WriteFailure;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::loader::{ContainerShape, LoadedCollection};

/// Files written and files that failed during one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<WriteFailure>,
}

/// Rebuild the document for `collection` in its original container shape.
#[must_use]
pub fn document(collection: &LoadedCollection) -> Value {
    let records = Value::Array(
        collection
            .records
            .iter()
            .map(|record| record.as_value().clone())
            .collect(),
    );

    match &collection.shape {
        ContainerShape::BareArray | ContainerShape::Scalar => records,
        ContainerShape::Object { root, field } => {
            let mut root = root.clone();
            match field {
                Some(field) => {
                    root.insert(field.clone(), records);
                }
                None if collection.records.is_empty() => {}
                None => {
                    root.insert(collection.kind().container_field().to_string(), records);
                }
            }
            Value::Object(root)
        }
    }
}

/// Render the full file content: 2-space pretty JSON plus trailing newline.
///
/// # Errors
///
/// Returns `StoreError::Serialize` if the document cannot be serialized.
pub fn render(collection: &LoadedCollection) -> Result<String, StoreError> {
    let mut text =
        serde_json::to_string_pretty(&document(collection)).map_err(|source| {
            StoreError::Serialize {
                path: collection.path().to_path_buf(),
                source,
            }
        })?;
    text.push('\n');
    Ok(text)
}

/// Replace `path` with `content` in one rename.
///
/// # Errors
///
/// Returns `StoreError::Io` if the temporary file cannot be created or
/// written, `StoreError::Persist` if the final rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| StoreError::io(&parent, e))?;

    let mut file = NamedTempFile::new_in(&parent).map_err(|e| StoreError::io(&parent, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| StoreError::io(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(path, e))?;
    file.persist(path).map_err(|source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Render and atomically write one collection.
///
/// # Errors
///
/// Propagates render and write errors; the original file is untouched on error.
pub fn write_collection(collection: &LoadedCollection) -> Result<(), StoreError> {
    let content = render(collection)?;
    write_atomic(collection.path(), &content)?;
    tracing::debug!(
        collection = %collection.name(),
        records = collection.records.len(),
        "rewrote collection"
    );
    Ok(())
}

/// Write every collection; one failure does not stop the others.
#[must_use]
pub fn write_all<'a>(collections: impl IntoIterator<Item = &'a LoadedCollection>) -> WriteSummary {
    let mut summary = WriteSummary::default();
    for collection in collections {
        match write_collection(collection) {
            Ok(()) => summary.written.push(collection.path().to_path_buf()),
            Err(error) => {
                tracing::error!(
                    collection = %collection.name(),
                    %error,
                    "write failed; original file left untouched"
                );
                summary.failures.push(WriteFailure {
                    collection: collection.name().to_string(),
                    path: collection.path().to_path_buf(),
                    message: error.to_string(),
                });
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use alm_core::collection::CollectionSpec;
    use alm_core::enums::EntityKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::loader::{BOM, load_collection};

    fn spec(dir: &TempDir, file: &str) -> CollectionSpec {
        CollectionSpec::new("gujarat", EntityKind::College, dir.path().join(file))
    }

    #[test]
    fn rewrite_drops_bom_and_keeps_wrapper() {
        let temp = TempDir::new().unwrap();
        let spec = spec(&temp, "gujarat.json");
        std::fs::write(
            &spec.path,
            format!("{BOM}{{\"state\":\"Gujarat\",\"institutions\":[{{\"id\":\"a\"}}]}}"),
        )
        .unwrap();

        let loaded = load_collection(&spec).unwrap();
        assert!(loaded.had_bom);
        write_collection(&loaded).unwrap();

        let written = std::fs::read_to_string(&spec.path).unwrap();
        assert!(!written.starts_with(BOM));
        assert_eq!(
            written,
            "{\n  \"state\": \"Gujarat\",\n  \"institutions\": [\n    {\n      \"id\": \"a\"\n    }\n  ]\n}\n"
        );
    }

    #[test]
    fn bare_array_stays_bare() {
        let temp = TempDir::new().unwrap();
        let spec = spec(&temp, "exams.json");
        std::fs::write(&spec.path, r#"[{"id":"jee-main","name":"JEE Main"}]"#).unwrap();

        let loaded = load_collection(&spec).unwrap();
        let text = render(&loaded).unwrap();
        assert!(text.starts_with('['));
        assert_eq!(load_collection(&spec).unwrap().records, loaded.records);
    }

    #[test]
    fn missing_file_is_created_on_write() {
        let temp = TempDir::new().unwrap();
        let spec = spec(&temp, "nested/new.json");
        let mut collection = LoadedCollection::empty(spec.clone());
        collection
            .records
            .push(alm_core::record::Record::new(serde_json::json!({"id": "x"})));

        write_collection(&collection).unwrap();
        assert_eq!(load_collection(&spec).unwrap().records.len(), 1);
    }

    #[test]
    fn failed_write_is_reported_and_others_continue() {
        let temp = TempDir::new().unwrap();
        // A directory in place of the target file makes the rename fail.
        let blocked = spec(&temp, "blocked.json");
        std::fs::create_dir_all(blocked.path.join("inner")).unwrap();
        let ok = spec(&temp, "ok.json");

        let summary = write_all([
            &LoadedCollection::empty(blocked.clone()),
            &LoadedCollection::empty(ok.clone()),
        ]);

        assert_eq!(summary.written, vec![ok.path.clone()]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].path, blocked.path);
        assert!(blocked.path.is_dir());
    }
}
