//! Dataset layout: which files hold which collections.

use std::path::{Path, PathBuf};

use alm_core::collection::CollectionSpec;
use alm_core::enums::EntityKind;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_root() -> String {
    "data".to_string()
}

/// One explicitly configured collection file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionEntry {
    pub name: String,
    pub kind: EntityKind,
    pub path: String,
}

/// A directory whose `*.json` files are all collections of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanEntry {
    pub kind: EntityKind,
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Base directory for relative collection paths, relative to the project root.
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default)]
    pub collections: Vec<CollectionEntry>,

    #[serde(default)]
    pub scan: Vec<ScanEntry>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            collections: Vec::new(),
            scan: Vec::new(),
        }
    }
}

impl DatasetConfig {
    /// Whether any collection source is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.collections.is_empty() || !self.scan.is_empty()
    }

    /// Resolve the ordered list of collections under `project_root`.
    ///
    /// Explicit collections come first, then scanned directories in the
    /// configured order with files sorted by name. A path listed twice is
    /// kept once. Scan directories that do not exist contribute nothing.
    /// With nothing configured, the default layout is used: every file in
    /// `colleges/` plus `exams.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Scan` if an existing scan directory cannot be
    /// read, and `ConfigError::InvalidValue` if two collections end up with
    /// the same name (e.g. a scanned file stem equal to an explicit entry).
    pub fn resolve(&self, project_root: &Path) -> Result<Vec<CollectionSpec>, ConfigError> {
        let base = project_root.join(&self.root);

        let (collections, scan) = if self.is_configured() {
            (self.collections.clone(), self.scan.clone())
        } else {
            Self::default_layout()
        };

        let mut specs: Vec<CollectionSpec> = Vec::new();
        let mut push = |spec: CollectionSpec| {
            if !specs.iter().any(|existing| existing.path == spec.path) {
                specs.push(spec);
            }
        };

        for entry in &collections {
            push(CollectionSpec::new(
                entry.name.clone(),
                entry.kind,
                base.join(&entry.path),
            ));
        }

        for entry in &scan {
            for path in json_files(&base.join(&entry.dir))? {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                push(CollectionSpec::new(name, entry.kind, path));
            }
        }

        ensure_unique_names(&specs)?;
        Ok(specs)
    }

    fn default_layout() -> (Vec<CollectionEntry>, Vec<ScanEntry>) {
        (
            vec![CollectionEntry {
                name: "exams".to_string(),
                kind: EntityKind::Exam,
                path: "exams.json".to_string(),
            }],
            vec![ScanEntry {
                kind: EntityKind::College,
                dir: "colleges".to_string(),
            }],
        )
    }
}

/// Collections are addressed by name in reports and patches, so a name may
/// only be used once.
fn ensure_unique_names(specs: &[CollectionSpec]) -> Result<(), ConfigError> {
    for (position, spec) in specs.iter().enumerate() {
        if let Some(first) = specs[..position].iter().find(|s| s.name == spec.name) {
            return Err(ConfigError::InvalidValue {
                field: "dataset".to_string(),
                reason: format!(
                    "collection name '{}' is used by both {} and {}; list one of them under [[dataset.collections]] with another name",
                    spec.name,
                    first.path.display(),
                    spec.path.display()
                ),
            });
        }
    }
    Ok(())
}

/// Sorted `*.json` files directly inside `dir`; empty if `dir` is absent.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ConfigError::Scan {
                dir: dir.display().to_string(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ConfigError::Scan {
                dir: dir.display().to_string(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "[]").unwrap();
    }

    #[test]
    fn default_layout_scans_colleges_and_adds_exams() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("data/colleges/maharashtra.json"));
        touch(&temp.path().join("data/colleges/gujarat.json"));
        touch(&temp.path().join("data/colleges/notes.txt"));

        let specs = DatasetConfig::default().resolve(temp.path()).unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["exams", "gujarat", "maharashtra"]);
        assert_eq!(specs[0].kind, EntityKind::Exam);
        assert_eq!(specs[1].kind, EntityKind::College);
    }

    #[test]
    fn missing_scan_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let config = DatasetConfig {
            scan: vec![ScanEntry {
                kind: EntityKind::College,
                dir: "nowhere".to_string(),
            }],
            ..Default::default()
        };
        assert!(config.resolve(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn explicit_collection_wins_over_scanned_duplicate() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("db/colleges/gujarat.json"));
        let config = DatasetConfig {
            root: "db".to_string(),
            collections: vec![CollectionEntry {
                name: "gujarat-colleges".to_string(),
                kind: EntityKind::College,
                path: "colleges/gujarat.json".to_string(),
            }],
            scan: vec![ScanEntry {
                kind: EntityKind::College,
                dir: "colleges".to_string(),
            }],
        };

        let specs = config.resolve(temp.path()).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "gujarat-colleges");
    }

    #[test]
    fn scanned_stem_colliding_with_exams_is_rejected() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("data/colleges/exams.json"));

        let error = DatasetConfig::default().resolve(temp.path()).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { .. }));
        assert!(error.to_string().contains("'exams'"));
    }

    #[test]
    fn same_stem_in_two_scan_dirs_is_rejected() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("data/colleges/misc.json"));
        touch(&temp.path().join("data/exams/misc.json"));
        let config = DatasetConfig {
            scan: vec![
                ScanEntry {
                    kind: EntityKind::College,
                    dir: "colleges".to_string(),
                },
                ScanEntry {
                    kind: EntityKind::Exam,
                    dir: "exams".to_string(),
                },
            ],
            ..Default::default()
        };

        assert!(config.resolve(temp.path()).is_err());
    }
}
