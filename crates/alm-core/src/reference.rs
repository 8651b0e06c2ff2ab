//! References between records and the field paths they are read from.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::EntityKind;
use crate::fields;
use crate::record::Record;

/// Where inside a record a reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldPath {
    /// `acceptedExams[index]`
    AcceptedExams { index: usize },
    /// `courses[course].exams[index]`
    CourseExams { course: usize, index: usize },
    /// `pastCutoffs[index].examId`
    PastCutoffs { index: usize },
    /// `collegesAccepting[index]`
    CollegesAccepting { index: usize },
}

impl FieldPath {
    /// The top-level record field that owns this path.
    #[must_use]
    pub const fn top_level_field(self) -> &'static str {
        match self {
            Self::AcceptedExams { .. } => fields::ACCEPTED_EXAMS,
            Self::CourseExams { .. } => fields::COURSES,
            Self::PastCutoffs { .. } => fields::PAST_CUTOFFS,
            Self::CollegesAccepting { .. } => fields::COLLEGES_ACCEPTING,
        }
    }

    /// Kind of record the referenced identifier belongs to.
    #[must_use]
    pub const fn target_kind(self) -> EntityKind {
        match self {
            Self::CollegesAccepting { .. } => EntityKind::College,
            _ => EntityKind::Exam,
        }
    }

    /// Position inside a set-valued list (`acceptedExams`,
    /// `courses[].exams`, `collegesAccepting`). Cutoff history is an ordered
    /// log, not a set, so it has none.
    #[must_use]
    pub const fn set_index(self) -> Option<usize> {
        match self {
            Self::AcceptedExams { index }
            | Self::CollegesAccepting { index }
            | Self::CourseExams { index, .. } => Some(index),
            Self::PastCutoffs { .. } => None,
        }
    }

    /// The set-valued list holding this path inside `top`, the value of
    /// [`Self::top_level_field`].
    #[must_use]
    pub fn set_in(self, top: &Value) -> Option<&Vec<Value>> {
        match self {
            Self::AcceptedExams { .. } | Self::CollegesAccepting { .. } => top.as_array(),
            Self::CourseExams { course, .. } => top
                .get(course)
                .and_then(|c| c.get(fields::COURSE_EXAMS))
                .and_then(Value::as_array),
            Self::PastCutoffs { .. } => None,
        }
    }

    pub fn set_in_mut(self, top: &mut Value) -> Option<&mut Vec<Value>> {
        match self {
            Self::AcceptedExams { .. } | Self::CollegesAccepting { .. } => top.as_array_mut(),
            Self::CourseExams { course, .. } => top
                .get_mut(course)
                .and_then(|c| c.get_mut(fields::COURSE_EXAMS))
                .and_then(Value::as_array_mut),
            Self::PastCutoffs { .. } => None,
        }
    }

    /// Whether `id` already sits in this path's set at another position.
    #[must_use]
    pub fn set_contains_elsewhere(self, top: &Value, id: &str) -> bool {
        let (Some(list), Some(own)) = (self.set_in(top), self.set_index()) else {
            return false;
        };
        list.iter()
            .enumerate()
            .any(|(index, value)| index != own && value.as_str() == Some(id))
    }

    /// The string currently stored at this path, if any.
    #[must_use]
    pub fn read(self, record: &Record) -> Option<&str> {
        let value = match self {
            Self::AcceptedExams { index } => record.array(fields::ACCEPTED_EXAMS).get(index),
            Self::CollegesAccepting { index } => {
                record.array(fields::COLLEGES_ACCEPTING).get(index)
            }
            Self::CourseExams { course, index } => record
                .array(fields::COURSES)
                .get(course)
                .and_then(|c| c.get(fields::COURSE_EXAMS))
                .and_then(Value::as_array)
                .and_then(|exams| exams.get(index)),
            Self::PastCutoffs { index } => record
                .array(fields::PAST_CUTOFFS)
                .get(index)
                .and_then(|entry| entry.get(fields::CUTOFF_EXAM_ID)),
        };
        value.and_then(Value::as_str)
    }

    /// Replace the string at this path inside `top`, the value of
    /// [`Self::top_level_field`]. Returns `false` when the path does not
    /// exist in `top`.
    pub fn write(self, top: &mut Value, replacement: &str) -> bool {
        let slot = match self {
            Self::AcceptedExams { index } | Self::CollegesAccepting { index } => {
                top.get_mut(index)
            }
            Self::CourseExams { course, index } => top
                .get_mut(course)
                .and_then(|c| c.get_mut(fields::COURSE_EXAMS))
                .and_then(|exams| exams.get_mut(index)),
            Self::PastCutoffs { index } => top
                .get_mut(index)
                .and_then(|entry| entry.get_mut(fields::CUTOFF_EXAM_ID)),
        };
        match slot {
            Some(slot) if slot.is_string() => {
                *slot = Value::String(replacement.to_string());
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcceptedExams { index } => write!(f, "{}[{index}]", fields::ACCEPTED_EXAMS),
            Self::CourseExams { course, index } => write!(
                f,
                "{}[{course}].{}[{index}]",
                fields::COURSES,
                fields::COURSE_EXAMS
            ),
            Self::PastCutoffs { index } => write!(
                f,
                "{}[{index}].{}",
                fields::PAST_CUTOFFS,
                fields::CUTOFF_EXAM_ID
            ),
            Self::CollegesAccepting { index } => {
                write!(f, "{}[{index}]", fields::COLLEGES_ACCEPTING)
            }
        }
    }
}

/// A directed edge from a record to an identifier of another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    /// Identifier of the record holding the reference, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub source_kind: EntityKind,
    pub source_collection: String,
    /// Position of the source record inside its collection.
    pub record_index: usize,
    pub target: String,
    pub target_kind: EntityKind,
    pub path: FieldPath,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn college() -> Record {
        Record::new(json!({
            "id": "svnit-surat",
            "acceptedExams": ["jee-main"],
            "courses": [{ "name": "B.Tech", "exams": ["jee-main", "gujcet"] }],
            "pastCutoffs": [{ "examId": "jee-main", "year": 2024, "cutoff": "12000" }],
        }))
    }

    #[test]
    fn display_matches_json_path_notation() {
        assert_eq!(
            FieldPath::CourseExams { course: 1, index: 0 }.to_string(),
            "courses[1].exams[0]"
        );
        assert_eq!(
            FieldPath::PastCutoffs { index: 2 }.to_string(),
            "pastCutoffs[2].examId"
        );
    }

    #[test]
    fn read_follows_nested_paths() {
        let record = college();
        assert_eq!(
            FieldPath::CourseExams { course: 0, index: 1 }.read(&record),
            Some("gujcet")
        );
        assert_eq!(FieldPath::PastCutoffs { index: 0 }.read(&record), Some("jee-main"));
        assert_eq!(FieldPath::AcceptedExams { index: 5 }.read(&record), None);
    }

    #[test]
    fn write_replaces_only_existing_strings() {
        let record = college();
        let mut courses = record.get("courses").cloned().unwrap();
        assert!(FieldPath::CourseExams { course: 0, index: 1 }.write(&mut courses, "gujcet-2025"));
        assert_eq!(courses[0]["exams"][1], "gujcet-2025");
        assert!(!FieldPath::CourseExams { course: 3, index: 0 }.write(&mut courses, "x"));
    }

    #[test]
    fn cutoff_history_is_not_a_set() {
        let record = college();
        let courses = record.get("courses").cloned().unwrap();
        let cutoffs = record.get("pastCutoffs").cloned().unwrap();

        assert!(FieldPath::CourseExams { course: 0, index: 1 }.set_contains_elsewhere(&courses, "jee-main"));
        assert!(!FieldPath::CourseExams { course: 0, index: 0 }.set_contains_elsewhere(&courses, "jee-main"));
        assert!(!FieldPath::PastCutoffs { index: 0 }.set_contains_elsewhere(&cutoffs, "jee-main"));
    }

    #[test]
    fn target_kind_follows_field() {
        assert_eq!(
            FieldPath::CollegesAccepting { index: 0 }.target_kind(),
            EntityKind::College
        );
        assert_eq!(
            FieldPath::AcceptedExams { index: 0 }.target_kind(),
            EntityKind::Exam
        );
    }
}
