//! Field names used by college and exam records.
//!
//! The dataset is camelCase JSON maintained by hand; these constants are the
//! only place the spelling lives.

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const SHORT_NAME: &str = "shortName";

/// College: exam ids the college admits through.
pub const ACCEPTED_EXAMS: &str = "acceptedExams";
/// College: ordered course objects.
pub const COURSES: &str = "courses";
/// Course: exam ids accepted for this course.
pub const COURSE_EXAMS: &str = "exams";
/// College: ordered cutoff history entries.
pub const PAST_CUTOFFS: &str = "pastCutoffs";
/// Cutoff entry: referenced exam id.
pub const CUTOFF_EXAM_ID: &str = "examId";
/// Cutoff entry: the cutoff value (rank, percentile, or placeholder text).
pub const CUTOFF_VALUE: &str = "cutoff";

/// Exam: college ids that accept the exam.
pub const COLLEGES_ACCEPTING: &str = "collegesAccepting";

/// Sentinel cutoff values meaning "not yet collected".
pub const PLACEHOLDER_VALUES: [&str; 2] = ["Check official website", "Data Pending"];

/// Default name of the per-record list of exam ids whose cutoffs are pending.
pub const PENDING_CUTOFFS: &str = "pendingCutoffs";
