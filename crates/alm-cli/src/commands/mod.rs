pub mod audit;
pub mod dedupe;
pub mod dispatch;
pub mod duplicates;
pub mod merge;
pub mod patch;
pub mod reconcile;
pub mod schema;

/// How a command that ran to completion should exit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Success,
    /// `--fail-on-issues` was requested and issues exist.
    IssuesFound,
    /// At least one file failed to load or to be rewritten.
    ToolingFailures,
}

impl Outcome {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::IssuesFound => 2,
            Self::ToolingFailures => 3,
        }
    }

    /// `ToolingFailures` when `failed`, otherwise `Success`.
    #[must_use]
    pub const fn from_failures(failed: bool) -> Self {
        if failed {
            Self::ToolingFailures
        } else {
            Self::Success
        }
    }
}
