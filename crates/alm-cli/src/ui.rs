use std::sync::OnceLock;

static TERM_WIDTH: OnceLock<Option<usize>> = OnceLock::new();

/// Read the terminal width once from `COLUMNS`; narrow values are ignored.
pub fn init() {
    let width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);
    let _ = TERM_WIDTH.set(width);
}

#[must_use]
pub fn term_width() -> Option<usize> {
    TERM_WIDTH.get().copied().flatten()
}
