//! CLI command implementations.

pub mod analyze;
pub mod sheets;

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// The run completed but no column could be analyzed.
    NothingAnalyzed,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::NothingAnalyzed => 2,
        }
    }
}
