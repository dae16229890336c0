//! Command implementations for the canon-yaml CLI
//!
//! Each command works file by file and keeps going after a failure, so one
//! run reports every problem.

use std::path::PathBuf;

pub mod check;
pub mod fmt;

/// Per-file results of a command.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Files that passed, or were already formatted
    pub passed: Vec<PathBuf>,
    /// Files that failed or would change
    pub failed: Vec<PathBuf>,
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
