//! Provenance of parsed mapping nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a mapping node started in its source.
///
/// Renders as `"<source-name>, line <L>, column <C>"`, which is the form
/// used in every user-facing error message. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    /// File path or stream name the node was read from
    pub source_name: String,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub column: usize,
}

impl Context {
    pub fn new(source_name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            source_name: source_name.into(),
            line,
            column,
        }
    }

    /// Create a Context from a yaml-rust2 marker.
    ///
    /// The scanner counts lines from 1 and columns from 0.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker, source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            line: marker.line(),
            column: marker.col() + 1,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, line {}, column {}",
            self.source_name, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let context = Context::new("config/production.yaml", 12, 5);
        assert_eq!(context.to_string(), "config/production.yaml, line 12, column 5");
    }

    #[test]
    fn test_equality_includes_source() {
        assert_ne!(Context::new("a.yaml", 1, 1), Context::new("b.yaml", 1, 1));
    }
}
