use serde::{Deserialize, Serialize};

/// Best existing line to insert a suggestion after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Zero-based index into the line buffer.
    pub line_index: usize,
    /// Number of path segments matched, counting from the root (1 = top-level key).
    pub matched_depth: usize,
}

/// Where a suggestion for a missing key ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Placement {
    /// Inserted right after an anchor line.
    Inline {
        path: String,
        /// Index of the anchor line in the buffer as it was when the entry was processed.
        after_line: usize,
        lines_inserted: usize,
    },
    /// Appended in the trailing batch at end of file.
    Trailing { path: String },
}

impl Placement {
    pub fn path(&self) -> &str {
        match self {
            Placement::Inline { path, .. } | Placement::Trailing { path } => path,
        }
    }
}

/// What happened to the fingerprint marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerAction {
    Appended,
    Replaced { line_index: usize },
}
