use crate::tree::Value;
use serde::{Deserialize, Serialize};

/// Kind of structural difference between the current and reference trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Present in the reference tree, absent from the current tree.
    Missing,
    /// Present in both with unequal leaf values.
    Differs,
}

/// One difference record.
///
/// For [`DiffKind::Missing`] the payload is the reference value (rendered into a
/// suggestion). For [`DiffKind::Differs`] it is the current value and is only
/// informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Dot-joined key chain.
    pub path: String,
    /// The same chain, unsplit, so keys containing dots survive.
    pub segments: Vec<String>,
    pub kind: DiffKind,
    pub payload: Value,
}

impl DiffEntry {
    pub fn new(segments: Vec<String>, kind: DiffKind, payload: Value) -> Self {
        Self {
            path: segments.join("."),
            segments,
            kind,
            payload,
        }
    }

    pub fn missing(segments: Vec<String>, reference_value: Value) -> Self {
        Self::new(segments, DiffKind::Missing, reference_value)
    }

    pub fn differs(segments: Vec<String>, current_value: Value) -> Self {
        Self::new(segments, DiffKind::Differs, current_value)
    }

    pub fn is_missing(&self) -> bool {
        self.kind == DiffKind::Missing
    }

    /// Number of path segments (1 for a top-level key).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn leaf_key(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// True when `self` lies strictly below `other` in the key hierarchy.
    pub fn is_descendant_of(&self, other: &DiffEntry) -> bool {
        self.segments.len() > other.segments.len() && self.segments.starts_with(&other.segments)
    }
}

/// Entries of kind `Missing`, in their original order.
pub fn missing(entries: &[DiffEntry]) -> impl Iterator<Item = &DiffEntry> {
    entries.iter().filter(|e| e.kind == DiffKind::Missing)
}

/// Entries of kind `Differs`, in their original order.
pub fn differs(entries: &[DiffEntry]) -> impl Iterator<Item = &DiffEntry> {
    entries.iter().filter(|e| e.kind == DiffKind::Differs)
}
