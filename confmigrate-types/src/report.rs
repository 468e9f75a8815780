use crate::diff::DiffEntry;
use crate::patch::{MarkerAction, Placement};
use serde::{Deserialize, Serialize};

/// Outcome of one migration run, suitable for writing next to the migrated file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub schema: String,

    /// Digest of the reference document's canonical text.
    pub reference_digest: String,

    /// Digest found in the current file's marker line, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_digest: Option<String>,

    /// False when the fingerprint matched and diffing was skipped.
    pub needed: bool,

    /// True when the returned buffer differs from the input.
    pub changed: bool,

    /// All difference records, `differs` included.
    #[serde(default)]
    pub entries: Vec<DiffEntry>,

    #[serde(default)]
    pub placements: Vec<Placement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerAction>,

    /// Timestamp written into suggestion banners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp: Option<String>,
}

impl MigrationReport {
    pub fn new(reference_digest: impl Into<String>, previous_digest: Option<String>) -> Self {
        Self {
            schema: crate::schema::CONFMIGRATE_REPORT_V1.to_string(),
            reference_digest: reference_digest.into(),
            previous_digest,
            needed: false,
            changed: false,
            entries: Vec::new(),
            placements: Vec::new(),
            marker: None,
            stamp: None,
        }
    }

    pub fn inline_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| matches!(p, Placement::Inline { .. }))
            .count()
    }

    pub fn trailing_count(&self) -> usize {
        self.placements.len() - self.inline_count()
    }
}
