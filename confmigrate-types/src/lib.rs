//! Shared DTOs for the confmigrate workspace.
//!
//! # Design constraints
//! - Trees and diff entries are ephemeral, scoped to one migration run.
//! - Reports are intended to be serialized to disk; prefer adding optional
//!   fields over changing semantics.

pub mod diff;
pub mod patch;
pub mod report;
pub mod tree;

pub use diff::{DiffEntry, DiffKind};
pub use patch::{Anchor, MarkerAction, Placement};
pub use report::MigrationReport;
pub use tree::{ConfigTree, Scalar, Value};

/// Schema identifiers.
pub mod schema {
    pub const CONFMIGRATE_REPORT_V1: &str = "confmigrate.report.v1";
}
