//! Edit engine for confmigrate.
//!
//! Responsibilities:
//! - Find an anchor line for a dotted key path in the raw, unparsed file.
//! - Insert timestamped, commented suggestions for missing keys.
//! - Read, compare, and refresh the embedded fingerprint marker.
//!
//! Everything here works on the user's lines as text. Existing lines are never
//! edited, removed, or reordered; the only exception is the marker line, which is
//! replaced in place.

mod error;
mod locate;
mod marker;
mod patch;

pub use error::{EditError, EditResult, FingerprintError};
pub use locate::{AnchorLocator, LineAnchorLocator};
pub use marker::{
    FingerprintGate, Fingerprinter, GateDecision, MARKER_PREFIX, MARKER_RULE, Sha256Fingerprinter,
    canonical_text, marker_line, read_marker,
};
pub use patch::{BANNER_RULE, PatchOutcome, PatchWriter, update_banner};
