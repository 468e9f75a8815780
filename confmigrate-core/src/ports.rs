//! Port traits abstracting the engine's collaborators.

use chrono::NaiveDateTime;

pub use confmigrate_domain::{DocumentFormat, FormatError};
pub use confmigrate_edit::{AnchorLocator, FingerprintError, Fingerprinter};

/// Source of the timestamp written into suggestion banners.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
