//! Error types for confmigrate-edit.

use confmigrate_domain::FormatError;
use thiserror::Error;

/// The top-level error type for edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// A missing value could not be rendered into a suggestion.
    #[error("render suggestion for `{path}`: {source}")]
    Render {
        path: String,
        #[source]
        source: FormatError,
    },

    /// The reference digest could not be computed.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
}

/// Raised by a [`Fingerprinter`](crate::Fingerprinter).
#[derive(Debug, Error)]
#[error("{algorithm} fingerprint failed: {message}")]
pub struct FingerprintError {
    pub algorithm: &'static str,
    pub message: String,
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
