use confmigrate_domain::FormatError;
use confmigrate_edit::{EditError, FingerprintError};
use std::fmt;

/// Which input a parse error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Current,
    Reference,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Current => f.write_str("current"),
            Document::Reference => f.write_str("reference"),
        }
    }
}

/// Error type for migration runs. "Unchanged" is not an error.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// An input could not be parsed; no partial migration is attempted.
    #[error("parse {which} config: {source}")]
    Parse {
        which: Document,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error("render suggestion for `{path}`: {source}")]
    Render {
        path: String,
        #[source]
        source: FormatError,
    },

    #[error("invalid timestamp format `{0}`")]
    TimestampFormat(String),
}

impl From<EditError> for MigrateError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::Render { path, source } => MigrateError::Render { path, source },
            EditError::Fingerprint(e) => MigrateError::Fingerprint(e),
        }
    }
}

impl MigrateError {
    pub fn is_parse(&self) -> bool {
        matches!(self, MigrateError::Parse { .. })
    }

    /// Returns the recommended exit code for this error. Every variant is a tool error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
