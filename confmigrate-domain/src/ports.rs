use confmigrate_types::{ConfigTree, Value};
use thiserror::Error;

/// Errors raised by a [`DocumentFormat`].
#[derive(Debug, Error)]
pub enum FormatError {
    /// The text could not be parsed into a tree.
    #[error("{format} parse error: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// A value could not be serialized back to text.
    #[error("{format} dump error: {message}")]
    Dump {
        format: &'static str,
        message: String,
    },
}

/// Parser/serializer for the textual config format.
///
/// confmigrate never re-dumps a whole document; `dump` is only used to render a
/// single missing value into a commented suggestion.
pub trait DocumentFormat: Send + Sync {
    fn name(&self) -> &'static str;

    /// Parse a whole document. An empty document is an empty tree.
    fn parse(&self, text: &str) -> Result<ConfigTree, FormatError>;

    /// Serialize one value, without a trailing newline.
    fn dump(&self, value: &Value) -> Result<String, FormatError>;
}
