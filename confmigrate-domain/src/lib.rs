//! Domain logic: compare a user's config tree against a reference tree.
//!
//! This crate owns *what* differs between the two documents. It does not own
//! *how* suggestions are written back into the user's file; that's the
//! `confmigrate-edit` crate.

mod differ;
mod ports;
mod yaml;

pub use differ::diff_trees;
pub use ports::{DocumentFormat, FormatError};
pub use yaml::YamlFormat;
