//! Embeddable core library for confmigrate.
//!
//! Provides a clap-free, I/O-free entry point suitable for calling from a
//! config lifecycle at load or reload time. The caller reads the user's file,
//! hands its lines and the shipped reference text to the engine, and persists the
//! returned lines only when the engine reports a change.
//!
//! # Port traits
//!
//! External collaborators are abstracted behind traits re-exported from [`ports`]:
//! - [`DocumentFormat`](ports::DocumentFormat): parse documents, dump single values
//! - [`Fingerprinter`](ports::Fingerprinter): hash the reference document
//! - [`AnchorLocator`](ports::AnchorLocator): find insertion points in raw lines
//! - [`Clock`](ports::Clock): timestamps for suggestion banners
//!
//! The [`adapters`] module provides the clock implementations.
//!
//! # Entry points
//!
//! - [`MigrationEngine::migrate`](pipeline::MigrationEngine::migrate)
//! - [`MigrationEngine::migrate_with_report`](pipeline::MigrationEngine::migrate_with_report)

pub mod adapters;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use error::{Document, MigrateError};
pub use pipeline::{MigrationEngine, MigrationOutcome};
pub use settings::MigrateSettings;

// Re-export shared types so embedders don't need confmigrate-types directly.
pub use confmigrate_types::{ConfigTree, DiffEntry, DiffKind, MigrationReport, Value};
