//! Clap-free settings for the migration engine.

/// Default banner timestamp, e.g. `2024/05/01 12:30`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Settings for [`MigrationEngine`](crate::MigrationEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateSettings {
    /// `chrono` strftime format for the `UPDATE` banner.
    pub timestamp_format: String,
}

impl Default for MigrateSettings {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}
