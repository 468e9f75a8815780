//! The migration pipeline: gate, diff, patch, stamp.
//!
//! Entry points are I/O-agnostic: the caller supplies the current file as lines
//! and the reference document as text, and persists the result itself.

use crate::adapters::SystemClock;
use crate::error::{Document, MigrateError};
use crate::ports::{AnchorLocator, Clock, DocumentFormat, Fingerprinter};
use crate::settings::MigrateSettings;
use confmigrate_domain::{YamlFormat, diff_trees};
use confmigrate_edit::{
    FingerprintGate, GateDecision, LineAnchorLocator, PatchWriter, Sha256Fingerprinter,
    canonical_text,
};
use confmigrate_types::diff::{differs, missing};
use confmigrate_types::{ConfigTree, DiffEntry, MigrationReport};
use std::fmt::Write as _;
use tracing::{debug, info};

/// Outcome of [`MigrationEngine::migrate_with_report`].
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// The updated file, or `None` when nothing needs to be written.
    pub lines: Option<Vec<String>>,
    pub report: MigrationReport,
}

/// Reconciles a user's config file with a reference document.
///
/// Holds its collaborators explicitly; there is no process-wide state, so one
/// engine can serve independent inputs from several threads.
pub struct MigrationEngine {
    format: Box<dyn DocumentFormat>,
    fingerprinter: Box<dyn Fingerprinter>,
    locator: Box<dyn AnchorLocator>,
    clock: Box<dyn Clock>,
    settings: MigrateSettings,
}

impl Default for MigrationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationEngine {
    /// YAML documents, SHA-256 fingerprints, line-scan anchoring, local time.
    pub fn new() -> Self {
        Self {
            format: Box::new(YamlFormat),
            fingerprinter: Box::new(Sha256Fingerprinter),
            locator: Box::new(LineAnchorLocator),
            clock: Box::new(SystemClock),
            settings: MigrateSettings::default(),
        }
    }

    pub fn with_format(mut self, format: impl DocumentFormat + 'static) -> Self {
        self.format = Box::new(format);
        self
    }

    pub fn with_fingerprinter(mut self, fingerprinter: impl Fingerprinter + 'static) -> Self {
        self.fingerprinter = Box::new(fingerprinter);
        self
    }

    pub fn with_locator(mut self, locator: impl AnchorLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_settings(mut self, settings: MigrateSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run a migration. `Ok(None)` means the file is up to date and must not be
    /// rewritten.
    pub fn migrate(
        &self,
        current: &[String],
        reference_text: &str,
    ) -> Result<Option<Vec<String>>, MigrateError> {
        Ok(self.migrate_with_report(current, reference_text)?.lines)
    }

    /// Like [`migrate`](Self::migrate), also returning what was found and done.
    pub fn migrate_with_report(
        &self,
        current: &[String],
        reference_text: &str,
    ) -> Result<MigrationOutcome, MigrateError> {
        let (current_tree, reference_tree) =
            self.parse_both(&current.join("\n"), reference_text)?;

        let decision = self.gate(current, reference_text)?;
        let mut report = MigrationReport::new(decision.digest.clone(), decision.existing.clone());
        if !decision.needed {
            debug!("reference fingerprint unchanged; skipping diff");
            return Ok(MigrationOutcome {
                lines: None,
                report,
            });
        }
        report.needed = true;

        let entries = diff_trees(&current_tree, &reference_tree);
        report.entries = entries.clone();
        if missing(&entries).next().is_none() {
            // Only customized values (or nothing) differ. The marker is left alone
            // so a later structural change in the reference is still detected.
            debug!(differs = differs(&entries).count(), "no missing keys; nothing to write");
            return Ok(MigrationOutcome {
                lines: None,
                report,
            });
        }

        let stamp = self.stamp()?;
        let mut lines = current.to_vec();
        let writer = PatchWriter::new(self.format.as_ref(), self.locator.as_ref(), stamp.clone());
        let outcome = writer.apply(&mut lines, &entries)?;
        report.placements = outcome.placements;

        if !outcome.changed {
            return Ok(MigrationOutcome {
                lines: None,
                report,
            });
        }

        report.marker = Some(FingerprintGate::refresh(&mut lines, &decision));
        report.changed = true;
        report.stamp = Some(stamp);
        info!(
            inline = report.inline_count(),
            trailing = report.trailing_count(),
            digest = %decision.digest,
            "migrated config"
        );

        Ok(MigrationOutcome {
            lines: Some(lines),
            report,
        })
    }

    /// Compare the reference fingerprint with the marker embedded in `current`.
    pub fn gate(
        &self,
        current: &[String],
        reference_text: &str,
    ) -> Result<GateDecision, MigrateError> {
        let gate = FingerprintGate::new(self.fingerprinter.as_ref());
        Ok(gate.should_migrate(&canonical_text(reference_text), current)?)
    }

    /// Digest of a reference document's canonical text.
    pub fn fingerprint(&self, reference_text: &str) -> Result<String, MigrateError> {
        Ok(self
            .fingerprinter
            .fingerprint(&canonical_text(reference_text))?)
    }

    /// All difference records between two documents, `Differs` included.
    pub fn diff_texts(
        &self,
        current_text: &str,
        reference_text: &str,
    ) -> Result<Vec<DiffEntry>, MigrateError> {
        let (current, reference) = self.parse_both(current_text, reference_text)?;
        Ok(diff_trees(&current, &reference))
    }

    fn parse_both(
        &self,
        current_text: &str,
        reference_text: &str,
    ) -> Result<(ConfigTree, ConfigTree), MigrateError> {
        let current = self.parse(current_text, Document::Current)?;
        let reference = self.parse(reference_text, Document::Reference)?;
        Ok((current, reference))
    }

    fn parse(&self, text: &str, which: Document) -> Result<ConfigTree, MigrateError> {
        let tree = self
            .format
            .parse(text)
            .map_err(|source| MigrateError::Parse { which, source })?;
        debug!(format = self.format.name(), %which, keys = tree.len(), "parsed config");
        Ok(tree)
    }

    /// One timestamp per run, shared by every banner it writes.
    fn stamp(&self) -> Result<String, MigrateError> {
        let fmt = &self.settings.timestamp_format;
        let mut out = String::new();
        write!(out, "{}", self.clock.now().format(fmt))
            .map_err(|_| MigrateError::TimestampFormat(fmt.clone()))?;
        Ok(out)
    }
}
