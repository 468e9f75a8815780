use crate::error::FingerprintError;
use confmigrate_types::MarkerAction;
use tracing::debug;

/// Lines starting with this prefix carry the fingerprint of the last reference
/// document the file was migrated against.
pub const MARKER_PREFIX: &str = "# HASH ";

/// Cosmetic rule around a freshly appended marker.
pub const MARKER_RULE: &str = "# --------------------------------------------- #";

/// Content hasher port.
pub trait Fingerprinter: Send + Sync {
    fn algorithm(&self) -> &'static str;

    fn fingerprint(&self, text: &str) -> Result<String, FingerprintError>;
}

/// SHA-256, lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Fingerprinter;

impl Fingerprinter for Sha256Fingerprinter {
    fn algorithm(&self) -> &'static str {
        "sha256"
    }

    fn fingerprint(&self, text: &str) -> Result<String, FingerprintError> {
        Ok(confmigrate_hash::sha256_hex_str(text))
    }
}

/// Canonical form of a reference document: its lines (CRLF or LF) rejoined with
/// `\n`, without a trailing newline.
pub fn canonical_text(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n")
}

pub fn marker_line(digest: &str) -> String {
    format!("{MARKER_PREFIX}{digest} #")
}

/// Digest token of the first marker line, if any.
///
/// The token runs from the prefix up to the next space. A marker line with no
/// token reads as absent.
pub fn read_marker(lines: &[String]) -> Option<String> {
    let line = lines.iter().find(|l| l.starts_with(MARKER_PREFIX))?;
    let token = line[MARKER_PREFIX.len()..].trim().split(' ').next()?;
    (!token.is_empty()).then(|| token.to_string())
}

/// Outcome of comparing the reference digest with the file's marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    /// True when the digests differ and a diff must run.
    pub needed: bool,
    /// Digest of the reference canonical text.
    pub digest: String,
    /// Digest read from the current file's marker.
    pub existing: Option<String>,
}

/// Decides whether a migration run is needed, and stamps the result.
///
/// Digest equality is the only staleness signal: when the marker matches, the
/// trees are not compared at all.
pub struct FingerprintGate<'a> {
    fingerprinter: &'a dyn Fingerprinter,
}

impl<'a> FingerprintGate<'a> {
    pub fn new(fingerprinter: &'a dyn Fingerprinter) -> Self {
        Self { fingerprinter }
    }

    pub fn should_migrate(
        &self,
        reference_canonical: &str,
        lines: &[String],
    ) -> Result<GateDecision, FingerprintError> {
        let digest = self.fingerprinter.fingerprint(reference_canonical)?;
        let existing = read_marker(lines);
        let needed = existing.as_deref() != Some(digest.as_str());
        debug!(
            algorithm = self.fingerprinter.algorithm(),
            %digest,
            existing = existing.as_deref().unwrap_or("<none>"),
            needed,
            "fingerprint gate"
        );
        Ok(GateDecision {
            needed,
            digest,
            existing,
        })
    }

    /// Write `decision.digest` into the buffer.
    ///
    /// The first marker line is replaced in place; without one, a ruled marker
    /// block is appended at end of file. Call only after a run that changed the
    /// buffer.
    pub fn refresh(lines: &mut Vec<String>, decision: &GateDecision) -> MarkerAction {
        let marker = marker_line(&decision.digest);
        match lines.iter().position(|l| l.starts_with(MARKER_PREFIX)) {
            Some(line_index) => {
                lines[line_index] = marker;
                MarkerAction::Replaced { line_index }
            }
            None => {
                lines.push(MARKER_RULE.to_string());
                lines.push(marker);
                lines.push(MARKER_RULE.to_string());
                MarkerAction::Appended
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str);

    impl Fingerprinter for Fixed {
        fn algorithm(&self) -> &'static str {
            "fixed"
        }

        fn fingerprint(&self, _text: &str) -> Result<String, FingerprintError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    impl Fingerprinter for Broken {
        fn algorithm(&self) -> &'static str {
            "broken"
        }

        fn fingerprint(&self, _text: &str) -> Result<String, FingerprintError> {
            Err(FingerprintError {
                algorithm: "broken",
                message: "no digest".to_string(),
            })
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn canonical_text_normalizes_line_endings_and_trailing_newline() {
        assert_eq!(canonical_text("a: 1\r\nb: 2\r\n"), "a: 1\nb: 2");
        assert_eq!(canonical_text("a: 1\nb: 2"), "a: 1\nb: 2");
    }

    #[test]
    fn read_marker_takes_token_up_to_space() {
        assert_eq!(
            read_marker(&lines(&["a: 1", "# HASH abc #"])),
            Some("abc".to_string())
        );
        assert_eq!(read_marker(&lines(&["# HASH abc"])), Some("abc".to_string()));
    }

    #[test]
    fn read_marker_uses_first_marker_only() {
        let buf = lines(&["# HASH first #", "# HASH second #"]);
        assert_eq!(read_marker(&buf), Some("first".to_string()));
    }

    #[test]
    fn indented_or_empty_markers_are_absent() {
        assert_eq!(read_marker(&lines(&["  # HASH abc #"])), None);
        assert_eq!(read_marker(&lines(&["# HASH "])), None);
        assert_eq!(read_marker(&lines(&["#HASH abc"])), None);
    }

    #[test]
    fn matching_digest_is_not_needed() {
        let fp = Fixed("abc");
        let gate = FingerprintGate::new(&fp);
        let decision = gate.should_migrate("ref", &lines(&["# HASH abc #"])).unwrap();
        assert!(!decision.needed);
        assert_eq!(decision.existing.as_deref(), Some("abc"));
    }

    #[test]
    fn differing_or_absent_digest_is_needed() {
        let fp = Fixed("xyz");
        let gate = FingerprintGate::new(&fp);
        assert!(gate.should_migrate("ref", &lines(&["# HASH abc #"])).unwrap().needed);
        assert!(gate.should_migrate("ref", &lines(&["a: 1"])).unwrap().needed);
    }

    #[test]
    fn hasher_failure_propagates() {
        let gate = FingerprintGate::new(&Broken);
        let err = gate.should_migrate("ref", &[]).unwrap_err();
        assert_eq!(err.algorithm, "broken");
    }

    #[test]
    fn refresh_replaces_existing_marker_in_place() {
        let mut buf = lines(&["a: 1", "# HASH abc #", "b: 2"]);
        let decision = GateDecision {
            needed: true,
            digest: "xyz".to_string(),
            existing: Some("abc".to_string()),
        };
        let action = FingerprintGate::refresh(&mut buf, &decision);

        assert_eq!(action, MarkerAction::Replaced { line_index: 1 });
        assert_eq!(buf, lines(&["a: 1", "# HASH xyz #", "b: 2"]));
    }

    #[test]
    fn refresh_appends_ruled_marker_when_absent() {
        let mut buf = lines(&["a: 1"]);
        let decision = GateDecision {
            needed: true,
            digest: "h1".to_string(),
            existing: None,
        };
        let action = FingerprintGate::refresh(&mut buf, &decision);

        assert_eq!(action, MarkerAction::Appended);
        assert_eq!(buf, lines(&["a: 1", MARKER_RULE, "# HASH h1 #", MARKER_RULE]));
    }

    #[test]
    fn sha256_fingerprint_is_hex() {
        let digest = Sha256Fingerprinter.fingerprint("a: 1").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
