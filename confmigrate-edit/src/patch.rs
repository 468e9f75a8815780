use crate::error::{EditError, EditResult};
use crate::locate::AnchorLocator;
use confmigrate_domain::DocumentFormat;
use confmigrate_types::diff::missing;
use confmigrate_types::{DiffEntry, Placement};
use tracing::debug;

/// Rule line of the suggestion banner.
pub const BANNER_RULE: &str = "# ------------------------- #";

/// The three banner lines placed above every group of suggestions.
pub fn update_banner(indent: &str, stamp: &str) -> [String; 3] {
    [
        format!("{indent}{BANNER_RULE}"),
        format!("{indent}#  UPDATE {stamp}  #"),
        format!("{indent}{BANNER_RULE}"),
    ]
}

/// Result of [`PatchWriter::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub changed: bool,
    pub placements: Vec<Placement>,
}

/// Inserts commented suggestions for missing keys into a line buffer.
///
/// Only `Missing` entries are acted upon; `Differs` entries are skipped so a
/// customized value is never touched.
pub struct PatchWriter<'a> {
    format: &'a dyn DocumentFormat,
    locator: &'a dyn AnchorLocator,
    stamp: String,
}

impl<'a> PatchWriter<'a> {
    /// `stamp` is written into every banner of this run.
    pub fn new(
        format: &'a dyn DocumentFormat,
        locator: &'a dyn AnchorLocator,
        stamp: impl Into<String>,
    ) -> Self {
        Self {
            format,
            locator,
            stamp: stamp.into(),
        }
    }

    /// Insert suggestions, in entry order.
    ///
    /// Entries with an anchor go right after the anchor line, indented two spaces
    /// per level below the root. Entries without one are collected and appended
    /// under a single banner at end of file, keyed by their full dotted path.
    pub fn apply(
        &self,
        lines: &mut Vec<String>,
        entries: &[DiffEntry],
    ) -> EditResult<PatchOutcome> {
        let mut outcome = PatchOutcome::default();
        let mut trailing: Vec<(&DiffEntry, String)> = Vec::new();

        for entry in missing(entries) {
            let dumped = self.render(entry)?;

            let Some(anchor) = self.locator.locate(&entry.segments, lines) else {
                trailing.push((entry, dumped));
                continue;
            };

            let indent = "  ".repeat(entry.depth().saturating_sub(1));
            let mut block: Vec<String> = update_banner(&indent, &self.stamp).into();
            block.extend(suggestion(&indent, entry.leaf_key(), &dumped));

            let at = anchor.line_index + 1;
            let inserted = block.len();
            lines.splice(at..at, block);

            debug!(path = %entry.path, after_line = anchor.line_index, "inserted suggestion");
            outcome.placements.push(Placement::Inline {
                path: entry.path.clone(),
                after_line: anchor.line_index,
                lines_inserted: inserted,
            });
            outcome.changed = true;
        }

        if !trailing.is_empty() {
            lines.extend(update_banner("", &self.stamp));
            for (entry, dumped) in trailing {
                lines.extend(suggestion("", &entry.path, &dumped));
                debug!(path = %entry.path, "appended suggestion at end of file");
                outcome.placements.push(Placement::Trailing {
                    path: entry.path.clone(),
                });
            }
            outcome.changed = true;
        }

        Ok(outcome)
    }

    fn render(&self, entry: &DiffEntry) -> EditResult<String> {
        self.format
            .dump(&entry.payload)
            .map_err(|source| EditError::Render {
                path: entry.path.clone(),
                source,
            })
    }
}

/// Commented `key: value` line, or a commented key header followed by the
/// serialized block nested two spaces below it.
///
/// Removing the leading `# ` from each line yields valid nested text.
fn suggestion(indent: &str, key: &str, dumped: &str) -> Vec<String> {
    let body: Vec<&str> = dumped.lines().collect();
    match body.as_slice() {
        [] => vec![format!("{indent}# {key}:")],
        [single] => vec![format!("{indent}# {key}: {single}")],
        many => {
            let mut out = Vec::with_capacity(many.len() + 1);
            out.push(format!("{indent}# {key}:"));
            out.extend(many.iter().map(|line| format!("{indent}#   {line}")));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::LineAnchorLocator;
    use confmigrate_domain::YamlFormat;
    use confmigrate_types::{ConfigTree, Value};
    use pretty_assertions::assert_eq;

    const STAMP: &str = "2024/05/01 12:30";

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn missing(path: &str, value: impl Into<Value>) -> DiffEntry {
        DiffEntry::missing(path.split('.').map(str::to_string).collect(), value.into())
    }

    fn apply(buf: &mut Vec<String>, entries: &[DiffEntry]) -> PatchOutcome {
        PatchWriter::new(&YamlFormat, &LineAnchorLocator, STAMP)
            .apply(buf, entries)
            .unwrap()
    }

    #[test]
    fn single_line_value_goes_after_parent_with_indent() {
        let mut buf = lines("db:\n  host: localhost\nother: 1");
        let outcome = apply(&mut buf, &[missing("db.port", 3306i64)]);

        assert_eq!(
            buf,
            lines(
                "db:\n  \
                 # ------------------------- #\n  \
                 #  UPDATE 2024/05/01 12:30  #\n  \
                 # ------------------------- #\n  \
                 # port: 3306\n  \
                 host: localhost\n\
                 other: 1"
            )
        );
        assert!(outcome.changed);
        assert_eq!(
            outcome.placements,
            vec![Placement::Inline {
                path: "db.port".to_string(),
                after_line: 0,
                lines_inserted: 4,
            }]
        );
    }

    #[test]
    fn multi_line_value_gets_header_and_nested_lines() {
        let mut buf = lines("shop:\n  enabled: true");
        let prices = ConfigTree::new().with("apple", 3i64).with("pear", 4i64);
        apply(&mut buf, &[missing("shop.prices", prices)]);

        assert_eq!(
            buf[4..8],
            lines("  # prices:\n  #   apple: 3\n  #   pear: 4\n  enabled: true")[..]
        );
    }

    #[test]
    fn unanchored_entries_share_one_trailing_banner() {
        let mut buf = lines("a: 1\n# HASH abc #");
        let outcome = apply(
            &mut buf,
            &[missing("b", 2i64), missing("c", vec!["x", "y"])],
        );

        assert_eq!(
            buf,
            lines(
                "a: 1\n\
                 # HASH abc #\n\
                 # ------------------------- #\n\
                 #  UPDATE 2024/05/01 12:30  #\n\
                 # ------------------------- #\n\
                 # b: 2\n\
                 # c:\n\
                 #   - x\n\
                 #   - y"
            )
        );
        assert_eq!(outcome.placements.len(), 2);
        assert!(outcome
            .placements
            .iter()
            .all(|p| matches!(p, Placement::Trailing { .. })));
    }

    #[test]
    fn trailing_suggestions_use_the_full_dotted_path() {
        let mut buf = lines("x: 1");
        apply(&mut buf, &[missing("a.b.c", true)]);
        assert_eq!(buf.last().map(String::as_str), Some("# a.b.c: true"));
    }

    #[test]
    fn differs_entries_are_ignored() {
        let mut buf = lines("a: 5");
        let entries = [DiffEntry::differs(vec!["a".to_string()], Value::from(5i64))];
        let outcome = apply(&mut buf, &entries);

        assert!(!outcome.changed);
        assert_eq!(buf, lines("a: 5"));
    }

    #[test]
    fn later_entries_see_earlier_insertions() {
        let mut buf = lines("a:\n  x: 1\nb:\n  y: 1");
        apply(&mut buf, &[missing("a.n", 1i64), missing("b.m", 2i64)]);

        // b: moved down by the four lines inserted under a:
        assert_eq!(buf[6], "b:");
        assert_eq!(buf[10], "  # m: 2");
        assert_eq!(buf.len(), 4 + 8);
    }

    #[test]
    fn existing_lines_keep_their_relative_order() {
        let original = lines("a:\n  x: 1\n# note\nb: 2");
        let mut buf = original.clone();
        apply(&mut buf, &[missing("a.y", 1i64), missing("z", 0i64)]);

        let kept: Vec<_> = buf.iter().filter(|l| original.contains(l)).cloned().collect();
        assert_eq!(kept, original);
    }
}
