use confmigrate_types::Anchor;
use regex::Regex;
use tracing::debug;

/// Finds the line a suggestion for `segments` should be inserted after.
///
/// Returning `None` is a normal outcome; the caller then appends the suggestion
/// at end of file.
pub trait AnchorLocator: Send + Sync {
    fn locate(&self, segments: &[String], lines: &[String]) -> Option<Anchor>;
}

/// Heuristic locator over unparsed lines.
///
/// A single top-to-bottom scan keeps a cursor into `segments`. Each line is tried
/// against the segments from the cursor onward; the first that matches `key:`
/// (optionally quoted) records the line as the best anchor and moves the cursor to
/// that segment. Later occurrences therefore win, and the scan never steps back to
/// a shallower segment.
///
/// Duplicate key names elsewhere in the file can mislead it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineAnchorLocator;

impl AnchorLocator for LineAnchorLocator {
    fn locate(&self, segments: &[String], lines: &[String]) -> Option<Anchor> {
        if segments.is_empty() {
            return None;
        }

        let patterns: Vec<Option<Regex>> = segments.iter().map(|s| key_pattern(s)).collect();
        let matches =
            |j: usize, line: &str| patterns[j].as_ref().is_some_and(|re| re.is_match(line));

        let mut cursor = 0;
        let mut best: Option<Anchor> = None;
        for (i, line) in lines.iter().enumerate() {
            if let Some(j) = (cursor..segments.len()).find(|&j| matches(j, line)) {
                cursor = j;
                best = Some(Anchor {
                    line_index: i,
                    matched_depth: j + 1,
                });
            }
        }

        // Anything shallower than the leaf's parent would put the suggestion at the
        // wrong nesting level.
        let anchor = best.filter(|a| a.matched_depth + 1 >= segments.len());
        debug!(path = segments.join("."), ?anchor, "located anchor");
        anchor
    }
}

fn key_pattern(segment: &str) -> Option<Regex> {
    let key = regex::escape(segment);
    Regex::new(&format!(r#"^[ \t]*(?:{key}|'{key}'|"{key}"):"#)).ok()
}
