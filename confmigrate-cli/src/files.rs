//! Reading and writing config files as line buffers.

use anyhow::Context;
use camino::Utf8Path;
use diffy::PatchFormatter;
use fs_err as fs;

/// A text file split into lines, remembering how to put it back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFile {
    pub lines: Vec<String>,
    crlf: bool,
    trailing_newline: bool,
}

impl LineFile {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            crlf: text.contains("\r\n"),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    pub fn read(path: &Utf8Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
        Ok(Self::parse(&text))
    }

    pub fn text(&self) -> String {
        self.render(&self.lines)
    }

    /// Join `lines` using this file's line ending and trailing-newline style.
    pub fn render(&self, lines: &[String]) -> String {
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut out = lines.join(eol);
        if self.trailing_newline && !lines.is_empty() {
            out.push_str(eol);
        }
        out
    }
}

/// Unified diff of one file, with a git-style header.
pub fn render_patch(path: &Utf8Path, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(old, new);
    let formatted = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy labels the sides `original`/`modified`; keep only its hunks.
    let hunks = formatted.find("@@").map_or("", |at| &formatted[at..]);
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
