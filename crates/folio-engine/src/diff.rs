//! # Version Diff
//!
//! Line-level comparison of two plain-text renderings of a document, used to
//! show what changed between stored revisions.
//!
//! The edit script comes from a classic longest-common-subsequence table:
//! O(m·n) time and space, which suits blog-post sized documents and nothing
//! much larger. Lines are compared verbatim; whitespace changes are changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::plain_text::extract_plain_text_from_json;
use crate::portable_text::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Unchanged,
}

impl DiffKind {
    /// Prefix used by the unified rendering.
    pub fn sigil(self) -> &'static str {
        match self {
            DiffKind::Added => "+ ",
            DiffKind::Removed => "- ",
            DiffKind::Unchanged => "  ",
        }
    }
}

/// One line of the edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.sigil(), self.text)
    }
}

/// Computes the line edit script turning `old` into `new`, in document order.
///
/// An empty text has no lines, so diffing against it yields only additions or
/// only removals.
pub fn compute_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let (m, n) = (old_lines.len(), new_lines.len());

    // dp[i][j]: LCS length of old_lines[..i] and new_lines[..j]
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if old_lines[i - 1] == new_lines[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut script = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            script.push(DiffLine::new(DiffKind::Unchanged, old_lines[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            script.push(DiffLine::new(DiffKind::Added, new_lines[j - 1]));
            j -= 1;
        } else {
            script.push(DiffLine::new(DiffKind::Removed, old_lines[i - 1]));
            i -= 1;
        }
    }

    script.reverse();
    script
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// The diff between two stored revisions of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDiff {
    pub lines: Vec<DiffLine>,
}

impl VersionDiff {
    pub fn between(old: &str, new: &str) -> Self {
        Self {
            lines: compute_diff(old, new),
        }
    }

    pub fn additions(&self) -> usize {
        self.count(DiffKind::Added)
    }

    pub fn deletions(&self) -> usize {
        self.count(DiffKind::Removed)
    }

    /// True when no line was added or removed.
    pub fn is_unchanged(&self) -> bool {
        self.lines
            .iter()
            .all(|line| line.kind == DiffKind::Unchanged)
    }

    fn count(&self, kind: DiffKind) -> usize {
        self.lines.iter().filter(|line| line.kind == kind).count()
    }
}

impl fmt::Display for VersionDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Diffs two stored Portable Text payloads through their plain-text rendering.
pub fn diff_versions(old_json: &str, new_json: &str) -> Result<VersionDiff, DecodeError> {
    let old = extract_plain_text_from_json(old_json)?;
    let new = extract_plain_text_from_json(new_json)?;
    Ok(VersionDiff::between(&old, &new))
}
