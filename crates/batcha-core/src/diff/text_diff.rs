//! Hunk assembly and unified-diff formatting

use std::fmt::Write;

use super::edit_script::{self, EditOp, OpKind};
use super::lcs::LcsTable;
use super::split_lines;

/// Unchanged lines kept on each side of a change region
pub const CONTEXT_LINES: usize = 3;

/// Text diff between two documents
#[derive(Debug, Clone, Default)]
pub struct TextDiff {
    pub hunks: Vec<DiffHunk>,
}

/// A diff hunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// A diff line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

impl DiffLine {
    fn marker(&self) -> char {
        match self {
            DiffLine::Context(_) => ' ',
            DiffLine::Added(_) => '+',
            DiffLine::Removed(_) => '-',
        }
    }

    fn text(&self) -> &str {
        match self {
            DiffLine::Context(s) | DiffLine::Added(s) | DiffLine::Removed(s) => s,
        }
    }

    fn is_change(&self) -> bool {
        !matches!(self, DiffLine::Context(_))
    }
}

impl DiffHunk {
    /// Build a hunk from a contiguous run of operations.
    ///
    /// Returns `None` for an empty run or a run without any change.
    fn from_ops(ops: &[EditOp<'_>]) -> Option<Self> {
        let first = ops.first()?;
        if !ops.iter().any(EditOp::is_change) {
            return None;
        }

        let old_count = ops.iter().filter(|op| op.kind.touches_old()).count();
        let new_count = ops.iter().filter(|op| op.kind.touches_new()).count();
        let lines = ops
            .iter()
            .map(|op| match op.kind {
                OpKind::Equal => DiffLine::Context(op.line.to_string()),
                OpKind::Delete => DiffLine::Removed(op.line.to_string()),
                OpKind::Insert => DiffLine::Added(op.line.to_string()),
            })
            .collect();

        Some(Self {
            old_start: first.pos_a + 1,
            old_count,
            new_start: first.pos_b + 1,
            new_count,
            lines,
        })
    }

    fn write_to(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        );
        for line in &self.lines {
            out.push(line.marker());
            out.push_str(line.text());
            out.push('\n');
        }
    }
}

impl TextDiff {
    /// Compute diff between two strings
    pub fn compute(old: &str, new: &str) -> Self {
        let old_lines = split_lines(old);
        let new_lines = split_lines(new);

        let table = LcsTable::build(&old_lines, &new_lines);
        let ops = edit_script::build(&old_lines, &new_lines, &table);
        Self {
            hunks: Self::assemble_hunks(&ops),
        }
    }

    /// Group operations into context-bounded hunks.
    ///
    /// Two changes whose operation indices differ by at most
    /// `2 * CONTEXT_LINES` share a hunk.
    fn assemble_hunks(ops: &[EditOp<'_>]) -> Vec<DiffHunk> {
        let mut hunks = Vec::new();
        let mut start: Option<usize> = None;
        let mut last_change = 0;

        for (i, op) in ops.iter().enumerate() {
            if !op.is_change() {
                continue;
            }
            match start {
                None => start = Some(i.saturating_sub(CONTEXT_LINES)),
                Some(open) if i - last_change > 2 * CONTEXT_LINES => {
                    let end = (last_change + CONTEXT_LINES + 1).min(ops.len());
                    hunks.extend(DiffHunk::from_ops(&ops[open..end]));
                    start = Some(i - CONTEXT_LINES);
                }
                Some(_) => {}
            }
            last_change = i;
        }

        if let Some(open) = start {
            let end = (last_change + CONTEXT_LINES + 1).min(ops.len());
            hunks.extend(DiffHunk::from_ops(&ops[open..end]));
        }

        hunks
    }

    /// Format diff as unified diff string.
    ///
    /// Empty when there are no changes.
    pub fn format_unified(&self, old_label: &str, new_label: &str) -> String {
        if !self.has_changes() {
            return String::new();
        }

        let mut output = String::new();
        let _ = writeln!(output, "--- {}", old_label);
        let _ = writeln!(output, "+++ {}", new_label);
        for hunk in &self.hunks {
            hunk.write_to(&mut output);
        }
        output
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.hunks
            .iter()
            .any(|h| h.lines.iter().any(DiffLine::is_change))
    }

    /// Count added lines
    pub fn added_count(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Count removed lines
    pub fn removed_count(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }
}
