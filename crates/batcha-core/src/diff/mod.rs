//! Line-oriented text diff
//!
//! Produces unified-diff output from two text blobs. The pipeline is
//! lines -> LCS table -> edit script -> hunks -> text, all owned by a single
//! call.

mod edit_script;
mod lcs;
mod text_diff;


pub use edit_script::{EditOp, OpKind};
pub use text_diff::{CONTEXT_LINES, DiffHunk, DiffLine, TextDiff};

/// Produce a unified diff between `a` and `b`.
///
/// Returns an empty string when the two texts split into identical line
/// sequences.
pub fn unified_diff(a: &str, b: &str, label_a: &str, label_b: &str) -> String {
    TextDiff::compute(a, b).format_unified(label_a, label_b)
}

/// Split text on `'\n'`, keeping the trailing empty segment.
///
/// `""` yields `[""]` and `"a\n"` yields `["a", ""]`.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}
