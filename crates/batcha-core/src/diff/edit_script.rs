//! Edit script construction from an LCS table

use super::lcs::LcsTable;

/// Kind of a line-level edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Equal,
    Delete,
    Insert,
}

impl OpKind {
    /// Unified-diff marker character
    pub fn marker(self) -> char {
        match self {
            OpKind::Equal => ' ',
            OpKind::Delete => '-',
            OpKind::Insert => '+',
        }
    }

    /// Whether the operation consumes a line of the old sequence
    pub fn touches_old(self) -> bool {
        matches!(self, OpKind::Equal | OpKind::Delete)
    }

    /// Whether the operation consumes a line of the new sequence
    pub fn touches_new(self) -> bool {
        matches!(self, OpKind::Equal | OpKind::Insert)
    }
}

/// One line-level operation.
///
/// `pos_a` and `pos_b` are the zero-based cursor positions in the old and new
/// sequences at the time the operation was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOp<'a> {
    pub kind: OpKind,
    pub line: &'a str,
    pub pos_a: usize,
    pub pos_b: usize,
}

impl<'a> EditOp<'a> {
    fn new(kind: OpKind, line: &'a str, pos_a: usize, pos_b: usize) -> Self {
        Self {
            kind,
            line,
            pos_a,
            pos_b,
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind != OpKind::Equal
    }
}

/// Walk both sequences guided by `table` and emit the edit script.
///
/// When both candidate subsequences are equally long the deletion is taken
/// first.
pub(crate) fn build<'a>(a: &[&'a str], b: &[&'a str], table: &LcsTable) -> Vec<EditOp<'a>> {
    let mut ops = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            ops.push(EditOp::new(OpKind::Equal, a[i], i, j));
            i += 1;
            j += 1;
        } else if table.get(i + 1, j) >= table.get(i, j + 1) {
            ops.push(EditOp::new(OpKind::Delete, a[i], i, j));
            i += 1;
        } else {
            ops.push(EditOp::new(OpKind::Insert, b[j], i, j));
            j += 1;
        }
    }

    for (offset, line) in a[i..].iter().enumerate() {
        ops.push(EditOp::new(OpKind::Delete, line, i + offset, j));
    }
    let i = a.len();
    for (offset, line) in b[j..].iter().enumerate() {
        ops.push(EditOp::new(OpKind::Insert, line, i, j + offset));
    }

    ops
}
