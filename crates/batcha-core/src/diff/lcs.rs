//! Longest-common-subsequence length table

/// Dynamic-programming table over two line sequences.
///
/// `get(i, j)` is the LCS length of `a[i..]` and `b[j..]`. Row `m` and
/// column `n` are zero.
#[derive(Debug, Clone)]
pub(crate) struct LcsTable {
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    /// Build the table by iterating backwards over both sequences
    pub(crate) fn build(a: &[&str], b: &[&str]) -> Self {
        let (m, n) = (a.len(), b.len());
        let cols = n + 1;
        let mut cells = vec![0usize; (m + 1) * cols];

        for i in (0..m).rev() {
            for j in (0..n).rev() {
                cells[i * cols + j] = if a[i] == b[j] {
                    cells[(i + 1) * cols + j + 1] + 1
                } else {
                    cells[(i + 1) * cols + j].max(cells[i * cols + j + 1])
                };
            }
        }

        Self { cols, cells }
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }
}
