//! Bandwidth and envelope metrics for symmetric reorderings.

use crate::data::SparseMatrix;

/// Largest `|i - j|` over stored entries, with rows and columns relabeled by
/// `position` (`position[old] = new`). `None` keeps the current labels.
pub fn bandwidth(matrix: &SparseMatrix, position: Option<&[usize]>) -> usize {
    matrix
        .entries()
        .map(|(row, col, _)| {
            let (r, c) = relabel(row, col, position);
            r.abs_diff(c)
        })
        .max()
        .unwrap_or(0)
}

/// Envelope size of the symmetrized pattern: the sum over rows `i` of
/// `i - f(i)`, where `f(i)` is the first column holding an entry in row `i`
/// of the lower triangle.
pub fn envelope(matrix: &SparseMatrix, position: Option<&[usize]>) -> usize {
    let n = matrix.rows().max(matrix.cols());
    let mut first: Vec<usize> = (0..n).collect();
    for (row, col, _) in matrix.entries() {
        let (r, c) = relabel(row, col, position);
        let (lo, hi) = if r < c { (r, c) } else { (c, r) };
        first[hi] = first[hi].min(lo);
    }
    first.iter().enumerate().map(|(i, &f)| i - f).sum()
}

fn relabel(row: usize, col: usize, position: Option<&[usize]>) -> (usize, usize) {
    match position {
        Some(p) => (p[row], p[col]),
        None => (row, col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandwidth_and_envelope() {
        let matrix = SparseMatrix::from_triplets(
            (4, 4),
            &[(0, 0, 1.0), (3, 0, 1.0), (1, 2, 1.0), (2, 2, 1.0)],
        )
        .unwrap();
        assert_eq!(bandwidth(&matrix, None), 3);
        // row 3 reaches column 0, row 2 reaches column 1
        assert_eq!(envelope(&matrix, None), 3 + 1);

        // swap labels 0 and 2
        let position = [2, 1, 0, 3];
        assert_eq!(bandwidth(&matrix, Some(&position)), 1);
        assert_eq!(envelope(&matrix, Some(&position)), 1 + 1);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = SparseMatrix::from_triplets((3, 3), &[]).unwrap();
        assert_eq!(bandwidth(&matrix, None), 0);
        assert_eq!(envelope(&matrix, None), 0);
    }
}
