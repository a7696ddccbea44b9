//! Sparse matrix with CSR storage, loaded from files or built in memory.

use crate::error::{Result, SparseGrindError};
use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// A real-valued sparse matrix.
///
/// Entries are kept in CSR (Compressed Sparse Row) format. Explicit zeros read
/// from a file are kept as stored entries, since they cost storage like any
/// other value.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    data: CsMat<f64>,
}

impl SparseMatrix {
    /// Wrap an existing sparse matrix, converting it to CSR if needed.
    pub fn new(data: CsMat<f64>) -> Self {
        let data = if data.is_csr() { data } else { data.to_csr() };
        Self { data }
    }

    /// Build a matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are summed, like in Matrix Market assembly.
    pub fn from_triplets(shape: (usize, usize), triplets: &[(usize, usize, f64)]) -> Result<Self> {
        let (nrows, ncols) = shape;
        let mut tri_mat = TriMat::new(shape);
        for &(row, col, val) in triplets {
            if row >= nrows {
                return Err(SparseGrindError::DimensionMismatch {
                    expected: nrows,
                    actual: row + 1,
                });
            }
            if col >= ncols {
                return Err(SparseGrindError::DimensionMismatch {
                    expected: ncols,
                    actual: col + 1,
                });
            }
            tri_mat.add_triplet(row, col, val);
        }
        Ok(Self::new(tri_mat.to_csr()))
    }

    /// Load a matrix from a Matrix Market (`.mtx`) file.
    pub fn from_matrix_market<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let tri_mat: TriMat<f64> = sprs::io::read_matrix_market(path)
            .map_err(|e| SparseGrindError::MatrixMarket(format!("{}: {}", path.display(), e)))?;
        let matrix = Self::new(tri_mat.to_csr());
        debug!(
            path = %path.display(),
            rows = matrix.rows(),
            cols = matrix.cols(),
            nnz = matrix.nnz(),
            "loaded Matrix Market file"
        );
        Ok(matrix)
    }

    /// Create from a dense matrix, storing every non-zero entry.
    pub fn from_dense(dense: &DMatrix<f64>) -> Self {
        let (nrows, ncols) = dense.shape();
        let mut tri_mat = TriMat::new((nrows, ncols));
        for row in 0..nrows {
            for col in 0..ncols {
                let val = dense[(row, col)];
                if val != 0.0 {
                    tri_mat.add_triplet(row, col, val);
                }
            }
        }
        Self::new(tri_mat.to_csr())
    }

    /// Convert to a dense matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.rows(), self.cols());
        for (row, row_vec) in self.data.outer_iterator().enumerate() {
            for (col, &val) in row_vec.iter() {
                dense[(row, col)] = val;
            }
        }
        dense
    }

    /// Get the value at (row, col), returning 0 for missing entries.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data.get(row, col).copied().unwrap_or(0.0)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.rows()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.data.cols()
    }

    /// (rows, cols).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Total number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.nnz()
    }

    /// Stored values in row-major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        self.data.data()
    }

    /// Get the underlying sparse matrix.
    #[inline]
    pub fn data(&self) -> &CsMat<f64> {
        &self.data
    }

    /// Iterate over stored entries as `(row, col, value)`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().map(|(&val, (row, col))| (row, col, val))
    }

    /// Stored entries per row.
    pub fn row_nnz(&self) -> Vec<usize> {
        self.data.outer_iterator().map(|v| v.nnz()).collect()
    }

    /// Stored entries per column.
    pub fn col_nnz(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.cols()];
        for row_vec in self.data.outer_iterator() {
            for (col, _) in row_vec.iter() {
                counts[col] += 1;
            }
        }
        counts
    }

    /// Distinct diagonal offsets (`col - row`) holding stored entries, ascending.
    pub fn diagonal_offsets(&self) -> Vec<isize> {
        diagonal_offsets(&self.data)
    }

    /// Number of in-bounds slots on every occupied diagonal.
    pub fn diagonal_stored_entries(&self) -> usize {
        diagonal_slots(self.shape(), &self.diagonal_offsets())
    }

    /// Apply a symmetric permutation: entry (i, j) moves to (perm_inv[i], perm_inv[j]),
    /// where `perm[new] = old`.
    pub fn permute_symmetric(&self, perm: &[usize]) -> Result<Self> {
        let n = self.rows();
        if !self.is_square() {
            return Err(SparseGrindError::DimensionMismatch {
                expected: n,
                actual: self.cols(),
            });
        }
        if perm.len() != n {
            return Err(SparseGrindError::DimensionMismatch {
                expected: n,
                actual: perm.len(),
            });
        }

        let mut perm_inv = vec![usize::MAX; n];
        for (new_idx, &old_idx) in perm.iter().enumerate() {
            if old_idx >= n || perm_inv[old_idx] != usize::MAX {
                return Err(SparseGrindError::Configuration(format!(
                    "Invalid permutation entry {} at position {}",
                    old_idx, new_idx
                )));
            }
            perm_inv[old_idx] = new_idx;
        }

        let mut tri_mat = TriMat::new((n, n));
        for (row, col, val) in self.entries() {
            tri_mat.add_triplet(perm_inv[row], perm_inv[col], val);
        }
        Ok(Self::new(tri_mat.to_csr()))
    }
}

/// Distinct `col - row` offsets of the stored entries of `mat`, ascending.
pub(crate) fn diagonal_offsets(mat: &CsMat<f64>) -> Vec<isize> {
    let mut offsets = BTreeSet::new();
    let csr = mat.is_csr();
    for (outer, vec) in mat.outer_iterator().enumerate() {
        for (inner, _) in vec.iter() {
            let (row, col) = if csr { (outer, inner) } else { (inner, outer) };
            offsets.insert(col as isize - row as isize);
        }
    }
    offsets.into_iter().collect()
}

/// Slots a diagonal-format matrix holds for the given offsets, clipped to the matrix bounds.
pub(crate) fn diagonal_slots(shape: (usize, usize), offsets: &[isize]) -> usize {
    let (nrows, ncols) = (shape.0 as isize, shape.1 as isize);
    offsets
        .iter()
        .map(|&k| {
            let len = if k > 0 {
                nrows.min(ncols - k)
            } else {
                (nrows + k).min(ncols)
            };
            len.max(0) as usize
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_matrix() -> SparseMatrix {
        // 3 × 4, tridiagonal-ish
        SparseMatrix::from_triplets(
            (3, 4),
            &[
                (0, 0, 4.0),
                (0, 1, -1.0),
                (1, 0, -1.0),
                (1, 1, 4.0),
                (1, 2, -1.0),
                (2, 2, 4.0),
                (2, 3, 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let mat = create_test_matrix();
        assert_eq!(mat.shape(), (3, 4));
        assert_eq!(mat.nnz(), 7);
        assert!(!mat.is_square());
    }

    #[test]
    fn test_get_values() {
        let mat = create_test_matrix();
        assert_eq!(mat.get(0, 0), 4.0);
        assert_eq!(mat.get(2, 3), 0.5);
        assert_eq!(mat.get(2, 0), 0.0);
        assert_eq!(mat.values(), &[4.0, -1.0, -1.0, 4.0, -1.0, 4.0, 0.5]);
    }

    #[test]
    fn test_row_and_col_nnz() {
        let mat = create_test_matrix();
        assert_eq!(mat.row_nnz(), vec![2, 3, 2]);
        assert_eq!(mat.col_nnz(), vec![2, 2, 2, 1]);
    }

    #[test]
    fn test_out_of_bounds_triplet() {
        let result = SparseMatrix::from_triplets((2, 2), &[(2, 0, 1.0)]);
        assert!(matches!(
            result,
            Err(SparseGrindError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_diagonal_offsets() {
        let mat = create_test_matrix();
        assert_eq!(mat.diagonal_offsets(), vec![-1, 0, 1]);
        // offset -1: 2 slots, offset 0: 3 slots, offset 1: 3 slots
        assert_eq!(mat.diagonal_stored_entries(), 8);
    }

    #[test]
    fn test_diagonal_slots_clip_to_bounds() {
        assert_eq!(diagonal_slots((4, 4), &[0]), 4);
        assert_eq!(diagonal_slots((4, 4), &[-3, 3]), 2);
        assert_eq!(diagonal_slots((2, 5), &[4]), 1);
        assert_eq!(diagonal_slots((2, 5), &[6]), 0);
    }

    #[test]
    fn test_dense_roundtrip() {
        let mat = create_test_matrix();
        let dense = mat.to_dense();
        let back = SparseMatrix::from_dense(&dense);
        assert_eq!(back.nnz(), mat.nnz());
        assert_eq!(back.values(), mat.values());
    }

    #[test]
    fn test_permute_symmetric() {
        let mat = SparseMatrix::from_triplets((3, 3), &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)]).unwrap();
        // new order: old 2, old 0, old 1
        let permuted = mat.permute_symmetric(&[2, 0, 1]).unwrap();
        assert_eq!(permuted.get(1, 1), 1.0);
        assert_eq!(permuted.get(1, 0), 2.0);
        assert_eq!(permuted.get(2, 2), 3.0);
        assert_eq!(permuted.nnz(), 3);
    }

    #[test]
    fn test_permute_rejects_repeated_index() {
        let mat = SparseMatrix::from_triplets((2, 2), &[(0, 0, 1.0)]).unwrap();
        assert!(mat.permute_symmetric(&[0, 0]).is_err());
    }

    #[test]
    fn test_matrix_market_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "%%MatrixMarket matrix coordinate real general").unwrap();
        writeln!(file, "3 3 4").unwrap();
        writeln!(file, "1 1 2.5").unwrap();
        writeln!(file, "2 2 1.0").unwrap();
        writeln!(file, "3 1 -4.0").unwrap();
        writeln!(file, "3 3 1.0").unwrap();
        file.flush().unwrap();

        let mat = SparseMatrix::from_matrix_market(file.path()).unwrap();
        assert_eq!(mat.shape(), (3, 3));
        assert_eq!(mat.nnz(), 4);
        assert_eq!(mat.get(2, 0), -4.0);
    }
}
