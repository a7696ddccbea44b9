//! The structural facts the storage estimators read from a matrix.

use super::sparse_matrix::{diagonal_offsets, diagonal_slots};
use super::SparseMatrix;
use sprs::CsMat;

/// Read-only view of the structure a storage size model needs.
///
/// Estimators borrow a view for the duration of one call and never mutate it,
/// so a single view can be shared across threads.
pub trait SparseMatrixView {
    /// Number of stored entries.
    fn nnz(&self) -> usize;

    /// Length of the row (or column) pointer array: outer dimension + 1.
    fn index_pointer_length(&self) -> usize;

    /// Stored values.
    fn values(&self) -> &[f64];

    /// Logical order of the matrix (number of rows).
    fn order(&self) -> usize;

    /// Distinct occupied diagonal offsets.
    fn diagonal_offsets(&self) -> Vec<isize>;

    /// Entries a diagonal-format copy would store, padding included.
    fn diagonal_stored_entries(&self) -> usize;
}

impl SparseMatrixView for SparseMatrix {
    fn nnz(&self) -> usize {
        SparseMatrix::nnz(self)
    }

    fn index_pointer_length(&self) -> usize {
        self.rows() + 1
    }

    fn values(&self) -> &[f64] {
        SparseMatrix::values(self)
    }

    fn order(&self) -> usize {
        self.rows()
    }

    fn diagonal_offsets(&self) -> Vec<isize> {
        SparseMatrix::diagonal_offsets(self)
    }

    fn diagonal_stored_entries(&self) -> usize {
        SparseMatrix::diagonal_stored_entries(self)
    }
}

impl SparseMatrixView for CsMat<f64> {
    fn nnz(&self) -> usize {
        CsMat::nnz(self)
    }

    fn index_pointer_length(&self) -> usize {
        self.outer_dims() + 1
    }

    fn values(&self) -> &[f64] {
        self.data()
    }

    fn order(&self) -> usize {
        self.rows()
    }

    fn diagonal_offsets(&self) -> Vec<isize> {
        diagonal_offsets(self)
    }

    fn diagonal_stored_entries(&self) -> usize {
        diagonal_slots(self.shape(), &diagonal_offsets(self))
    }
}
