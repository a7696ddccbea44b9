//! Sparse matrix adapters and file loaders.

mod sparse_matrix;
mod timeline;
mod view;

pub use sparse_matrix::SparseMatrix;
pub use timeline::{MatrixTimeline, DEFAULT_MATRIX_SIZE};
pub use view::SparseMatrixView;
