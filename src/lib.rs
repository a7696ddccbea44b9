//! Storage-cost analysis for sparse matrices.
//!
//! Estimates how many bytes a matrix needs under common sparse layouts
//! (COO, CSC, CSR, DIA), under reduced-precision CSR variants, and under a
//! bounded dictionary that replaces the most frequent values with short codes.
//!
//! # Overview
//!
//! - **data**: Matrix loading (Matrix Market, Matlab timelines) and the
//!   [`SparseMatrixView`](data::SparseMatrixView) adapter used by every estimator
//! - **storage**: Format size models, dictionary compression and the storage report
//! - **profile**: Sparsity, value range and timeline change profiling
//! - **reorder**: Cuthill–McKee orderings and bandwidth metrics
//!
//! # Example
//!
//! ```no_run
//! use sparsegrind::prelude::*;
//!
//! let matrix = SparseMatrix::from_matrix_market("matrix.mtx").unwrap();
//! let report = StorageReport::build(&matrix, &StorageConfig::default()).unwrap();
//! println!("{}", report);
//! ```

pub mod data;
pub mod error;
pub mod profile;
pub mod reorder;
pub mod storage;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{MatrixTimeline, SparseMatrix, SparseMatrixView, DEFAULT_MATRIX_SIZE};
    pub use crate::error::{Result, SparseGrindError};
    pub use crate::profile::{
        detect_changes, profile_range, profile_sparsity, ChangeProfile, RangeProfile,
        SparsityProfile,
    };
    pub use crate::reorder::{
        cuthill_mckee, rcm_min_degree, reorder_analysis, reverse_cuthill_mckee, Reordering,
    };
    pub use crate::storage::{
        bounded_dictionary, coo, csc, csr, csr_bounded_dictionary, csr_buckets, csr_buckets_for,
        dia, dictionary_sweep, max_mantissa_within, DictionaryEstimate, FrequencyTable,
        SizeEstimate, StorageConfig, StorageReport,
    };
}
