//! Storage-cost models for sparse matrix encodings.
//!
//! Each format estimator turns the structure of a [`SparseMatrixView`] into a
//! [`SizeEstimate`]. [`bounded_dictionary`] models value compression and is
//! layered on CSR by [`csr_bounded_dictionary`]. [`StorageReport`] runs all of
//! them with the widths from a [`StorageConfig`].
//!
//! [`SparseMatrixView`]: crate::data::SparseMatrixView

mod dictionary;
mod formats;
mod report;

pub use dictionary::{
    bounded_dictionary, dictionary_sweep, minimal_code_bits, DictionaryEstimate,
    DictionarySweepRow, FrequencyTable,
};
pub use formats::{
    coo, csc, csr, csr_bounded_dictionary, csr_buckets, csr_buckets_for, dia, SizeEstimate,
    BITS_PER_DOUBLE_DATA, BYTES_PER_DOUBLE_DATA, BYTES_PER_METADATA, DEFAULT_DICTIONARY_BITWIDTH,
    DEFAULT_FIXED_POINT_BITWIDTH, DEFAULT_INDEX_BITWIDTH, DEFAULT_MANTISSA_BITWIDTH,
    FLOAT_OVERHEAD_BITS,
};
pub use report::{max_mantissa_within, MantissaSweepRow, StorageConfig, StorageReport};
