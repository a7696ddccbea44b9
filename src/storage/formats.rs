//! Size models for the sparse storage formats.
//!
//! Every estimator is a pure function of the matrix structure. Byte counts are
//! estimates, not allocations, so fractional bytes are allowed where a model is
//! expressed in bits.

use super::dictionary::bounded_dictionary;
use crate::data::SparseMatrixView;
use crate::error::{Result, SparseGrindError};
use serde::{Deserialize, Serialize};

/// Full-precision value width in bits.
pub const BITS_PER_DOUBLE_DATA: u64 = 64;
/// Full-precision value width in bytes.
pub const BYTES_PER_DOUBLE_DATA: u64 = 8;
/// Width of one index or pointer entry in bytes.
pub const BYTES_PER_METADATA: u64 = 4;

/// Sign bit plus an IEEE double's 11 exponent bits.
pub const FLOAT_OVERHEAD_BITS: u32 = 12;
/// Explicit mantissa bits of an IEEE double.
pub const DEFAULT_MANTISSA_BITWIDTH: u32 = 52;
pub const DEFAULT_INDEX_BITWIDTH: u32 = 32;
pub const DEFAULT_FIXED_POINT_BITWIDTH: u32 = 16;
/// Decoding-table width used by the CSR + dictionary composite.
pub const DEFAULT_DICTIONARY_BITWIDTH: u32 = 10;

/// Storage footprint of one encoding.
///
/// Metadata and data are independent and sum to the total footprint. The
/// label records the bit-widths used, since one format name can stand for
/// many encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeEstimate {
    /// Bytes spent on indices, pointers and offsets.
    pub metadata_bytes: f64,
    /// Bytes spent on stored values.
    pub data_bytes: f64,
    /// Format name and configuration.
    pub label: String,
}

impl SizeEstimate {
    pub fn new(metadata_bytes: f64, data_bytes: f64, label: impl Into<String>) -> Self {
        Self {
            metadata_bytes,
            data_bytes,
            label: label.into(),
        }
    }

    /// Metadata plus data bytes.
    pub fn total_bytes(&self) -> f64 {
        self.metadata_bytes + self.data_bytes
    }
}

impl std::fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: metadata {:.1} B, data {:.1} B, total {:.1} B",
            self.label,
            self.metadata_bytes,
            self.data_bytes,
            self.total_bytes()
        )
    }
}

/// Coordinate format: a row and a column index plus a double per entry.
pub fn coo<M: SparseMatrixView + ?Sized>(matrix: &M) -> SizeEstimate {
    let nnz = matrix.nnz() as u64;
    SizeEstimate::new(
        (2 * nnz * BYTES_PER_METADATA) as f64,
        (nnz * BYTES_PER_DOUBLE_DATA) as f64,
        "COO",
    )
}

/// Compressed sparse column: pointer array plus one index and a double per entry.
pub fn csc<M: SparseMatrixView + ?Sized>(matrix: &M) -> SizeEstimate {
    let nnz = matrix.nnz() as u64;
    let pointers = matrix.index_pointer_length() as u64;
    SizeEstimate::new(
        ((pointers + nnz) * BYTES_PER_METADATA) as f64,
        (nnz * BYTES_PER_DOUBLE_DATA) as f64,
        "CSC",
    )
}

/// Compressed sparse row with custom index and value widths.
///
/// Values are modeled as floats with `mantissa_bitwidth` explicit mantissa
/// bits, one sign bit and an 11-bit exponent, so the exponent range of an IEEE
/// double is kept however many mantissa bits are dropped. At the defaults
/// (52, 32) this is standard double-precision CSR.
pub fn csr<M: SparseMatrixView + ?Sized>(
    matrix: &M,
    mantissa_bitwidth: u32,
    index_bitwidth: u32,
) -> Result<SizeEstimate> {
    validate_mantissa_bitwidth(mantissa_bitwidth)?;
    validate_index_bitwidth(index_bitwidth)?;

    let nnz = matrix.nnz() as u64;
    let bits_per_value = u64::from(mantissa_bitwidth + FLOAT_OVERHEAD_BITS);
    let metadata_bits = (matrix.index_pointer_length() as u64 + nnz) * u64::from(index_bitwidth);
    let data_bits = nnz * bits_per_value;

    Ok(SizeEstimate::new(
        metadata_bits as f64 / 8.0,
        data_bits as f64 / 8.0,
        format!(
            "CSR: {:2} bit data and {} bit index",
            bits_per_value, index_bitwidth
        ),
    ))
}

/// CSR with bucketed mixed-precision values.
///
/// Each of the `num_buckets` buckets stores one full double as its base value,
/// and every entry stores a `fixed_point_bitwidth`-bit correction against its
/// bucket. Index metadata scales with the matrix order `n` rather than the
/// pointer array.
pub fn csr_buckets(
    n: usize,
    nnz: usize,
    num_buckets: usize,
    fixed_point_bitwidth: u32,
    index_bitwidth: u32,
) -> Result<SizeEstimate> {
    validate_fixed_point_bitwidth(fixed_point_bitwidth)?;
    validate_index_bitwidth(index_bitwidth)?;

    let data_bits =
        num_buckets as u64 * BITS_PER_DOUBLE_DATA + nnz as u64 * u64::from(fixed_point_bitwidth);
    let metadata_bits = (n as u64 + nnz as u64) * u64::from(index_bitwidth);

    Ok(SizeEstimate::new(
        metadata_bits as f64 / 8.0,
        data_bits as f64 / 8.0,
        format!(
            "CSR: bucketing with {:2} correction terms and {} bit index",
            fixed_point_bitwidth, index_bitwidth
        ),
    ))
}

/// [`csr_buckets`] with `n` and `nnz` taken from a matrix.
pub fn csr_buckets_for<M: SparseMatrixView + ?Sized>(
    matrix: &M,
    num_buckets: usize,
    fixed_point_bitwidth: u32,
    index_bitwidth: u32,
) -> Result<SizeEstimate> {
    csr_buckets(
        matrix.order(),
        matrix.nnz(),
        num_buckets,
        fixed_point_bitwidth,
        index_bitwidth,
    )
}

/// Diagonal format: one offset per occupied diagonal, a double per diagonal slot.
///
/// Every slot of an occupied diagonal is stored, zeros included, so matrices
/// without banded structure are modeled at a large cost. Choosing DIA for
/// such matrices is up to the caller.
pub fn dia<M: SparseMatrixView + ?Sized>(matrix: &M) -> SizeEstimate {
    let offsets = matrix.diagonal_offsets().len() as u64;
    let stored = matrix.diagonal_stored_entries() as u64;
    SizeEstimate::new(
        (BYTES_PER_METADATA * offsets) as f64,
        (stored * BYTES_PER_DOUBLE_DATA) as f64,
        "DIA",
    )
}

/// CSR metadata with bounded-dictionary compressed values.
///
/// `dictionary_bitwidth` is the code width of the decoding table, which holds
/// `2^dictionary_bitwidth` values.
pub fn csr_bounded_dictionary<M: SparseMatrixView + ?Sized>(
    matrix: &M,
    dictionary_bitwidth: u32,
) -> Result<SizeEstimate> {
    let nnz = matrix.nnz() as u64;
    let values = bounded_dictionary(
        matrix.order(),
        matrix.values(),
        Some(dictionary_bitwidth),
        None,
    )?;

    Ok(SizeEstimate::new(
        ((matrix.index_pointer_length() as u64 + nnz) * BYTES_PER_METADATA) as f64,
        values.total_bytes as f64,
        "CSR_BD",
    ))
}

pub(crate) fn validate_index_bitwidth(bits: u32) -> Result<()> {
    if bits == 0 || bits > 64 {
        return Err(SparseGrindError::Configuration(format!(
            "Index bitwidth must be between 1 and 64, got {}",
            bits
        )));
    }
    Ok(())
}

pub(crate) fn validate_mantissa_bitwidth(bits: u32) -> Result<()> {
    if bits > DEFAULT_MANTISSA_BITWIDTH {
        return Err(SparseGrindError::Configuration(format!(
            "Mantissa bitwidth must be at most {}, got {}",
            DEFAULT_MANTISSA_BITWIDTH, bits
        )));
    }
    Ok(())
}

pub(crate) fn validate_fixed_point_bitwidth(bits: u32) -> Result<()> {
    if bits == 0 || bits > 64 {
        return Err(SparseGrindError::Configuration(format!(
            "Fixed-point bitwidth must be between 1 and 64, got {}",
            bits
        )));
    }
    Ok(())
}
