//! Bounded dictionary compression of a value stream.
//!
//! The `k` most frequent distinct values are replaced by fixed-width codes into
//! a decoding table. Every other value stays at full precision. Nothing is
//! discarded, so the model only re-encodes values and never loses precision.
//! `covered` measures how skewed the value distribution is.

use super::formats::{BYTES_PER_DOUBLE_DATA, BYTES_PER_METADATA};
use crate::error::{Result, SparseGrindError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Occurrence count of every distinct value in a stream.
///
/// Values are compared by bit pattern, except that `-0.0` counts as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<u64, usize>,
    total: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every value of the stream in one pass.
    pub fn from_values(values: &[f64]) -> Self {
        values.iter().copied().collect()
    }

    /// Record one occurrence of `value`.
    pub fn add(&mut self, value: f64) {
        *self.counts.entry(key(value)).or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of `value`.
    pub fn count(&self, value: f64) -> usize {
        self.counts.get(&key(value)).copied().unwrap_or(0)
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of values counted.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.counts.iter().map(|(&bits, &count)| (f64::from_bits(bits), count))
    }

    /// The `k` most frequent values, most frequent first.
    ///
    /// Ties are broken by ascending value so the order is deterministic.
    pub fn most_common(&self, k: usize) -> Vec<(f64, usize)> {
        let mut entries: Vec<(f64, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.total_cmp(&b.0)));
        entries.truncate(k);
        entries
    }

    /// Total occurrences of the `k` most frequent values.
    pub fn covered_by_top(&self, k: u64) -> usize {
        let mut counts: Vec<usize> = self.counts.values().copied().collect();
        if k as u128 >= counts.len() as u128 {
            return self.total;
        }
        let k = k as usize;
        if k == 0 {
            return 0;
        }
        counts.select_nth_unstable_by(k - 1, |a, b| b.cmp(a));
        counts[..k].iter().sum()
    }
}

impl FromIterator<f64> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut table = Self::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}

fn key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Smallest code width that addresses `distinct` values: `ceil(log2(distinct))`.
pub fn minimal_code_bits(distinct: usize) -> u32 {
    if distinct <= 1 {
        0
    } else {
        distinct.next_power_of_two().trailing_zeros()
    }
}

/// Size breakdown of a bounded dictionary encoding.
#[derive(Debug, Clone, Serialize)]
pub struct DictionaryEstimate<'a> {
    /// Number of values in the stream.
    pub nnz: usize,
    /// Distinct values in the stream.
    pub distinct: usize,
    /// Code width per dictionary-coded entry.
    pub bits_per_entry: u32,
    /// Dictionary capacity `2^bits_per_entry`; 0 when no dictionary is used.
    pub capacity: u64,
    /// Entries coded through the dictionary.
    pub covered: usize,
    /// Bytes for the codes of covered entries.
    pub compressed_entry_bytes: u64,
    /// Bytes for entries stored at full precision.
    pub uncompressed_entry_bytes: u64,
    /// Per-row bookkeeping charged when a dictionary is used.
    pub overhead_bytes: u64,
    /// Sum of the three parts.
    pub total_bytes: u64,
    #[serde(skip)]
    table: Cow<'a, FrequencyTable>,
}

impl DictionaryEstimate<'_> {
    /// The frequency table the estimate was computed from.
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Take the frequency table for reuse with another width.
    pub fn into_table(self) -> FrequencyTable {
        self.table.into_owned()
    }

    /// Fraction of entries coded through the dictionary.
    pub fn coverage(&self) -> f64 {
        if self.nnz == 0 {
            1.0
        } else {
            self.covered as f64 / self.nnz as f64
        }
    }

    /// True when every entry is dictionary-coded.
    pub fn covers_all(&self) -> bool {
        self.covered == self.nnz
    }
}

/// Estimate the size of `values` under bounded dictionary compression.
///
/// `n` is the matrix order, used for the per-row overhead. When
/// `decoding_table_bitwidth` is `None` the minimal lossless width
/// `ceil(log2(distinct))` is used. `Some(0)` is taken literally as a one-slot
/// table with 0-bit codes and never falls back to the derived width; only
/// `None` derives it. A precomputed `table` is reused instead of
/// recounting the stream; it must describe exactly `values`.
///
/// A stream without values uses no dictionary: zero bits, zero capacity, no
/// overhead.
pub fn bounded_dictionary<'a>(
    n: usize,
    values: &[f64],
    decoding_table_bitwidth: Option<u32>,
    table: Option<&'a FrequencyTable>,
) -> Result<DictionaryEstimate<'a>> {
    if let Some(bits) = decoding_table_bitwidth {
        validate_decoding_table_bitwidth(bits)?;
    }

    let table = match table {
        Some(table) => {
            if table.total() != values.len() {
                return Err(SparseGrindError::DimensionMismatch {
                    expected: values.len(),
                    actual: table.total(),
                });
            }
            Cow::Borrowed(table)
        }
        None => Cow::Owned(FrequencyTable::from_values(values)),
    };

    let nnz = values.len();
    let distinct = table.distinct();

    let (bits_per_entry, capacity) = if distinct == 0 {
        (0, 0)
    } else {
        let bits = decoding_table_bitwidth.unwrap_or_else(|| minimal_code_bits(distinct));
        (bits, 1u64.checked_shl(bits).unwrap_or(u64::MAX))
    };

    let covered = if capacity == 0 {
        nnz
    } else {
        table.covered_by_top(capacity)
    };

    let compressed_entry_bytes = (covered as u64 * u64::from(bits_per_entry)).div_ceil(8);
    let uncompressed_entry_bytes = (nnz - covered) as u64 * BYTES_PER_DOUBLE_DATA;
    let overhead_bytes = if capacity != 0 {
        n as u64 * BYTES_PER_METADATA
    } else {
        0
    };

    Ok(DictionaryEstimate {
        nnz,
        distinct,
        bits_per_entry,
        capacity,
        covered,
        compressed_entry_bytes,
        uncompressed_entry_bytes,
        overhead_bytes,
        total_bytes: compressed_entry_bytes + uncompressed_entry_bytes + overhead_bytes,
        table,
    })
}

/// One row of a dictionary-width sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionarySweepRow {
    pub bitwidth: u32,
    pub capacity: u64,
    pub covered: usize,
    pub coverage: f64,
    pub total_bytes: u64,
}

impl From<&DictionaryEstimate<'_>> for DictionarySweepRow {
    fn from(estimate: &DictionaryEstimate<'_>) -> Self {
        Self {
            bitwidth: estimate.bits_per_entry,
            capacity: estimate.capacity,
            covered: estimate.covered,
            coverage: estimate.coverage(),
            total_bytes: estimate.total_bytes,
        }
    }
}

/// Evaluate several decoding-table widths against one shared frequency table.
///
/// The table is built once and the widths are evaluated in parallel.
pub fn dictionary_sweep(
    n: usize,
    values: &[f64],
    widths: &[u32],
) -> Result<(FrequencyTable, Vec<DictionarySweepRow>)> {
    let table = FrequencyTable::from_values(values);
    let rows = widths
        .par_iter()
        .map(|&bits| {
            bounded_dictionary(n, values, Some(bits), Some(&table))
                .map(|estimate| DictionarySweepRow::from(&estimate))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((table, rows))
}

pub(crate) fn validate_decoding_table_bitwidth(bits: u32) -> Result<()> {
    if bits > 64 {
        return Err(SparseGrindError::Configuration(format!(
            "Decoding table bitwidth must be at most 64, got {}",
            bits
        )));
    }
    Ok(())
}
