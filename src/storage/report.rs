//! Storage report: every format estimate plus bit-width sweeps.

use super::dictionary::{dictionary_sweep, validate_decoding_table_bitwidth, DictionarySweepRow};
use super::formats::{
    coo, csc, csr, csr_bounded_dictionary, csr_buckets_for, dia, validate_fixed_point_bitwidth,
    validate_index_bitwidth, validate_mantissa_bitwidth, SizeEstimate, DEFAULT_DICTIONARY_BITWIDTH,
    DEFAULT_FIXED_POINT_BITWIDTH, DEFAULT_INDEX_BITWIDTH, DEFAULT_MANTISSA_BITWIDTH,
};
use crate::data::SparseMatrixView;
use crate::error::{Result, SparseGrindError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bit-width choices for a storage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit mantissa bits for the CSR estimate.
    #[serde(default = "default_mantissa_bitwidth")]
    pub mantissa_bitwidth: u32,

    /// Index width for CSR and bucketed CSR.
    #[serde(default = "default_index_bitwidth")]
    pub index_bitwidth: u32,

    /// Number of full-precision base values for bucketed CSR.
    #[serde(default = "default_num_buckets")]
    pub num_buckets: usize,

    /// Width of the per-entry correction term for bucketed CSR.
    #[serde(default = "default_fixed_point_bitwidth")]
    pub fixed_point_bitwidth: u32,

    /// Decoding-table width for CSR with dictionary compression.
    #[serde(default = "default_dictionary_bitwidth")]
    pub dictionary_bitwidth: u32,

    /// Mantissa widths to evaluate in the CSR sweep.
    #[serde(default = "default_mantissa_sweep")]
    pub mantissa_sweep: Vec<u32>,

    /// Decoding-table widths to evaluate in the dictionary sweep.
    #[serde(default = "default_dictionary_sweep")]
    pub dictionary_sweep: Vec<u32>,
}

fn default_mantissa_bitwidth() -> u32 {
    DEFAULT_MANTISSA_BITWIDTH
}

fn default_index_bitwidth() -> u32 {
    DEFAULT_INDEX_BITWIDTH
}

fn default_num_buckets() -> usize {
    16
}

fn default_fixed_point_bitwidth() -> u32 {
    DEFAULT_FIXED_POINT_BITWIDTH
}

fn default_dictionary_bitwidth() -> u32 {
    DEFAULT_DICTIONARY_BITWIDTH
}

fn default_mantissa_sweep() -> Vec<u32> {
    vec![52, 36, 23, 16, 10]
}

fn default_dictionary_sweep() -> Vec<u32> {
    vec![1, 2, 4, 8, 12, 16]
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mantissa_bitwidth: default_mantissa_bitwidth(),
            index_bitwidth: default_index_bitwidth(),
            num_buckets: default_num_buckets(),
            fixed_point_bitwidth: default_fixed_point_bitwidth(),
            dictionary_bitwidth: default_dictionary_bitwidth(),
            mantissa_sweep: default_mantissa_sweep(),
            dictionary_sweep: default_dictionary_sweep(),
        }
    }
}

impl StorageConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(SparseGrindError::from)
    }

    /// Reject widths the size models cannot represent.
    pub fn validate(&self) -> Result<()> {
        validate_mantissa_bitwidth(self.mantissa_bitwidth)?;
        validate_index_bitwidth(self.index_bitwidth)?;
        validate_fixed_point_bitwidth(self.fixed_point_bitwidth)?;
        validate_decoding_table_bitwidth(self.dictionary_bitwidth)?;
        for &bits in &self.mantissa_sweep {
            validate_mantissa_bitwidth(bits)?;
        }
        for &bits in &self.dictionary_sweep {
            validate_decoding_table_bitwidth(bits)?;
        }
        Ok(())
    }
}

/// CSR estimate at one mantissa width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MantissaSweepRow {
    pub mantissa_bitwidth: u32,
    pub estimate: SizeEstimate,
}

/// Storage cost of one matrix under every modeled encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageReport {
    /// Matrix order.
    pub order: usize,
    /// Stored entries.
    pub nnz: usize,
    /// Distinct stored values.
    pub distinct_values: usize,
    /// One estimate per format, in a fixed order.
    pub formats: Vec<SizeEstimate>,
    /// CSR at each configured mantissa width.
    pub mantissa_sweep: Vec<MantissaSweepRow>,
    /// Dictionary compression at each configured table width.
    pub dictionary_sweep: Vec<DictionarySweepRow>,
}

impl StorageReport {
    /// Run every estimator on `matrix` with the widths from `config`.
    pub fn build<M: SparseMatrixView + ?Sized>(
        matrix: &M,
        config: &StorageConfig,
    ) -> Result<Self> {
        config.validate()?;

        let formats = vec![
            coo(matrix),
            csc(matrix),
            csr(matrix, config.mantissa_bitwidth, config.index_bitwidth)?,
            csr_buckets_for(
                matrix,
                config.num_buckets,
                config.fixed_point_bitwidth,
                config.index_bitwidth,
            )?,
            dia(matrix),
            csr_bounded_dictionary(matrix, config.dictionary_bitwidth)?,
        ];

        let mantissa_sweep = config
            .mantissa_sweep
            .iter()
            .map(|&bits| {
                csr(matrix, bits, config.index_bitwidth).map(|estimate| MantissaSweepRow {
                    mantissa_bitwidth: bits,
                    estimate,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (table, dictionary_sweep) =
            dictionary_sweep(matrix.order(), matrix.values(), &config.dictionary_sweep)?;

        debug!(
            nnz = matrix.nnz(),
            distinct = table.distinct(),
            formats = formats.len(),
            "built storage report"
        );

        Ok(Self {
            order: matrix.order(),
            nnz: matrix.nnz(),
            distinct_values: table.distinct(),
            formats,
            mantissa_sweep,
            dictionary_sweep,
        })
    }

    /// The format with the smallest total footprint.
    pub fn smallest(&self) -> Option<&SizeEstimate> {
        self.formats
            .iter()
            .min_by(|a, b| a.total_bytes().total_cmp(&b.total_bytes()))
    }
}

impl std::fmt::Display for StorageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Storage Report")?;
        writeln!(f, "  Order:           {}", self.order)?;
        writeln!(f, "  Stored entries:  {}", self.nnz)?;
        writeln!(f, "  Distinct values: {}", self.distinct_values)?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<58} {:>14} {:>14} {:>14}",
            "Format", "Metadata (B)", "Data (B)", "Total (B)"
        )?;
        for estimate in &self.formats {
            writeln!(
                f,
                "  {:<58} {:>14.1} {:>14.1} {:>14.1}",
                estimate.label,
                estimate.metadata_bytes,
                estimate.data_bytes,
                estimate.total_bytes()
            )?;
        }
        if let Some(best) = self.smallest() {
            writeln!(f, "  Smallest: {}", best.label)?;
        }

        if !self.mantissa_sweep.is_empty() {
            writeln!(f)?;
            writeln!(f, "  CSR mantissa sweep")?;
            for row in &self.mantissa_sweep {
                writeln!(
                    f,
                    "    {:>2} mantissa bits: {:>14.1} B",
                    row.mantissa_bitwidth,
                    row.estimate.total_bytes()
                )?;
            }
        }

        if !self.dictionary_sweep.is_empty() {
            writeln!(f)?;
            writeln!(f, "  Bounded dictionary sweep")?;
            for row in &self.dictionary_sweep {
                writeln!(
                    f,
                    "    {:>2} bit codes: {:>12} covered ({:>6.2}%), {:>14} B",
                    row.bitwidth,
                    row.covered,
                    row.coverage * 100.0,
                    row.total_bytes
                )?;
            }
        }
        Ok(())
    }
}

/// Largest mantissa width whose CSR footprint fits in `budget_bytes`.
///
/// Returns `None` when even a mantissa-free encoding exceeds the budget.
pub fn max_mantissa_within<M: SparseMatrixView + ?Sized>(
    matrix: &M,
    index_bitwidth: u32,
    budget_bytes: f64,
) -> Result<Option<u32>> {
    for bits in (0..=DEFAULT_MANTISSA_BITWIDTH).rev() {
        if csr(matrix, bits, index_bitwidth)?.total_bytes() <= budget_bytes {
            return Ok(Some(bits));
        }
    }
    Ok(None)
}
