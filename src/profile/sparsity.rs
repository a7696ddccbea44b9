//! Sparsity profiling for sparse matrices.

use crate::data::SparseMatrix;
use crate::error::{Result, SparseGrindError};
use serde::{Deserialize, Serialize};

/// Profile of the sparsity pattern of a matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparsityProfile {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Total number of entries (rows × cols).
    pub total_entries: usize,
    /// Number of stored entries.
    pub nonzero_entries: usize,
    /// Number of zero entries.
    pub zero_entries: usize,
    /// Overall sparsity (proportion of zeros).
    pub sparsity: f64,
    /// Sparsity per row.
    pub row_sparsity: Vec<f64>,
    /// Sparsity per column.
    pub col_sparsity: Vec<f64>,
    /// Mean sparsity across rows.
    pub mean_row_sparsity: f64,
    /// Mean sparsity across columns.
    pub mean_col_sparsity: f64,
    /// Median sparsity across rows.
    pub median_row_sparsity: f64,
    /// Median sparsity across columns.
    pub median_col_sparsity: f64,
    /// Rows without stored entries.
    pub empty_rows: usize,
    /// Columns without stored entries.
    pub empty_cols: usize,
    /// Largest `row - col` over stored entries.
    pub lower_bandwidth: usize,
    /// Largest `col - row` over stored entries.
    pub upper_bandwidth: usize,
    /// Diagonals holding at least one stored entry.
    pub occupied_diagonals: usize,
}

impl SparsityProfile {
    /// Check if the matrix is highly sparse (> 50% zeros).
    pub fn is_highly_sparse(&self) -> bool {
        self.sparsity > 0.5
    }

    /// Check if the matrix is ultra-sparse (> 90% zeros).
    pub fn is_ultra_sparse(&self) -> bool {
        self.sparsity > 0.9
    }

    /// Total bandwidth: lower + upper + 1 (0 for an empty pattern).
    pub fn bandwidth(&self) -> usize {
        if self.nonzero_entries == 0 {
            0
        } else {
            self.lower_bandwidth + self.upper_bandwidth + 1
        }
    }
}

impl std::fmt::Display for SparsityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sparsity Profile")?;
        writeln!(f, "  Shape:             {} x {}", self.rows, self.cols)?;
        writeln!(f, "  Total entries:     {}", self.total_entries)?;
        writeln!(f, "  Non-zero entries:  {}", self.nonzero_entries)?;
        writeln!(f, "  Zero entries:      {}", self.zero_entries)?;
        writeln!(f, "  Overall sparsity:  {:.2}%", self.sparsity * 100.0)?;
        writeln!(f, "  Mean row sparsity:      {:.2}%", self.mean_row_sparsity * 100.0)?;
        writeln!(f, "  Median row sparsity:    {:.2}%", self.median_row_sparsity * 100.0)?;
        writeln!(f, "  Mean column sparsity:   {:.2}%", self.mean_col_sparsity * 100.0)?;
        writeln!(f, "  Median column sparsity: {:.2}%", self.median_col_sparsity * 100.0)?;
        writeln!(f, "  Empty rows:    {}", self.empty_rows)?;
        writeln!(f, "  Empty columns: {}", self.empty_cols)?;
        writeln!(
            f,
            "  Bandwidth:     {} (lower {}, upper {})",
            self.bandwidth(),
            self.lower_bandwidth,
            self.upper_bandwidth
        )?;
        writeln!(f, "  Occupied diagonals: {}", self.occupied_diagonals)?;
        Ok(())
    }
}

/// Profile the sparsity pattern of a matrix.
///
/// Fails when `rows × cols` does not fit in a `usize`.
pub fn profile_sparsity(matrix: &SparseMatrix) -> Result<SparsityProfile> {
    let (rows, cols) = matrix.shape();
    let total_entries = rows.checked_mul(cols).ok_or_else(|| {
        SparseGrindError::DimensionOverflow(format!("{} x {} matrix", rows, cols))
    })?;
    let nonzero_entries = matrix.nnz();
    let zero_entries = total_entries - nonzero_entries.min(total_entries);
    let sparsity = ratio(zero_entries, total_entries);

    let row_nnz = matrix.row_nnz();
    let col_nnz = matrix.col_nnz();

    let row_sparsity: Vec<f64> = row_nnz
        .iter()
        .map(|&nnz| ratio(cols.saturating_sub(nnz), cols))
        .collect();
    let col_sparsity: Vec<f64> = col_nnz
        .iter()
        .map(|&nnz| ratio(rows.saturating_sub(nnz), rows))
        .collect();

    let mut lower_bandwidth = 0;
    let mut upper_bandwidth = 0;
    for (row, col, _) in matrix.entries() {
        if row > col {
            lower_bandwidth = lower_bandwidth.max(row - col);
        } else {
            upper_bandwidth = upper_bandwidth.max(col - row);
        }
    }

    Ok(SparsityProfile {
        rows,
        cols,
        total_entries,
        nonzero_entries,
        zero_entries,
        sparsity,
        mean_row_sparsity: mean(&row_sparsity),
        mean_col_sparsity: mean(&col_sparsity),
        median_row_sparsity: median(&row_sparsity),
        median_col_sparsity: median(&col_sparsity),
        empty_rows: row_nnz.iter().filter(|&&n| n == 0).count(),
        empty_cols: col_nnz.iter().filter(|&&n| n == 0).count(),
        row_sparsity,
        col_sparsity,
        lower_bandwidth,
        upper_bandwidth,
        occupied_diagonals: matrix.diagonal_offsets().len(),
    })
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_matrix() -> SparseMatrix {
        // 3 × 4, some zeros
        SparseMatrix::from_triplets(
            (3, 4),
            &[
                (0, 0, 10.0),
                (0, 1, 20.0),
                (0, 3, 5.0),
                (1, 0, 100.0),
                (1, 1, 200.0),
                (1, 2, 150.0),
                (1, 3, 175.0),
                (2, 0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_profile_sparsity() {
        let matrix = create_test_matrix();
        let profile = profile_sparsity(&matrix).unwrap();

        assert_eq!(profile.total_entries, 12);
        assert_eq!(profile.nonzero_entries, 8);
        assert_eq!(profile.zero_entries, 4);
        assert_relative_eq!(profile.sparsity, 4.0 / 12.0);
        assert!(!profile.is_highly_sparse());
    }

    #[test]
    fn test_row_sparsity() {
        let matrix = create_test_matrix();
        let profile = profile_sparsity(&matrix).unwrap();

        // Row 0: 3 stored, 1 zero → 25% sparse
        assert_relative_eq!(profile.row_sparsity[0], 0.25);
        // Row 1: fully dense
        assert_relative_eq!(profile.row_sparsity[1], 0.0);
        // Row 2: 1 stored, 3 zero → 75% sparse
        assert_relative_eq!(profile.row_sparsity[2], 0.75);
        assert_relative_eq!(profile.median_row_sparsity, 0.25);
    }

    #[test]
    fn test_bandwidth() {
        let matrix = create_test_matrix();
        let profile = profile_sparsity(&matrix).unwrap();

        assert_eq!(profile.lower_bandwidth, 2);
        assert_eq!(profile.upper_bandwidth, 3);
        assert_eq!(profile.bandwidth(), 6);
        assert_eq!(profile.occupied_diagonals, 6);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = SparseMatrix::from_triplets((3, 3), &[]).unwrap();
        let profile = profile_sparsity(&matrix).unwrap();
        assert_relative_eq!(profile.sparsity, 1.0);
        assert_eq!(profile.empty_rows, 3);
        assert_eq!(profile.empty_cols, 3);
        assert_eq!(profile.bandwidth(), 0);
        assert!(profile.is_ultra_sparse());
    }

    #[test]
    fn test_entry_count_overflow() {
        let matrix = SparseMatrix::from_triplets((4, usize::MAX / 2), &[]).unwrap();
        assert!(matches!(
            profile_sparsity(&matrix),
            Err(SparseGrindError::DimensionOverflow(_))
        ));
    }
}
