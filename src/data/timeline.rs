//! Timelines of dense complex matrices exported from Matlab.

use super::SparseMatrix;
use crate::error::{Result, SparseGrindError};
use nalgebra::{Complex, DMatrix};
use std::path::Path;
use tracing::debug;

/// Matrix order used by the Matlab exports this reader was written for.
pub const DEFAULT_MATRIX_SIZE: usize = 68;

/// A sequence of dense complex matrices, with their real and imaginary parts.
#[derive(Debug, Clone)]
pub struct MatrixTimeline {
    complex: Vec<DMatrix<Complex<f64>>>,
    real: Vec<DMatrix<f64>>,
    imag: Vec<DMatrix<f64>>,
}

impl MatrixTimeline {
    /// Build a timeline from complex matrices.
    pub fn from_complex(complex: Vec<DMatrix<Complex<f64>>>) -> Self {
        let real = complex.iter().map(|m| m.map(|c| c.re)).collect();
        let imag = complex.iter().map(|m| m.map(|c| c.im)).collect();
        Self { complex, real, imag }
    }

    /// Read a timeline written by Matlab as comma-separated values.
    ///
    /// The file has `matrix_size` lines. Line `i` holds row `i` of every
    /// matrix, one matrix after another:
    ///
    /// ```text
    ///   (A)     (B)     (C)
    /// a11, a12, b11, b12, c11, c12
    /// a21, a22, b21, b22, c21, c22
    /// ```
    ///
    /// Values use Matlab's complex notation (`1.5+0.25i`). When `n_timepoints`
    /// is `None`, every matrix on the first line is read.
    pub fn from_matlab_csv<P: AsRef<Path>>(
        path: P,
        matrix_size: usize,
        n_timepoints: Option<usize>,
    ) -> Result<Self> {
        if matrix_size == 0 {
            return Err(SparseGrindError::Configuration(
                "Matrix size must be positive".to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let mut complex: Vec<DMatrix<Complex<f64>>> = Vec::new();
        let mut n_rows = 0;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // Matlab terminates lines with a trailing comma.
            let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
            if fields.is_empty() {
                continue;
            }
            if row >= matrix_size {
                return Err(SparseGrindError::DimensionMismatch {
                    expected: matrix_size,
                    actual: row + 1,
                });
            }

            if complex.is_empty() {
                let n = n_timepoints.unwrap_or(fields.len() / matrix_size);
                if n == 0 {
                    return Err(SparseGrindError::EmptyData(
                        "No complete matrix on the first line".to_string(),
                    ));
                }
                complex = vec![DMatrix::from_element(matrix_size, matrix_size, Complex::new(0.0, 0.0)); n];
            }

            let needed = complex.len() * matrix_size;
            if fields.len() < needed {
                return Err(SparseGrindError::DimensionMismatch {
                    expected: needed,
                    actual: fields.len(),
                });
            }

            for (t, matrix) in complex.iter_mut().enumerate() {
                for col in 0..matrix_size {
                    let idx = t * matrix_size + col;
                    matrix[(row, col)] = parse_complex(fields[idx], row, idx)?;
                }
            }
            n_rows = row + 1;
        }

        if complex.is_empty() {
            return Err(SparseGrindError::EmptyData("Empty timeline file".to_string()));
        }
        if n_rows != matrix_size {
            return Err(SparseGrindError::DimensionMismatch {
                expected: matrix_size,
                actual: n_rows,
            });
        }

        debug!(
            path = %path.as_ref().display(),
            timepoints = complex.len(),
            matrix_size,
            "loaded Matlab timeline"
        );
        Ok(Self::from_complex(complex))
    }

    /// Number of timepoints.
    pub fn len(&self) -> usize {
        self.complex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complex.is_empty()
    }

    pub fn complex(&self) -> &[DMatrix<Complex<f64>>] {
        &self.complex
    }

    /// Real parts, one matrix per timepoint.
    pub fn real(&self) -> &[DMatrix<f64>] {
        &self.real
    }

    /// Imaginary parts, one matrix per timepoint.
    pub fn imag(&self) -> &[DMatrix<f64>] {
        &self.imag
    }

    /// Sparse copy of the real part at `timestep`.
    pub fn sparse_real(&self, timestep: usize) -> Result<SparseMatrix> {
        self.real
            .get(timestep)
            .map(SparseMatrix::from_dense)
            .ok_or_else(|| {
                SparseGrindError::Configuration(format!(
                    "Timestep {} out of range (timeline has {} matrices)",
                    timestep,
                    self.len()
                ))
            })
    }
}

fn parse_complex(field: &str, row: usize, col: usize) -> Result<Complex<f64>> {
    field
        .parse::<Complex<f64>>()
        .map_err(|_| SparseGrindError::InvalidValue {
            value: field.to_string(),
            row,
            col,
        })
}
