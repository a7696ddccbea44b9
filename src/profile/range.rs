//! Value range and precision requirements of stored entries.

use crate::error::{Result, SparseGrindError};
use crate::storage::FrequencyTable;
use serde::{Deserialize, Serialize};

/// Absolute precisions reported by [`profile_range`].
pub const DEFAULT_PRECISIONS: [f64; 4] = [1e-3, 1e-6, 1e-9, 1e-12];

/// Bits needed to cover the value range at one absolute precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRequirement {
    pub precision: f64,
    pub bits: u32,
}

/// Range of stored values and the fixed-point width needed to represent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeProfile {
    /// Number of values profiled.
    pub n_values: usize,
    /// Number of distinct values.
    pub distinct_values: usize,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// Smallest non-zero magnitude, if any.
    pub min_abs_nonzero: Option<f64>,
    /// Required bits at each precision.
    pub requirements: Vec<PrecisionRequirement>,
}

impl std::fmt::Display for RangeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Range Profile")?;
        writeln!(f, "  Values:          {}", self.n_values)?;
        writeln!(f, "  Distinct values: {}", self.distinct_values)?;
        writeln!(f, "  Min value: {}", self.min)?;
        writeln!(f, "  Max value: {}", self.max)?;
        writeln!(f, "  Range:     {}", self.range)?;
        if let Some(v) = self.min_abs_nonzero {
            writeln!(f, "  Smallest non-zero magnitude: {}", v)?;
        }
        for req in &self.requirements {
            writeln!(
                f,
                "  {} bits to represent with {:e} precision",
                req.bits, req.precision
            )?;
        }
        Ok(())
    }
}

/// Profile the range of `values` at the default precisions.
pub fn profile_range(values: &[f64]) -> Result<RangeProfile> {
    profile_range_with_precisions(values, &DEFAULT_PRECISIONS)
}

/// Profile the range of `values`, reporting `ceil(log2(range / p))` bits for each precision `p`.
pub fn profile_range_with_precisions(values: &[f64], precisions: &[f64]) -> Result<RangeProfile> {
    if values.is_empty() {
        return Err(SparseGrindError::EmptyData(
            "No stored values to profile".to_string(),
        ));
    }
    if let Some(&p) = precisions.iter().find(|&&p| p <= 0.0 || !p.is_finite()) {
        return Err(SparseGrindError::Configuration(format!(
            "Precision must be positive and finite, got {}",
            p
        )));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let min_abs_nonzero = values
        .iter()
        .map(|v| v.abs())
        .filter(|&v| v > 0.0)
        .min_by(|a, b| a.total_cmp(b));

    let requirements = precisions
        .iter()
        .map(|&precision| PrecisionRequirement {
            precision,
            bits: bits_for_range(range, precision),
        })
        .collect();

    Ok(RangeProfile {
        n_values: values.len(),
        distinct_values: FrequencyTable::from_values(values).distinct(),
        min,
        max,
        range,
        min_abs_nonzero,
        requirements,
    })
}

fn bits_for_range(range: f64, precision: f64) -> u32 {
    if range.is_nan() || range <= 0.0 {
        return 0;
    }
    (range / precision).log2().ceil().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_profile_range() {
        let profile = profile_range(&[-1.0, 0.5, 3.0, 0.5]).unwrap();
        assert_eq!(profile.n_values, 4);
        assert_eq!(profile.distinct_values, 3);
        assert_relative_eq!(profile.min, -1.0);
        assert_relative_eq!(profile.max, 3.0);
        assert_relative_eq!(profile.range, 4.0);
        assert_eq!(profile.min_abs_nonzero, Some(0.5));

        // log2(4 / 1e-3) = 11.97
        assert_eq!(profile.requirements[0].bits, 12);
        // log2(4 / 1e-6) = 21.93
        assert_eq!(profile.requirements[1].bits, 22);
        assert_eq!(profile.requirements.len(), 4);
    }

    #[test]
    fn test_constant_values_need_no_bits() {
        let profile = profile_range(&[2.0, 2.0]).unwrap();
        assert_relative_eq!(profile.range, 0.0);
        assert!(profile.requirements.iter().all(|r| r.bits == 0));
    }

    #[test]
    fn test_range_below_precision() {
        let profile = profile_range_with_precisions(&[0.0, 1e-4], &[1e-3]).unwrap();
        assert_eq!(profile.requirements[0].bits, 0);
    }

    #[test]
    fn test_empty_values() {
        assert!(matches!(
            profile_range(&[]),
            Err(SparseGrindError::EmptyData(_))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_precision() {
        assert!(matches!(
            profile_range_with_precisions(&[1.0], &[0.0]),
            Err(SparseGrindError::Configuration(_))
        ));
    }
}
