//! Change detection across a timeline of matrices.

use crate::error::{Result, SparseGrindError};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// A timestep whose matrix differs from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineChange {
    pub timestep: usize,
    /// Entries that differ from the previous matrix.
    pub changed_entries: usize,
}

/// Timesteps at which a matrix timeline changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeProfile {
    pub n_timepoints: usize,
    pub changes: Vec<TimelineChange>,
}

impl ChangeProfile {
    /// Indices of the changed timesteps, ascending.
    pub fn changed_timesteps(&self) -> Vec<usize> {
        self.changes.iter().map(|c| c.timestep).collect()
    }

    /// True when no timestep differs from its predecessor.
    pub fn is_static(&self) -> bool {
        self.changes.is_empty()
    }
}

impl std::fmt::Display for ChangeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Change Profile")?;
        writeln!(f, "  Timepoints: {}", self.n_timepoints)?;
        writeln!(f, "  Changes:    {}", self.changes.len())?;
        for change in &self.changes {
            writeln!(
                f,
                "    t={:<6} {} entries changed",
                change.timestep, change.changed_entries
            )?;
        }
        Ok(())
    }
}

/// Find the timesteps whose matrix differs from the one before it.
///
/// The first matrix is compared against an all-zero matrix, so it counts as a
/// change unless it is entirely zero. All matrices must share one shape.
pub fn detect_changes(timeline: &[DMatrix<f64>]) -> Result<ChangeProfile> {
    let Some(first) = timeline.first() else {
        return Ok(ChangeProfile::default());
    };
    let shape = first.shape();

    let mut changes = Vec::new();
    let mut previous: Option<&DMatrix<f64>> = None;

    for (timestep, matrix) in timeline.iter().enumerate() {
        if matrix.shape() != shape {
            return Err(SparseGrindError::DimensionMismatch {
                expected: shape.0 * shape.1,
                actual: matrix.nrows() * matrix.ncols(),
            });
        }

        let changed_entries = match previous {
            Some(prev) => matrix
                .iter()
                .zip(prev.iter())
                .filter(|(a, b)| a != b)
                .count(),
            None => matrix.iter().filter(|&&v| v != 0.0).count(),
        };
        if changed_entries > 0 {
            changes.push(TimelineChange {
                timestep,
                changed_entries,
            });
        }
        previous = Some(matrix);
    }

    Ok(ChangeProfile {
        n_timepoints: timeline.len(),
        changes,
    })
}
