//! Symmetric reorderings that reduce bandwidth.
//!
//! All orderings work on the symmetrized pattern `A + Aᵀ` of a square matrix
//! and return permutations as `perm[new] = old`.

mod cuthill_mckee;
mod metrics;

pub use cuthill_mckee::StartVertex;
pub use metrics::{bandwidth, envelope};

use crate::data::SparseMatrix;
use crate::error::Result;
use cuthill_mckee::{cuthill_mckee_order, symmetric_pattern};
use serde::{Deserialize, Serialize};

/// A permutation together with its effect on bandwidth and envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reordering {
    pub name: String,
    /// `permutation[new] = old`.
    pub permutation: Vec<usize>,
    pub bandwidth_before: usize,
    pub bandwidth_after: usize,
    pub profile_before: usize,
    pub profile_after: usize,
}

impl Reordering {
    fn evaluate(name: &str, matrix: &SparseMatrix, permutation: Vec<usize>) -> Self {
        let mut position = vec![0; permutation.len()];
        for (new_idx, &old_idx) in permutation.iter().enumerate() {
            position[old_idx] = new_idx;
        }

        Self {
            name: name.to_string(),
            bandwidth_before: bandwidth(matrix, None),
            bandwidth_after: bandwidth(matrix, Some(&position)),
            profile_before: envelope(matrix, None),
            profile_after: envelope(matrix, Some(&position)),
            permutation,
        }
    }

    /// The matrix with rows and columns permuted.
    pub fn apply(&self, matrix: &SparseMatrix) -> Result<SparseMatrix> {
        matrix.permute_symmetric(&self.permutation)
    }

    /// True when the ordering narrowed the band.
    pub fn improves_bandwidth(&self) -> bool {
        self.bandwidth_after < self.bandwidth_before
    }
}

impl std::fmt::Display for Reordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<18} bandwidth {:>6} -> {:<6} profile {:>8} -> {}",
            self.name,
            self.bandwidth_before,
            self.bandwidth_after,
            self.profile_before,
            self.profile_after
        )
    }
}

fn reorder(name: &str, matrix: &SparseMatrix, start: StartVertex, reverse: bool) -> Result<Reordering> {
    let pattern = symmetric_pattern(matrix)?;
    let permutation = cuthill_mckee_order(&pattern, start, reverse);
    let reordering = Reordering::evaluate(name, matrix, permutation);
    tracing::debug!(
        method = name,
        before = reordering.bandwidth_before,
        after = reordering.bandwidth_after,
        "Computed reordering"
    );
    Ok(reordering)
}

/// Cuthill–McKee, starting each component at its lowest-index vertex.
pub fn cuthill_mckee(matrix: &SparseMatrix) -> Result<Reordering> {
    reorder("CM", matrix, StartVertex::LowestIndex, false)
}

/// Reverse Cuthill–McKee from a pseudo-peripheral vertex.
pub fn reverse_cuthill_mckee(matrix: &SparseMatrix) -> Result<Reordering> {
    reorder("RCM", matrix, StartVertex::PseudoPeripheral, true)
}

/// Reverse Cuthill–McKee from a minimum-degree vertex.
pub fn rcm_min_degree(matrix: &SparseMatrix) -> Result<Reordering> {
    reorder("RCM (min degree)", matrix, StartVertex::MinimumDegree, true)
}

/// Run every ordering on `matrix`.
pub fn reorder_analysis(matrix: &SparseMatrix) -> Result<Vec<Reordering>> {
    Ok(vec![
        cuthill_mckee(matrix)?,
        reverse_cuthill_mckee(matrix)?,
        rcm_min_degree(matrix)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SparseGrindError;

    /// Tridiagonal pattern with its labels scattered by `shuffle`.
    fn shuffled_tridiagonal() -> SparseMatrix {
        let shuffle = [3, 7, 0, 5, 1, 6, 2, 4];
        let mut triplets = Vec::new();
        for i in 0..shuffle.len() {
            triplets.push((shuffle[i], shuffle[i], 4.0));
            if i + 1 < shuffle.len() {
                triplets.push((shuffle[i], shuffle[i + 1], -1.0));
                triplets.push((shuffle[i + 1], shuffle[i], -1.0));
            }
        }
        SparseMatrix::from_triplets((8, 8), &triplets).unwrap()
    }

    fn is_permutation(perm: &[usize]) -> bool {
        let mut sorted = perm.to_vec();
        sorted.sort_unstable();
        sorted.iter().enumerate().all(|(i, &v)| i == v)
    }

    #[test]
    fn test_orderings_are_permutations() {
        let matrix = shuffled_tridiagonal();
        for reordering in reorder_analysis(&matrix).unwrap() {
            assert_eq!(reordering.permutation.len(), 8);
            assert!(is_permutation(&reordering.permutation), "{}", reordering.name);
        }
    }

    #[test]
    fn test_rcm_recovers_band() {
        let matrix = shuffled_tridiagonal();
        let rcm = reverse_cuthill_mckee(&matrix).unwrap();
        assert!(rcm.bandwidth_before > 1);
        assert_eq!(rcm.bandwidth_after, 1);
        assert!(rcm.improves_bandwidth());

        let min_degree = rcm_min_degree(&matrix).unwrap();
        assert_eq!(min_degree.bandwidth_after, 1);
    }

    #[test]
    fn test_rcm_never_widens_banded_matrix() {
        let triplets: Vec<(usize, usize, f64)> = (0..6usize)
            .flat_map(|i| (i.saturating_sub(1)..(i + 2).min(6)).map(move |j| (i, j, 1.0)))
            .collect();
        let matrix = SparseMatrix::from_triplets((6, 6), &triplets).unwrap();
        let rcm = reverse_cuthill_mckee(&matrix).unwrap();
        assert!(rcm.bandwidth_after <= rcm.bandwidth_before);
    }

    #[test]
    fn test_apply_matches_reported_metrics() {
        let matrix = shuffled_tridiagonal();
        let rcm = reverse_cuthill_mckee(&matrix).unwrap();
        let permuted = rcm.apply(&matrix).unwrap();

        assert_eq!(permuted.nnz(), matrix.nnz());
        assert_eq!(bandwidth(&permuted, None), rcm.bandwidth_after);
        assert_eq!(envelope(&permuted, None), rcm.profile_after);
    }

    #[test]
    fn test_rectangular_matrix_is_rejected() {
        let matrix = SparseMatrix::from_triplets((3, 2), &[(0, 0, 1.0)]).unwrap();
        assert!(matches!(
            reorder_analysis(&matrix),
            Err(SparseGrindError::DimensionMismatch { .. })
        ));
    }
}
