//! Cuthill–McKee orderings over the symmetrized pattern of a square matrix.

use crate::data::SparseMatrix;
use crate::error::{Result, SparseGrindError};
use sprs::linalg::ordering::{cuthill_mckee_custom, order, start};
use sprs::{CsMat, CsMatView};

/// How the traversal picks the first vertex of each connected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartVertex {
    /// Lowest-index unvisited vertex.
    LowestIndex,
    /// Unvisited vertex of minimum degree.
    MinimumDegree,
    /// Pseudo-peripheral vertex (George–Liu).
    PseudoPeripheral,
}

/// Structure of `A + Aᵀ` with every stored entry set to one.
///
/// Values are replaced before the sum so entries with `a_ij = -a_ji` keep
/// their place in the pattern.
pub(crate) fn symmetric_pattern(matrix: &SparseMatrix) -> Result<CsMat<f64>> {
    if !matrix.is_square() {
        return Err(SparseGrindError::DimensionMismatch {
            expected: matrix.rows(),
            actual: matrix.cols(),
        });
    }
    let pattern = matrix.data().map(|_| 1.0);
    Ok(&pattern + &pattern.transpose_view())
}

/// Cuthill–McKee ordering of a symmetric pattern as `perm[new] = old`.
pub(crate) fn cuthill_mckee_order(
    pattern: &CsMat<f64>,
    start_vertex: StartVertex,
    reverse: bool,
) -> Vec<usize> {
    let view = pattern.view();
    match start_vertex {
        StartVertex::LowestIndex => run(view, start::Next(), reverse),
        StartVertex::MinimumDegree => run(view, start::MinimumDegree(), reverse),
        StartVertex::PseudoPeripheral => run(view, start::PseudoPeripheral::new(), reverse),
    }
}

fn run<S>(view: CsMatView<'_, f64>, strategy: S, reverse: bool) -> Vec<usize>
where
    S: start::Strategy<f64, usize, usize>,
{
    let ordering = if reverse {
        cuthill_mckee_custom(view, strategy, order::Reversed::new())
    } else {
        cuthill_mckee_custom(view, strategy, order::Forward::new())
    };
    ordering.perm.vec()
}
