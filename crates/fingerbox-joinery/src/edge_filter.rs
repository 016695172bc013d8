//! Axis Edge Filter
//!
//! Candidate joint lines are the straight edges that run along one cardinal
//! axis: they vary along that axis and are constant along the other two.

use fingerbox_core::{Axis, DirectedEdge, Tolerance};

/// True when `edge` spans a non-zero extent along `axis` and none along the
/// other two axes.
pub fn runs_along(edge: &DirectedEdge, axis: Axis, tolerance: &Tolerance) -> bool {
    Axis::ALL.iter().all(|&a| {
        let i = a.index();
        let close = tolerance.approx_eq(edge.start[i], edge.end[i]);
        if a == axis {
            !close
        } else {
            close
        }
    })
}

/// Edges running along `axis`, in input order.
pub fn edges_along_axis(
    edges: &[DirectedEdge],
    axis: Axis,
    tolerance: &Tolerance,
) -> Vec<DirectedEdge> {
    edges
        .iter()
        .filter(|edge| runs_along(edge, axis, tolerance))
        .copied()
        .collect()
}
