//! Edge Matcher
//!
//! Two panels meeting along a joint line share the midpoint of their edges
//! on that line, even when the edges themselves differ in length. The first
//! coincident pair found (first-panel edges outer, second-panel edges inner)
//! becomes the joint.

use fingerbox_core::{DirectedEdge, Point3, Tolerance, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A rigid joint between the midpoints of two edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// Midpoint of the first edge, in its component's frame.
    pub anchor_a: Point3,
    /// Midpoint of the second edge, in its component's frame.
    pub anchor_b: Point3,
    /// The edges run in opposite directions.
    pub flipped: bool,
    /// Distance along `direction` from the second anchor to the first.
    pub offset: f64,
    /// Unit direction of the first edge.
    pub direction: Vector3,
}

/// Joint for the first pair of edges whose midpoints coincide, or `None`.
///
/// Pairs where either edge is too short to have a direction are skipped.
pub fn find_joint(
    edges_a: &[DirectedEdge],
    edges_b: &[DirectedEdge],
    offset: f64,
    tolerance: &Tolerance,
) -> Option<JointSpec> {
    for edge_a in edges_a {
        let mid_a = edge_a.midpoint();
        for edge_b in edges_b {
            let mid_b = edge_b.midpoint();
            if !tolerance.approx_eq_point3(&mid_a, &mid_b) {
                continue;
            }

            let (Some(dir_a), Some(dir_b)) = (
                edge_a.unit_direction(tolerance.absolute),
                edge_b.unit_direction(tolerance.absolute),
            ) else {
                debug!("Skipping degenerate edge pair at {:?}", mid_a);
                continue;
            };

            debug!("Matched edge A: {}", edge_a);
            debug!("Matched edge B: {}", edge_b);

            return Some(JointSpec {
                anchor_a: mid_a,
                anchor_b: mid_b,
                flipped: !tolerance.approx_eq(dir_a.dot(&dir_b), 1.0),
                offset,
                direction: dir_a,
            });
        }
    }

    None
}
