//! Geometry kernel collaborators
//!
//! The joinery core never models solids itself. It decides which sketch
//! regions to extrude and which edges to join, and hands those decisions to
//! a kernel through the traits below. A CAD host binding implements them
//! against its own document model; [`crate::memory_kernel::InMemoryKernel`]
//! implements them in plain Rust.
//!
//! Kernels are driven through `&mut self`, one call at a time.

use fingerbox_core::{ConstructionPlane, DirectedEdge, PlaneName, Point2, RigidTransform};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::edge_matcher::JointSpec;
use crate::error::KernelResult;

/// A component definition (the geometry shared by its occurrences).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub Uuid);

/// A placed instance of a component in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccurrenceId(pub Uuid);

/// A joint created by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointHandle(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SketchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl ComponentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl OccurrenceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OccurrenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl JointHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JointHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component-{}", self.0)
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "occurrence-{}", self.0)
    }
}

impl fmt::Display for JointHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joint-{}", self.0)
    }
}

impl fmt::Display for SketchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sketch-{}", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body-{}", self.0)
    }
}

/// A closed region of a sketch, candidate for extrusion.
///
/// `index` is the region's position in the sketch's profile list at the time
/// it was enumerated; `centroid` is in sketch (u, v) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarProfile {
    pub sketch: SketchId,
    pub index: usize,
    pub centroid: Point2,
    pub area: f64,
}

impl PlanarProfile {
    pub fn new(sketch: SketchId, index: usize, centroid: Point2, area: f64) -> Self {
        Self {
            sketch,
            index,
            centroid,
            area,
        }
    }
}

/// Hierarchical container of named components and their placements.
pub trait ComponentTree {
    /// Create a new named component with one occurrence under `parent`,
    /// placed with the identity transform.
    fn add_component(&mut self, parent: OccurrenceId, name: &str) -> KernelResult<OccurrenceId>;

    /// Place another occurrence of `source`'s component under `parent`.
    fn add_instance(
        &mut self,
        parent: OccurrenceId,
        source: OccurrenceId,
        transform: RigidTransform,
    ) -> KernelResult<OccurrenceId>;

    fn component_name(&self, occurrence: OccurrenceId) -> KernelResult<String>;
}

/// Named construction planes of a component.
pub trait GeometryFrameProvider {
    fn construction_plane(
        &self,
        occurrence: OccurrenceId,
        name: PlaneName,
    ) -> KernelResult<ConstructionPlane>;
}

/// Sketches of axis-aligned rectangles and the regions they enclose.
pub trait SketchBuilder {
    fn create_sketch(
        &mut self,
        occurrence: OccurrenceId,
        plane: &ConstructionPlane,
    ) -> KernelResult<SketchId>;

    /// Draw a two-point rectangle. The returned profile describes the
    /// rectangle as drawn; once it overlaps other curves, [`Self::profiles`]
    /// is authoritative.
    fn add_rectangle(
        &mut self,
        sketch: SketchId,
        origin: Point2,
        corner: Point2,
    ) -> KernelResult<PlanarProfile>;

    fn profiles(&self, sketch: SketchId) -> KernelResult<Vec<PlanarProfile>>;
}

pub trait ExtrudeEngine {
    /// Extrude profiles of one sketch along its plane normal into a new body.
    fn extrude(&mut self, profiles: &[PlanarProfile], depth: f64) -> KernelResult<BodyId>;
}

pub trait BodyEdgeEnumerator {
    /// Edges of every body of the occurrence's component, in the component's
    /// definition frame (shared by all its occurrences).
    fn edges(&self, occurrence: OccurrenceId) -> KernelResult<Vec<DirectedEdge>>;
}

pub trait JointEngine {
    fn create_rigid_joint(
        &mut self,
        first: OccurrenceId,
        second: OccurrenceId,
        spec: &JointSpec,
    ) -> KernelResult<JointHandle>;
}

/// Everything the box assembler needs from a kernel.
pub trait GeometryKernel:
    ComponentTree + GeometryFrameProvider + SketchBuilder + ExtrudeEngine + BodyEdgeEnumerator + JointEngine
{
}

impl<T> GeometryKernel for T where
    T: ComponentTree
        + GeometryFrameProvider
        + SketchBuilder
        + ExtrudeEngine
        + BodyEdgeEnumerator
        + JointEngine
{
}
