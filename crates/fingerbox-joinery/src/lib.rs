//! # Fingerbox Joinery
//!
//! Builds slot-and-tab ("finger joint") box enclosures and discovers the
//! rigid joints that hold their panels together.
//!
//! ## Pipeline
//!
//! - **Tab Layout**: fits an odd number of equal tabs into a span
//! - **Panel Partitioner**: picks which sketch profiles of a panel become solid
//! - **Axis Edge Filter**: selects the body edges running along one axis
//! - **Edge Matcher**: pairs coincident edges of two panels into a joint spec
//! - **Box Assembler**: drives a geometry kernel through the whole build
//!
//! ## Geometry Kernel
//!
//! Solid modeling is delegated to a [`kernel::GeometryKernel`]. The
//! [`memory_kernel::InMemoryKernel`] implements it without a CAD host.

pub mod assembler;
pub mod edge_filter;
pub mod edge_matcher;
pub mod error;
pub mod kernel;
pub mod memory_kernel;
pub mod partition;
pub mod tab_layout;

pub use assembler::{AssembledBox, BoxAssembler, BoxDimensions, PlacedJoint};
pub use edge_filter::edges_along_axis;
pub use edge_matcher::{find_joint, JointSpec};
pub use error::{BoxError, BoxResult, KernelError, KernelResult};
pub use kernel::{
    BodyEdgeEnumerator, BodyId, ComponentId, ComponentTree, ExtrudeEngine, GeometryFrameProvider,
    GeometryKernel, JointEngine, JointHandle, OccurrenceId, PlanarProfile, SketchBuilder, SketchId,
};
pub use memory_kernel::{InMemoryKernel, JointRecord};
pub use partition::{
    select_solid_profiles, Alternation, PanelPartitioner, ProfileRole, RowDirection, TabRow,
};
pub use tab_layout::{compute_tab_layout, TabLayout, TabScale, TabSizing};
