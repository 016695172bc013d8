//! Error types for the joinery crate.
//!
//! [`KernelError`] is what a geometry kernel reports back through the
//! collaborator traits. [`BoxError`] is what the joinery algorithms and the
//! box assembler report to their callers, carrying enough context (panel,
//! axis, offset) to diagnose a failure without re-running the build.

use fingerbox_core::{Axis, GeometryError, Point2};
use thiserror::Error;

use crate::kernel::{OccurrenceId, SketchId};

/// Errors reported by a geometry kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The occurrence is not part of the component tree.
    #[error("Unknown occurrence: {0}")]
    UnknownOccurrence(OccurrenceId),

    /// The sketch does not exist.
    #[error("Unknown sketch: {0}")]
    UnknownSketch(SketchId),

    /// Geometry handed to the kernel cannot be built.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A profile no longer matches the regions of its sketch.
    #[error("Profile {index} of sketch {sketch} centred at ({}, {}) is stale", .centroid.x, .centroid.y)]
    StaleProfile {
        sketch: SketchId,
        index: usize,
        centroid: Point2,
    },

    /// The kernel refused to create a joint.
    #[error("Joint rejected: {0}")]
    JointRejected(String),
}

/// Errors that can occur while laying out, partitioning and joining panels.
#[derive(Error, Debug)]
pub enum BoxError {
    /// A span or maximum tab size is not a finite positive number.
    #[error("Invalid dimension '{name}': {value} (must be finite and greater than zero)")]
    InvalidDimension { name: String, value: f64 },

    /// A tab-row profile does not sit on any expected tab position.
    #[error("Partition mismatch on panel '{panel}': tab-row profile centred at ({u}, {v}) matches no tab")]
    PartitionMismatch { panel: String, u: f64, v: f64 },

    /// No pair of edges along the axis shares a midpoint.
    #[error("No coincident {axis} edges between '{first}' and '{second}' (offset {offset})")]
    JointNotFound {
        first: String,
        second: String,
        axis: Axis,
        offset: f64,
    },

    /// The kernel rejected a joint built from coincident edges.
    #[error("Joint between '{first}' and '{second}' along {axis} (offset {offset}) failed: {source}")]
    JointCreation {
        first: String,
        second: String,
        axis: Axis,
        offset: f64,
        #[source]
        source: KernelError,
    },

    /// Any other kernel failure; fatal to the assembly.
    #[error("Geometry kernel failed while {context}: {source}")]
    Kernel {
        context: String,
        #[source]
        source: KernelError,
    },

    /// Invalid core geometry value.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

impl BoxError {
    pub(crate) fn invalid_dimension(name: &str, value: f64) -> Self {
        Self::InvalidDimension {
            name: name.to_string(),
            value,
        }
    }

    pub(crate) fn kernel(context: impl Into<String>) -> impl FnOnce(KernelError) -> Self {
        let context = context.into();
        move |source| Self::Kernel { context, source }
    }

    /// True for failures the assembler downgrades to a warning.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::JointNotFound { .. })
    }
}

/// Result type alias for joinery operations.
pub type BoxResult<T> = Result<T, BoxError>;

/// Result type alias for kernel calls.
pub type KernelResult<T> = Result<T, KernelError>;
