//! # Fingerbox Core
//!
//! Core value types shared by the Fingerbox crates.
//! Provides the geometric vocabulary used to describe panels, edges and
//! construction planes, together with the single tolerance primitive every
//! floating point comparison goes through.

pub mod error;
pub mod geometry;
pub mod tolerance;

pub use error::{GeometryError, GeometryResult};
pub use geometry::{
    Axis, ConstructionPlane, DirectedEdge, PlaneName, Point2, Point3, Rect2, RigidTransform,
    Vector3,
};
pub use tolerance::Tolerance;
