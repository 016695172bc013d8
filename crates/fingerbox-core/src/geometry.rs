//! Geometry value types
//!
//! Thin wrappers over `nalgebra` for the handful of shapes the box builder
//! works with: axis-aligned sketch rectangles, construction planes and the
//! directed edges of extruded panels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GeometryError;

pub type Point2 = nalgebra::Point2<f64>;
pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type RigidTransform = nalgebra::Isometry3<f64>;

/// A cardinal axis of the working frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(self) -> Vector3 {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Coordinate index (0 = x, 1 = y, 2 = z).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl TryFrom<Vector3> for Axis {
    type Error = GeometryError;

    fn try_from(v: Vector3) -> Result<Self, Self::Error> {
        let invalid = || GeometryError::InvalidAxis {
            x: v.x,
            y: v.y,
            z: v.z,
        };
        match (v.x, v.y, v.z) {
            (x, y, z) if x > 0.0 && y == 0.0 && z == 0.0 => Ok(Axis::X),
            (x, y, z) if x == 0.0 && y > 0.0 && z == 0.0 => Ok(Axis::Y),
            (x, y, z) if x == 0.0 && y == 0.0 && z > 0.0 => Ok(Axis::Z),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// An edge of a solid body, from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectedEdge {
    pub start: Point3,
    pub end: Point3,
}

impl DirectedEdge {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction, `end - start`.
    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> Point3 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Unit direction, or `None` when the edge is shorter than `min_length`.
    pub fn unit_direction(&self, min_length: f64) -> Option<Vector3> {
        self.direction().try_normalize(min_length)
    }

    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self::new(
            transform.transform_point(&self.start),
            transform.transform_point(&self.end),
        )
    }
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Start: X:{} Y:{} Z:{} End: X:{} Y:{} Z:{}",
            self.start.x, self.start.y, self.start.z, self.end.x, self.end.y, self.end.z
        )
    }
}

/// Axis-aligned rectangle in sketch (u, v) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    pub min: Point2,
    pub max: Point2,
}

impl Rect2 {
    /// Rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn centroid(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect2) -> Rect2 {
        Rect2 {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// The standard construction planes every component exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneName {
    Xy,
    Xz,
    Yz,
}

impl fmt::Display for PlaneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xy => write!(f, "XY"),
            Self::Xz => write!(f, "XZ"),
            Self::Yz => write!(f, "YZ"),
        }
    }
}

/// A plane with an in-plane (u, v) basis. Sketch points map to
/// `origin + u * p.x + v * p.y`; extrusion runs along `u x v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstructionPlane {
    pub name: PlaneName,
    pub origin: Point3,
    pub u: Vector3,
    pub v: Vector3,
}

impl ConstructionPlane {
    pub fn standard(name: PlaneName) -> Self {
        let (u, v) = match name {
            PlaneName::Xy => (Vector3::x(), Vector3::y()),
            PlaneName::Xz => (Vector3::x(), Vector3::z()),
            PlaneName::Yz => (Vector3::y(), Vector3::z()),
        };
        Self {
            name,
            origin: Point3::origin(),
            u,
            v,
        }
    }

    pub fn normal(&self) -> Vector3 {
        self.u.cross(&self.v)
    }

    pub fn to_world(&self, p: &Point2) -> Point3 {
        self.origin + self.u * p.x + self.v * p.y
    }
}
