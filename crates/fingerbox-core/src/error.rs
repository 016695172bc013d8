//! Error types for the core crate.

use thiserror::Error;

/// Errors raised while constructing core geometry values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An axis vector did not have exactly one positive component.
    #[error("Invalid axis ({x}, {y}, {z}): exactly one component must be positive and the rest zero")]
    InvalidAxis { x: f64, y: f64, z: f64 },

    /// A tolerance epsilon was negative or not finite.
    #[error("Invalid tolerance '{name}': {value}")]
    InvalidTolerance { name: String, value: f64 },
}

/// Result type alias for geometry construction.
pub type GeometryResult<T> = Result<T, GeometryError>;
