//! Approximate floating point comparison
//!
//! Panel layout arithmetic and kernel geometry both accumulate rounding
//! error, so lengths, coordinates and direction products are never compared
//! with `==`. Every such comparison in Fingerbox goes through [`Tolerance`].

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{Point2, Point3};

/// Absolute and relative epsilons for "approximately equal".
///
/// Two values are equal when they are bit-identical, or their difference is
/// within `absolute`, or within `relative` times the larger magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance {
        absolute: 1e-9,
        relative: 1e-9,
    };

    /// Create a tolerance, rejecting negative or non-finite epsilons.
    pub fn new(absolute: f64, relative: f64) -> GeometryResult<Self> {
        let tolerance = Self { absolute, relative };
        tolerance.validate()?;
        Ok(tolerance)
    }

    pub fn validate(&self) -> GeometryResult<()> {
        for (name, value) in [("absolute", self.absolute), ("relative", self.relative)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::InvalidTolerance {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).abs();
        // NaN fails both comparisons
        diff <= self.absolute || diff <= self.relative * a.abs().max(b.abs())
    }

    pub fn approx_zero(&self, value: f64) -> bool {
        self.approx_eq(value, 0.0)
    }

    /// True when `value` is below `limit` or approximately equal to it.
    pub fn at_most(&self, value: f64, limit: f64) -> bool {
        value <= limit || self.approx_eq(value, limit)
    }

    pub fn approx_eq_point2(&self, a: &Point2, b: &Point2) -> bool {
        self.approx_eq(a.x, b.x) && self.approx_eq(a.y, b.y)
    }

    pub fn approx_eq_point3(&self, a: &Point3, b: &Point3) -> bool {
        self.approx_eq(a.x, b.x) && self.approx_eq(a.y, b.y) && self.approx_eq(a.z, b.z)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
