//! Core geometry traits and types.

use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a geometry.
pub type GeometryId = String;

/// Allowed rotation angles for a piece, in radians.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationConstraint {
    /// No rotation allowed (fixed orientation).
    #[default]
    None,
    /// Discrete rotation angles in radians.
    Discrete(Vec<f64>),
}

impl RotationConstraint {
    /// Axis-aligned rotations only (0, 90, 180, 270 degrees).
    pub fn axis_aligned() -> Self {
        Self::steps(4)
    }

    /// `n` evenly spaced rotations over a full turn.
    pub fn steps(n: usize) -> Self {
        if n == 0 {
            return Self::None;
        }
        let step = std::f64::consts::TAU / n as f64;
        Self::Discrete((0..n).map(|i| i as f64 * step).collect())
    }

    /// Sweep `0, step, 2*step, ...` strictly below 360 degrees.
    ///
    /// A non-positive step means no rotation.
    pub fn every_deg(step_deg: f64) -> Self {
        if step_deg <= 0.0 || !step_deg.is_finite() {
            return Self::None;
        }
        let mut angles = Vec::new();
        let mut i = 0usize;
        loop {
            let deg = i as f64 * step_deg;
            if deg >= 360.0 - 1e-9 {
                break;
            }
            angles.push(deg.to_radians());
            i += 1;
        }
        Self::Discrete(angles)
    }

    /// Returns true if no rotation is allowed.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the allowed angles. [`RotationConstraint::None`] yields `[0.0]`.
    pub fn angles(&self) -> Vec<f64> {
        match self {
            Self::None => vec![0.0],
            Self::Discrete(angles) if angles.is_empty() => vec![0.0],
            Self::Discrete(angles) => angles.clone(),
        }
    }
}

/// Trait for shapes that can be nested.
pub trait Geometry: Clone + Send + Sync {
    /// Returns the unique identifier for this geometry.
    fn id(&self) -> &GeometryId;

    /// Returns the quantity of this geometry to place.
    fn quantity(&self) -> usize;

    /// Returns the area of this geometry.
    fn measure(&self) -> f64;

    /// Validates the geometry and returns an error if invalid.
    fn validate(&self) -> Result<()>;

    /// Returns the allowed rotations for this geometry.
    fn rotation_constraint(&self) -> &RotationConstraint;
}

/// Trait for the container geometries are nested into.
pub trait Boundary: Clone + Send + Sync {
    /// Returns the area of this boundary.
    fn measure(&self) -> f64;

    /// Validates the boundary and returns an error if invalid.
    fn validate(&self) -> Result<()>;

    /// Boundary-inclusive point containment.
    fn contains_point(&self, x: f64, y: f64) -> bool;
}
