//! 2D piece templates.

use ignest_core::geometry::{Geometry, GeometryId, RotationConstraint};
use ignest_core::{Error, Result};

use crate::polygon::Polygon;

/// A polygonal piece shape to be nested, with its quantity and allowed angles.
#[derive(Debug, Clone)]
pub struct Geometry2D {
    /// Unique identifier.
    id: GeometryId,

    /// Outline of the piece.
    polygon: Polygon,

    /// Number of copies to place.
    quantity: usize,

    /// Rotation constraint.
    rotation_constraint: RotationConstraint,
}

impl Geometry2D {
    /// Creates a new 2D geometry with the given ID.
    pub fn new(id: impl Into<GeometryId>) -> Self {
        Self {
            id: id.into(),
            polygon: Polygon::default(),
            quantity: 1,
            rotation_constraint: RotationConstraint::None,
        }
    }

    /// Sets the polygon from a list of (x, y) vertices.
    pub fn with_polygon(mut self, vertices: Vec<(f64, f64)>) -> Self {
        self.polygon = Polygon::from_tuples(vertices);
        self
    }

    /// Sets the quantity to place.
    pub fn with_quantity(mut self, n: usize) -> Self {
        self.quantity = n;
        self
    }

    /// Sets the allowed rotation angles in degrees.
    pub fn with_rotations_deg(mut self, angles: Vec<f64>) -> Self {
        let radians: Vec<f64> = angles.into_iter().map(|a| a.to_radians()).collect();
        self.rotation_constraint = RotationConstraint::Discrete(radians);
        self
    }

    /// Sets the allowed rotation angles in radians.
    pub fn with_rotations(mut self, angles: Vec<f64>) -> Self {
        self.rotation_constraint = RotationConstraint::Discrete(angles);
        self
    }

    /// Sets the rotation constraint.
    pub fn with_rotation_constraint(mut self, constraint: RotationConstraint) -> Self {
        self.rotation_constraint = constraint;
        self
    }

    /// Creates a rectangular geometry.
    pub fn rectangle(id: impl Into<GeometryId>, width: f64, height: f64) -> Self {
        Self::new(id).with_polygon(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, height),
            (0.0, height),
        ])
    }

    /// Creates an L-shaped geometry.
    pub fn l_shape(
        id: impl Into<GeometryId>,
        width: f64,
        height: f64,
        notch_width: f64,
        notch_height: f64,
    ) -> Self {
        Self::new(id).with_polygon(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, notch_height),
            (notch_width, notch_height),
            (notch_width, height),
            (0.0, height),
        ])
    }

    /// Returns the outline.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Returns the allowed rotation angles in radians.
    pub fn rotations(&self) -> Vec<f64> {
        self.rotation_constraint.angles()
    }

    /// Returns a copy with `k` points inserted on every edge.
    pub fn super_sampled(&self, k: usize) -> Self {
        Self {
            polygon: self.polygon.super_sample(k),
            ..self.clone()
        }
    }
}

impl Geometry for Geometry2D {
    fn id(&self) -> &GeometryId {
        &self.id
    }

    fn quantity(&self) -> usize {
        self.quantity
    }

    fn measure(&self) -> f64 {
        self.polygon.area()
    }

    fn validate(&self) -> Result<()> {
        if self.polygon.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "piece '{}' must have at least 3 vertices",
                self.id
            )));
        }

        if !self.polygon.vertices().iter().all(|p| p.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "piece '{}' has non-finite coordinates",
                self.id
            )));
        }

        if self.polygon.area() <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "piece '{}' has zero area",
                self.id
            )));
        }

        if self.rotations().iter().any(|a| !a.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "piece '{}' has a non-finite rotation angle",
                self.id
            )));
        }

        Ok(())
    }

    fn rotation_constraint(&self) -> &RotationConstraint {
        &self.rotation_constraint
    }
}
