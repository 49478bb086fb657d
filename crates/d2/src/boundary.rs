//! 2D plate (container) types.

use ignest_core::geometry::Boundary;
use ignest_core::transform::AABB2D;
use ignest_core::{Error, Result};

use crate::point::Point;
use crate::polygon::{point_in_rectangle, Polygon};

/// The plate pieces are nested into.
///
/// An axis-aligned rectangular plate is detected when the boundary is built and
/// keeps its extents for the constant-time containment test, even after the
/// outline is super-sampled.
#[derive(Debug, Clone)]
pub struct Boundary2D {
    /// Plate outline.
    polygon: Polygon,

    /// Extents of a rectangular plate.
    rectangle: Option<AABB2D>,
}

impl Boundary2D {
    /// Creates a new boundary from polygon vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        let polygon = Polygon::from_tuples(vertices);
        let rectangle = polygon
            .is_axis_aligned_rectangle()
            .then(|| polygon.bbox());
        if rectangle.is_some() {
            log::debug!("plate is an axis-aligned rectangle");
        }
        Self { polygon, rectangle }
    }

    /// Creates a rectangular boundary with its lower-left corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)])
    }

    /// Returns the outline.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Returns the exterior vertices.
    pub fn exterior(&self) -> Vec<(f64, f64)> {
        self.polygon.to_tuples()
    }

    /// Extents of the plate when it is an axis-aligned rectangle.
    pub fn rectangle_extents(&self) -> Option<AABB2D> {
        self.rectangle
    }

    /// Returns true for an axis-aligned rectangular plate.
    pub fn is_rectangle(&self) -> bool {
        self.rectangle.is_some()
    }

    /// Returns a copy with `k` points inserted on every edge. Rectangle
    /// detection is inherited from the raw outline.
    pub fn super_sampled(&self, k: usize) -> Self {
        Self {
            polygon: self.polygon.super_sample(k),
            rectangle: self.rectangle,
        }
    }

    /// Boundary-inclusive containment of a single point.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        match &self.rectangle {
            Some(rect) => point_in_rectangle(p, rect),
            None => self.polygon.point_inside(p, true),
        }
    }
}

impl Boundary for Boundary2D {
    fn measure(&self) -> f64 {
        self.polygon.area()
    }

    fn validate(&self) -> Result<()> {
        if self.polygon.len() < 3 {
            return Err(Error::InvalidBoundary(
                "plate must have at least 3 vertices".into(),
            ));
        }

        if !self.polygon.vertices().iter().all(|p| p.is_finite()) {
            return Err(Error::InvalidBoundary(
                "plate has non-finite coordinates".into(),
            ));
        }

        if self.polygon.area() <= 0.0 {
            return Err(Error::InvalidBoundary("plate has zero area".into()));
        }

        Ok(())
    }

    fn contains_point(&self, x: f64, y: f64) -> bool {
        self.contains(Point::new(x, y))
    }
}
