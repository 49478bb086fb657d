//! Polygon kernel: area, centroid, point containment, bounding boxes, segment
//! crossing and convex hulls.
//!
//! Derived attributes are cached on first access. Transforms return a new
//! polygon whose caches are carried over analytically where possible
//! (area is rigid-motion invariant, the centroid moves with the vertices)
//! and dropped otherwise.

use std::cmp::Ordering;
use std::sync::OnceLock;

use ignest_core::robust::{orient2d, segments_cross, signed_area_robust};
use ignest_core::AABB2D;

use crate::point::{approx_eq, Point, EPS};

/// A simple closed polygon. Edge `i` runs from vertex `i` to vertex `i + 1 mod n`.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    vertices: Vec<Point>,
    area: OnceLock<f64>,
    centroid: OnceLock<Point>,
    bbox: OnceLock<AABB2D>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    /// Creates a polygon from `(x, y)` pairs.
    pub fn from_tuples<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(points.into_iter().map(Point::from).collect())
    }

    /// The vertex sequence.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Boundary edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Vertices as `(x, y)` pairs.
    pub fn to_tuples(&self) -> Vec<(f64, f64)> {
        self.vertices.iter().map(|p| p.to_tuple()).collect()
    }

    /// Signed shoelace area, positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        signed_area_robust(&self.to_tuples())
    }

    /// Returns the outline wound counter-clockwise, reversing it if needed.
    pub fn counter_clockwise(&self) -> Self {
        if self.signed_area() < 0.0 {
            Self::new(self.vertices.iter().rev().copied().collect())
        } else {
            self.clone()
        }
    }

    /// Unsigned area. Zero for fewer than 3 vertices.
    pub fn area(&self) -> f64 {
        *self.area.get_or_init(|| self.signed_area().abs())
    }

    /// Arithmetic mean of the vertices, `None` for an empty polygon.
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        Some(*self.centroid.get_or_init(|| {
            let mut sum = Point::ORIGIN;
            for &p in &self.vertices {
                sum += p;
            }
            sum / self.vertices.len() as f64
        }))
    }

    /// Axis-aligned bounding box.
    pub fn bbox(&self) -> AABB2D {
        *self
            .bbox
            .get_or_init(|| AABB2D::from_points(self.vertices.iter().map(|p| p.to_tuple())))
    }

    /// Even-odd ray-casting containment test.
    ///
    /// A query point coinciding with a vertex returns exactly
    /// `consider_boundary`. Other boundary points follow the ray-casting rule:
    /// points on a left or bottom edge are outside, points on a right or top
    /// edge are inside.
    pub fn point_inside(&self, p: Point, consider_boundary: bool) -> bool {
        let n = self.vertices.len();
        if n == 0 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.vertices[i];
            let pj = self.vertices[j];
            if pi == p {
                return consider_boundary;
            }
            let straddles = (pi.y < p.y && pj.y >= p.y) || (pj.y < p.y && pi.y >= p.y);
            if straddles && (pi.x <= p.x || pj.x <= p.x) {
                let x_at = pi.x + (p.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
                if x_at < p.x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Returns the polygon moved by `d`.
    pub fn translated(&self, d: Point) -> Self {
        let moved = Self::new(self.vertices.iter().map(|&p| p.translated(d)).collect());
        if let Some(&area) = self.area.get() {
            let _ = moved.area.set(area);
        }
        if let Some(&c) = self.centroid.get() {
            let _ = moved.centroid.set(c.translated(d));
        }
        if let Some(bbox) = self.bbox.get() {
            let _ = moved.bbox.set(bbox.translated(d.x, d.y));
        }
        moved
    }

    /// Returns the polygon rotated about the origin by `theta` radians.
    pub fn rotated(&self, theta: f64) -> Self {
        let turned = Self::new(self.vertices.iter().map(|&p| p.rotated(theta)).collect());
        if let Some(&area) = self.area.get() {
            let _ = turned.area.set(area);
        }
        if let Some(&c) = self.centroid.get() {
            let _ = turned.centroid.set(c.rotated(theta));
        }
        turned
    }

    /// Inserts `k` evenly spaced points on every edge.
    pub fn super_sample(&self, k: usize) -> Self {
        if k == 0 {
            return self.clone();
        }
        let mut vertices = Vec::with_capacity(self.vertices.len() * (k + 1));
        for (a, b) in self.edges() {
            vertices.push(a);
            let step = (b - a) / (k + 1) as f64;
            for s in 1..=k {
                vertices.push(a + step * s as f64);
            }
        }
        Self::new(vertices)
    }

    /// Returns true for a 4-vertex polygon whose edges are all horizontal or vertical.
    pub fn is_axis_aligned_rectangle(&self) -> bool {
        if self.vertices.len() != 4 || self.area() <= 0.0 {
            return false;
        }
        self.edges()
            .all(|(a, b)| approx_eq(a.x, b.x) || approx_eq(a.y, b.y))
    }

    /// Returns true if both polygons trace the same vertex cycle, starting
    /// anywhere and in either direction.
    pub fn same_outline(&self, other: &Polygon) -> bool {
        let n = self.vertices.len();
        if n != other.vertices.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let first = self.vertices[0];
        (0..n)
            .filter(|&s| other.vertices[s] == first)
            .any(|s| {
                let forward = (0..n).all(|i| self.vertices[i] == other.vertices[(s + i) % n]);
                let backward =
                    (0..n).all(|i| self.vertices[i] == other.vertices[(s + n - i) % n]);
                forward || backward
            })
    }
}

impl PartialEq for Polygon {
    /// Vertex-for-vertex equality in order.
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::from_tuples(points)
    }
}

/// Closed overlap test on the cached bounding boxes. Never a false negative.
#[inline]
pub fn bounding_boxes_intersect(a: &Polygon, b: &Polygon) -> bool {
    a.bbox().intersects(&b.bbox())
}

/// Boundary-inclusive containment in an axis-aligned rectangle, with an
/// `EPS` margin for translation round-off.
#[inline]
pub fn point_in_rectangle(p: Point, rect: &AABB2D) -> bool {
    p.x >= rect.min_x - EPS
        && p.x <= rect.max_x + EPS
        && p.y >= rect.min_y - EPS
        && p.y <= rect.max_y + EPS
}

/// Crossing of segments `AB` and `CD`. Collinear contact and contact from the
/// right-hand side are not crossings.
#[inline]
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    segments_cross(a.to_tuple(), b.to_tuple(), c.to_tuple(), d.to_tuple())
}

fn lexicographic(a: &Point, b: &Point) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Convex hull by Andrew's monotone chain, counter-clockwise.
///
/// Collinear points on the hull boundary are dropped. Fewer than three
/// distinct points come back as they are, deduplicated.
pub fn convex_hull(mut points: Vec<Point>) -> Polygon {
    points.sort_by(lexicographic);
    points.dedup();
    let n = points.len();
    if n < 3 {
        return Polygon::new(points);
    }

    let turns_left = |a: Point, b: Point, c: Point| orient2d(a.to_tuple(), b.to_tuple(), c.to_tuple()).is_ccw();

    let mut hull: Vec<Point> = Vec::with_capacity(2 * n);
    for &p in &points {
        while hull.len() >= 2 && !turns_left(hull[hull.len() - 2], hull[hull.len() - 1], p) {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && !turns_left(hull[hull.len() - 2], hull[hull.len() - 1], p)
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    if hull.len() > 1 && hull.first() == hull.last() {
        hull.pop();
    }
    Polygon::new(hull)
}
