//! Planar points with epsilon-tolerant equality.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coordinate tolerance used by point equality and vertex coincidence.
pub const EPS: f64 = 1e-9;

/// Returns true if `a` and `b` differ by less than [`EPS`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// A point (or vector) in the plane.
///
/// Equality is tolerant: two points are equal when both coordinates differ by
/// less than [`EPS`].
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    /// Rotates about the origin by `theta` radians.
    ///
    /// Sine and cosine values within 1e-15 of zero are snapped to zero so
    /// quarter turns map grid coordinates onto the grid exactly.
    #[inline]
    pub fn rotated(self, theta: f64) -> Self {
        let snap = |v: f64| if v.abs() < 1e-15 { 0.0 } else { v };
        let (sin, cos) = theta.sin_cos();
        let (sin, cos) = (snap(sin), snap(cos));
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Moves by the vector `d`.
    #[inline]
    pub fn translated(self, d: Point) -> Self {
        self + d
    }

    /// Cross product of `b - a` and `c - a` (positive for a left turn).
    #[inline]
    pub fn cross(a: Point, b: Point, c: Point) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn dist_squared(self, other: Point) -> f64 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }

    /// Euclidean distance.
    #[inline]
    pub fn dist(self, other: Point) -> f64 {
        self.dist_squared(other).sqrt()
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// As an `(x, y)` tuple.
    #[inline]
    pub fn to_tuple(self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, k: f64) -> Point {
        Point::new(self.x / k, self.y / k)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_tolerant_equality() {
        assert_eq!(Point::new(1.0, 2.0), Point::new(1.0 + 1e-10, 2.0 - 1e-10));
        assert_ne!(Point::new(1.0, 2.0), Point::new(1.0 + 1e-6, 2.0));
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let p = Point::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 1.0);
        let q = Point::new(2.0, 1.0).rotated(270f64.to_radians());
        assert_eq!((q.x, q.y), (1.0, -2.0));
        let r = Point::new(1.0, 0.0).rotated(std::f64::consts::FRAC_PI_4);
        assert_relative_eq!(r.x, r.y, epsilon = 1e-15);
    }

    #[test]
    fn test_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);
        assert_eq!(a + b, Point::new(4.0, 1.0));
        assert_eq!(a - b, Point::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert_eq!(b / 2.0, Point::new(1.5, -0.5));
        assert_eq!(-a, Point::new(-1.0, -2.0));
        assert_eq!(a.translated(b), a + b);
        assert_relative_eq!(Point::ORIGIN.dist(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_cross_sign() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(Point::cross(a, b, Point::new(0.0, 1.0)) > 0.0);
        assert!(Point::cross(a, b, Point::new(0.0, -1.0)) < 0.0);
        assert_relative_eq!(Point::cross(a, b, Point::new(2.0, 0.0)), 0.0);
    }
}
