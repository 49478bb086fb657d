//! Robust geometric predicates for numerical stability.
//!
//! Orientation signs come from Shewchuk's adaptive precision arithmetic (via
//! the `robust` crate), so the segment-crossing test used by the feasibility
//! oracle never flips sign on nearly collinear input.
//!
//! ## References
//!
//! - Shewchuk, J.R. (1997). "Adaptive Precision Floating-Point Arithmetic and
//!   Fast Robust Predicates for Computational Geometry"
//!
//! ## Example
//!
//! ```rust
//! use ignest_core::robust::{orient2d, Orientation};
//!
//! let a = (0.0, 0.0);
//! let b = (1.0, 0.0);
//! let c = (0.5, 1.0);
//!
//! assert_eq!(orient2d(a, b, c), Orientation::CounterClockwise);
//! ```

use robust::{orient2d as robust_orient2d, Coord};

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are arranged counter-clockwise (left turn).
    CounterClockwise,
    /// Points are arranged clockwise (right turn).
    Clockwise,
    /// Points are collinear (on the same line).
    Collinear,
}

impl Orientation {
    /// Returns true if the orientation is counter-clockwise.
    #[inline]
    pub fn is_ccw(self) -> bool {
        matches!(self, Orientation::CounterClockwise)
    }

    /// Returns true if the orientation is clockwise.
    #[inline]
    pub fn is_cw(self) -> bool {
        matches!(self, Orientation::Clockwise)
    }

    /// Returns true if the points are collinear.
    #[inline]
    pub fn is_collinear(self) -> bool {
        matches!(self, Orientation::Collinear)
    }
}

/// Determines the orientation of three 2D points.
///
/// - `CounterClockwise` if `pc` lies to the left of the directed line `pa -> pb`
/// - `Clockwise` if `pc` lies to the right
/// - `Collinear` if the three points are collinear
#[inline]
pub fn orient2d(pa: (f64, f64), pb: (f64, f64), pc: (f64, f64)) -> Orientation {
    let result = orient2d_raw(pa, pb, pc);

    if result > 0.0 {
        Orientation::CounterClockwise
    } else if result < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns the raw orientation determinant (twice the signed triangle area).
#[inline]
pub fn orient2d_raw(pa: (f64, f64), pb: (f64, f64), pc: (f64, f64)) -> f64 {
    robust_orient2d(
        Coord { x: pa.0, y: pa.1 },
        Coord { x: pb.0, y: pb.1 },
        Coord { x: pc.0, y: pc.1 },
    )
}

/// Crossing test for segments `AB` and `CD` as a pair of left-turn tests.
///
/// Each segment must split the endpoints of the other into one point strictly
/// left of its supporting line and one point that is not. Proper crossings
/// always qualify and collinear overlaps never do. When an endpoint of one
/// segment rests on the other, the pair crosses if the touching segment
/// reaches into the left side: for counter-clockwise outlines a contact from
/// inside counts, a contact from outside does not. The test is symmetric in
/// the two segments.
#[inline]
pub fn segments_cross(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64)) -> bool {
    orient2d(a, c, d).is_ccw() != orient2d(b, c, d).is_ccw()
        && orient2d(a, b, c).is_ccw() != orient2d(a, b, d).is_ccw()
}

/// Computes the signed area of a polygon with the shoelace formula.
///
/// Kahan summation keeps the result stable for polygons with many vertices far
/// from the origin. Positive for counter-clockwise winding.
pub fn signed_area_robust(polygon: &[(f64, f64)]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut c = 0.0; // Compensation for lost low-order bits

    for i in 0..n {
        let j = (i + 1) % n;
        let term = polygon[i].0 * polygon[j].1 - polygon[j].0 * polygon[i].1;

        let y = term - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }

    sum / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orient2d_basic() {
        assert_eq!(
            orient2d((0.0, 0.0), (1.0, 0.0), (0.5, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orient2d((0.0, 0.0), (1.0, 0.0), (0.5, -1.0)),
            Orientation::Clockwise
        );
    }

    #[test]
    fn test_orient2d_collinear() {
        assert_eq!(
            orient2d((0.0, 0.0), (1.0, 1.0), (2.0, 2.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_orient2d_near_collinear() {
        // Nearly collinear points where naive arithmetic can lose the sign
        let a = (0.5, 0.5);
        let b = (12.0, 12.0);
        let c = (24.0, 24.0 + 1e-12);
        assert!(orient2d(a, b, c).is_ccw());
    }

    #[test]
    fn test_segments_cross_proper() {
        assert!(segments_cross((0.0, 0.0), (2.0, 2.0), (0.0, 2.0), (2.0, 0.0)));
    }

    #[test]
    fn test_segments_cross_symmetric() {
        let cases = [
            ((0.0, 0.0), (2.0, 2.0), (0.0, 2.0), (2.0, 0.0)),
            ((0.0, 0.0), (1.0, 0.0), (0.5, 0.0), (0.5, 1.0)),
            ((0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 1.0)),
            ((0.0, 0.0), (1.0, 1.0), (3.0, 0.0), (0.0, 3.0)),
        ];
        for (a, b, c, d) in cases {
            assert_eq!(segments_cross(a, b, c, d), segments_cross(c, d, a, b));
        }
    }

    #[test]
    fn test_segments_sharing_endpoint() {
        assert!(!segments_cross((1.0, 0.0), (2.0, 0.0), (1.0, 0.0), (1.0, 1.0)));
        assert!(!segments_cross((0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (-1.0, 1.0)));
        assert!(!segments_cross((1.0, 1.0), (0.0, 0.0), (2.0, 0.0), (0.0, 0.0)));
        // Head to tail with a left turn
        assert!(segments_cross((0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0)));
        // Head to tail with a right turn
        assert!(!segments_cross((0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, -1.0)));
    }

    #[test]
    fn test_segments_t_contact_and_collinear() {
        // Endpoint resting on the other segment, reaching into its left side
        assert!(segments_cross((0.5, 0.0), (0.5, 1.0), (0.0, 0.0), (1.0, 0.0)));
        assert!(segments_cross((0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.5, 0.0)));
        // Same contact from the right side
        assert!(!segments_cross((0.5, 0.0), (0.5, -1.0), (0.0, 0.0), (1.0, 0.0)));
        // Hypotenuse ending on a horizontal edge from above
        assert!(segments_cross((1.0, 0.0), (0.0, 1.0), (0.0, 0.0), (2.0, 0.0)));
        // Collinear overlap
        assert!(!segments_cross((0.0, 0.0), (2.0, 0.0), (1.0, 0.0), (3.0, 0.0)));
        // Disjoint
        assert!(!segments_cross((0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (3.0, -1.0)));
    }

    #[test]
    fn test_signed_area_robust() {
        let ccw = [(0.0, 0.0), (2.0, 0.0), (2.0, 3.0), (0.0, 3.0)];
        let cw: Vec<(f64, f64)> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(signed_area_robust(&ccw), 6.0);
        assert_relative_eq!(signed_area_robust(&cw), -6.0);
        assert_relative_eq!(signed_area_robust(&ccw[..2]), 0.0);
    }
}
