//! Overlap test for a candidate piece position.

use ignest_core::SearchStats;

use crate::boundary::Boundary2D;
use crate::layout::Layout;
use crate::polygon::{bounding_boxes_intersect, segments_intersect, Polygon};

/// Decides whether a candidate polygon can be fixed on the current layout.
///
/// Touching the plate boundary is allowed; touching another piece along an
/// edge or at a vertex is allowed; any interior overlap is not.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityOracle<'a> {
    plate: &'a Boundary2D,
    use_bounding_boxes: bool,
}

impl<'a> FeasibilityOracle<'a> {
    /// Creates an oracle for `plate`.
    pub fn new(plate: &'a Boundary2D, use_bounding_boxes: bool) -> Self {
        Self {
            plate,
            use_bounding_boxes,
        }
    }

    /// Runs the checks in order, stopping at the first violation:
    /// containment in the plate, then for every fixed piece a bounding-box
    /// prune, edge crossings, vertex containment both ways and exact
    /// duplication.
    pub fn is_feasible(&self, candidate: &Polygon, layout: &Layout, stats: &mut SearchStats) -> bool {
        stats.feasibility_tests += 1;

        if !candidate.vertices().iter().all(|&p| self.plate.contains(p)) {
            return false;
        }

        layout
            .pieces()
            .iter()
            .all(|fixed| !self.overlaps(candidate, &fixed.polygon, stats))
    }

    fn overlaps(&self, candidate: &Polygon, fixed: &Polygon, stats: &mut SearchStats) -> bool {
        if self.use_bounding_boxes {
            stats.bb_tests += 1;
            if !bounding_boxes_intersect(candidate, fixed) {
                stats.bb_tests_succeeded += 1;
                return false;
            }
        }

        for (a, b) in candidate.edges() {
            for (c, d) in fixed.edges() {
                if segments_intersect(a, b, c, d) {
                    return true;
                }
            }
        }

        if candidate.vertices().iter().any(|&p| fixed.point_inside(p, false)) {
            return true;
        }
        if fixed.vertices().iter().any(|&p| candidate.point_inside(p, false)) {
            return true;
        }

        candidate.same_outline(fixed)
    }
}
