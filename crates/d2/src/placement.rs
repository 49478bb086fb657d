//! Candidate placements and the vertex-to-vertex placement search.

use ignest_core::{Deadline, SearchStats};

use crate::boundary::Boundary2D;
use crate::feasibility::FeasibilityOracle;
use crate::layout::{Layout, NodeId, PLATE_NODE};
use crate::objective::Objective;
use crate::polygon::Polygon;

/// A candidate decision for one floating piece.
#[derive(Debug, Clone)]
pub struct PiecePlacement {
    /// Transformed outline.
    pub polygon: Polygon,
    /// Index into the floating list, `None` for the "no placement" sentinel.
    pub floating_index: Option<usize>,
    /// Objective score, `+inf` for the sentinel.
    pub value: f64,
    /// Rotation applied to the piece, in radians.
    pub angle: f64,
    /// Piece vertex that was aligned.
    pub piece_vertex: usize,
    /// Node the piece was aligned against (the plate is [`PLATE_NODE`]).
    pub anchor: NodeId,
    /// Vertex of the anchor that was matched.
    pub anchor_vertex: usize,
}

impl PiecePlacement {
    /// The "no placement" sentinel.
    pub fn none() -> Self {
        Self {
            polygon: Polygon::default(),
            floating_index: None,
            value: f64::INFINITY,
            angle: 0.0,
            piece_vertex: 0,
            anchor: PLATE_NODE,
            anchor_vertex: 0,
        }
    }

    /// Returns true for the sentinel.
    pub fn is_none(&self) -> bool {
        self.floating_index.is_none()
    }
}

impl Default for PiecePlacement {
    fn default() -> Self {
        Self::none()
    }
}

/// Everything a placement search reads; the layout it searches against is
/// passed per call.
#[derive(Debug, Clone, Copy)]
pub struct PlacementSearch<'a> {
    plate: &'a Boundary2D,
    oracle: FeasibilityOracle<'a>,
    objective: Objective,
    deadline: &'a Deadline,
}

impl<'a> PlacementSearch<'a> {
    /// Creates a search over `plate`.
    pub fn new(
        plate: &'a Boundary2D,
        use_bounding_boxes: bool,
        objective: Objective,
        deadline: &'a Deadline,
    ) -> Self {
        Self {
            plate,
            oracle: FeasibilityOracle::new(plate, use_bounding_boxes),
            objective,
            deadline,
        }
    }

    /// Anchors in search order: the plate first, then fixed pieces in
    /// placement order.
    fn anchors<'b>(&'b self, layout: &'b Layout) -> impl Iterator<Item = (NodeId, &'b Polygon)> + 'b {
        std::iter::once((PLATE_NODE, self.plate.polygon()))
            .chain(layout.pieces().iter().map(|p| (p.node, &p.polygon)))
    }

    /// Finds the lowest-scoring feasible placement of `piece` over every
    /// angle, piece vertex, anchor and anchor vertex. Every feasible candidate
    /// is appended to `collect` when given.
    ///
    /// Returns early with the best candidate so far once the deadline passes.
    pub fn best(
        &self,
        floating_index: usize,
        piece: &Polygon,
        angles: &[f64],
        layout: &Layout,
        stats: &mut SearchStats,
        mut collect: Option<&mut Vec<PiecePlacement>>,
    ) -> PiecePlacement {
        let mut best = PiecePlacement::none();

        for &angle in angles {
            let rotated = piece.rotated(angle);
            for (vi, &v) in rotated.vertices().iter().enumerate() {
                for (anchor, anchor_polygon) in self.anchors(layout) {
                    for (ui, &u) in anchor_polygon.vertices().iter().enumerate() {
                        if self.deadline.expired() {
                            return best;
                        }
                        let candidate = rotated.translated(u - v);
                        if !self.oracle.is_feasible(&candidate, layout, stats) {
                            continue;
                        }
                        let placement = PiecePlacement {
                            value: self.objective.evaluate(&candidate, layout),
                            polygon: candidate,
                            floating_index: Some(floating_index),
                            angle,
                            piece_vertex: vi,
                            anchor,
                            anchor_vertex: ui,
                        };
                        if let Some(pool) = collect.as_deref_mut() {
                            pool.push(placement.clone());
                        }
                        if best.is_none() || placement.value < best.value {
                            best = placement;
                        }
                    }
                }
            }
        }
        best
    }

    /// Returns the first feasible alignment of `piece` at `angle`, scanning
    /// piece vertices, then anchors, then anchor vertices.
    pub fn first_feasible(
        &self,
        floating_index: usize,
        piece: &Polygon,
        angle: f64,
        layout: &Layout,
        stats: &mut SearchStats,
    ) -> PiecePlacement {
        let rotated = piece.rotated(angle);
        for (vi, &v) in rotated.vertices().iter().enumerate() {
            for (anchor, anchor_polygon) in self.anchors(layout) {
                for (ui, &u) in anchor_polygon.vertices().iter().enumerate() {
                    if self.deadline.expired() {
                        return PiecePlacement::none();
                    }
                    let candidate = rotated.translated(u - v);
                    if self.oracle.is_feasible(&candidate, layout, stats) {
                        return PiecePlacement {
                            value: self.objective.evaluate(&candidate, layout),
                            polygon: candidate,
                            floating_index: Some(floating_index),
                            angle,
                            piece_vertex: vi,
                            anchor,
                            anchor_vertex: ui,
                        };
                    }
                }
            }
        }
        PiecePlacement::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignest_core::ObjectiveGoals;

    fn unit_square() -> Polygon {
        Polygon::from_tuples([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn length_only() -> Objective {
        Objective::new(ObjectiveGoals {
            length: true,
            width: false,
            compaction: false,
        })
    }

    #[test]
    fn test_sentinel() {
        let none = PiecePlacement::none();
        assert!(none.is_none());
        assert!(none.value.is_infinite());
    }

    #[test]
    fn test_best_on_empty_plate() {
        let plate = Boundary2D::rectangle(3.0, 1.0);
        let deadline = Deadline::unlimited();
        let search = PlacementSearch::new(&plate, true, length_only(), &deadline);
        let layout = Layout::new(false);
        let mut stats = SearchStats::default();

        let best = search.best(0, &unit_square(), &[0.0], &layout, &mut stats, None);
        assert_eq!(best.floating_index, Some(0));
        assert_eq!(best.anchor, PLATE_NODE);
        assert_eq!(best.polygon.bbox().min_x, 0.0);
        assert!((best.value - 0.5).abs() < 1e-12);
        assert!(stats.feasibility_tests > 0);
    }

    #[test]
    fn test_collects_every_feasible_candidate() {
        let plate = Boundary2D::rectangle(2.0, 1.0);
        let deadline = Deadline::unlimited();
        let search = PlacementSearch::new(&plate, true, length_only(), &deadline);
        let layout = Layout::new(false);
        let mut stats = SearchStats::default();
        let mut pool = Vec::new();

        let best = search.best(3, &unit_square(), &[0.0], &layout, &mut stats, Some(&mut pool));
        assert!(!pool.is_empty());
        assert!(pool.iter().all(|p| p.floating_index == Some(3)));
        assert!(pool.iter().all(|p| p.value >= best.value));
        // Only x = 0 and x = 1 fit in a 2x1 plate
        assert!(pool.iter().all(|p| {
            let x = p.polygon.bbox().min_x;
            x.abs() < 1e-9 || (x - 1.0).abs() < 1e-9
        }));
    }

    #[test]
    fn test_no_placement_when_piece_too_large() {
        let plate = Boundary2D::rectangle(1.0, 1.0);
        let deadline = Deadline::unlimited();
        let search = PlacementSearch::new(&plate, true, length_only(), &deadline);
        let layout = Layout::new(false);
        let mut stats = SearchStats::default();
        let big = Polygon::from_tuples([(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);

        assert!(search.best(0, &big, &[0.0], &layout, &mut stats, None).is_none());
        assert!(search.first_feasible(0, &big, 0.0, &layout, &mut stats).is_none());
    }

    #[test]
    fn test_rotation_makes_piece_fit() {
        let plate = Boundary2D::rectangle(1.0, 2.0);
        let deadline = Deadline::unlimited();
        let search = PlacementSearch::new(&plate, true, length_only(), &deadline);
        let layout = Layout::new(false);
        let mut stats = SearchStats::default();
        let bar = Polygon::from_tuples([(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);

        assert!(search.best(0, &bar, &[0.0], &layout, &mut stats, None).is_none());
        let turned = search.best(
            0,
            &bar,
            &[0.0, std::f64::consts::FRAC_PI_2],
            &layout,
            &mut stats,
            None,
        );
        assert!(!turned.is_none());
        assert!((turned.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_expired_deadline_returns_sentinel() {
        let plate = Boundary2D::rectangle(3.0, 1.0);
        let deadline = Deadline::start(1);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let search = PlacementSearch::new(&plate, true, length_only(), &deadline);
        let layout = Layout::new(false);
        let mut stats = SearchStats::default();

        assert!(search.best(0, &unit_square(), &[0.0], &layout, &mut stats, None).is_none());
        assert_eq!(stats.feasibility_tests, 0);
    }

    #[test]
    fn test_first_feasible_anchors_to_fixed_piece() {
        let plate = Boundary2D::rectangle(2.0, 1.0);
        let deadline = Deadline::unlimited();
        let search = PlacementSearch::new(&plate, true, length_only(), &deadline);
        let mut layout = Layout::new(false);
        layout.push(0, unit_square(), PLATE_NODE);
        let mut stats = SearchStats::default();

        let p = search.first_feasible(1, &unit_square(), 0.0, &layout, &mut stats);
        assert!(!p.is_none());
        assert!((p.polygon.bbox().min_x - 1.0).abs() < 1e-9);
    }
}
