//! Placement scoring. Lower is better.

use ignest_core::ObjectiveGoals;

use crate::layout::Layout;
use crate::point::{Point, EPS};
use crate::polygon::{convex_hull, Polygon};

/// Scores candidate positions according to the configured goals.
#[derive(Debug, Clone, Copy)]
pub struct Objective {
    goals: ObjectiveGoals,
}

impl Objective {
    /// Creates an evaluator for `goals`.
    pub fn new(goals: ObjectiveGoals) -> Self {
        Self { goals }
    }

    /// The configured goals.
    pub fn goals(&self) -> ObjectiveGoals {
        self.goals
    }

    /// Scores `candidate` against the current layout.
    ///
    /// The base term comes from the candidate's centroid: `x / y` when both
    /// length and width are minimized, `y` for width only, `x` for length only,
    /// 1 otherwise. With compaction the base is multiplied by the share of the
    /// convex hull around all fixed pieces plus the candidate that would stay
    /// empty, floored at `EPS`.
    pub fn evaluate(&self, candidate: &Polygon, layout: &Layout) -> f64 {
        let c = candidate.centroid().unwrap_or(Point::ORIGIN);
        let mut r = match (self.goals.length, self.goals.width) {
            (true, true) => c.x / c.y,
            (false, true) => c.y,
            (true, false) => c.x,
            (false, false) => 1.0,
        };

        if self.goals.compaction {
            r *= self.waste_ratio(candidate, layout);
        }
        r
    }

    fn waste_ratio(&self, candidate: &Polygon, layout: &Layout) -> f64 {
        let mut points: Vec<Point> = layout
            .hull()
            .map(|h| h.vertices().to_vec())
            .unwrap_or_default();
        points.extend_from_slice(candidate.vertices());

        let hull_area = convex_hull(points).area();
        if hull_area <= 0.0 {
            return EPS;
        }
        let waste = (hull_area - (layout.fixed_area() + candidate.area())) / hull_area;
        waste.max(EPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PLATE_NODE;
    use approx::assert_relative_eq;

    fn square_at(x: f64, y: f64) -> Polygon {
        Polygon::from_tuples([(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)])
    }

    fn goals(length: bool, width: bool, compaction: bool) -> ObjectiveGoals {
        ObjectiveGoals {
            length,
            width,
            compaction,
        }
    }

    #[test]
    fn test_base_terms() {
        let layout = Layout::new(false);
        let cand = square_at(2.0, 0.0);
        assert_relative_eq!(Objective::new(goals(true, false, false)).evaluate(&cand, &layout), 2.5);
        assert_relative_eq!(Objective::new(goals(false, true, false)).evaluate(&cand, &layout), 0.5);
        assert_relative_eq!(Objective::new(goals(true, true, false)).evaluate(&cand, &layout), 5.0);
        assert_relative_eq!(Objective::new(goals(false, false, false)).evaluate(&cand, &layout), 1.0);
    }

    #[test]
    fn test_compaction_prefers_adjacent_positions() {
        let mut layout = Layout::new(true);
        layout.push(0, square_at(0.0, 0.0), PLATE_NODE);
        let objective = Objective::new(goals(false, false, true));

        let adjacent = objective.evaluate(&square_at(1.0, 0.0), &layout);
        let diagonal = objective.evaluate(&square_at(1.0, 1.0), &layout);
        let far = objective.evaluate(&square_at(3.0, 0.0), &layout);

        // Adjacent squares fill their hull exactly
        assert_relative_eq!(adjacent, EPS);
        assert!(diagonal > adjacent);
        assert!(far > adjacent);
    }

    #[test]
    fn test_compaction_scales_base_term() {
        let mut layout = Layout::new(true);
        layout.push(0, square_at(0.0, 0.0), PLATE_NODE);
        let cand = square_at(1.0, 1.0);

        let plain = Objective::new(goals(true, false, false)).evaluate(&cand, &layout);
        let compact = Objective::new(goals(true, false, true)).evaluate(&cand, &layout);
        // Hull of the two diagonal squares has area 3, pieces cover 2
        assert_relative_eq!(compact, plain / 3.0, epsilon = 1e-12);
    }
}
