//! Solve result representation.

use crate::geometry::GeometryId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters kept by the feasibility oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Feasibility tests performed.
    pub feasibility_tests: u64,
    /// Bounding-box tests performed.
    pub bb_tests: u64,
    /// Bounding-box tests that pruned a pair.
    pub bb_tests_succeeded: u64,
}

impl SearchStats {
    /// Share of bounding-box tests that pruned a pair (0.0 when none ran).
    pub fn bb_success_rate(&self) -> f64 {
        if self.bb_tests == 0 {
            0.0
        } else {
            self.bb_tests_succeeded as f64 / self.bb_tests as f64
        }
    }
}

/// Result of a nesting solve operation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult {
    /// Placed polygons in placement order, plate excluded.
    pub polygons: Vec<Vec<(f64, f64)>>,

    /// Piece id of each placed polygon, parallel to `polygons`.
    pub piece_ids: Vec<GeometryId>,

    /// Total area of the placed polygons.
    pub placed_area: f64,

    /// Area of the plate.
    pub boundary_area: f64,

    /// Utilization ratio (0.0 - 1.0), `placed_area / boundary_area`.
    pub utilization: f64,

    /// IDs of piece types with instances left unplaced.
    pub unplaced: Vec<GeometryId>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Number of construction rounds.
    pub iterations: u64,

    /// Utilization of the very first layout found.
    pub initial_utilization: f64,

    /// Best criterion value after every round.
    pub best_history: Vec<f64>,

    /// Feasibility counters.
    pub stats: SearchStats,

    /// Strategy used for solving.
    pub strategy: Option<String>,
}

impl SolveResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
            piece_ids: Vec::new(),
            placed_area: 0.0,
            boundary_area: 0.0,
            utilization: 0.0,
            unplaced: Vec::new(),
            computation_time_ms: 0,
            iterations: 0,
            initial_utilization: 0.0,
            best_history: Vec::new(),
            stats: SearchStats::default(),
            strategy: None,
        }
    }

    /// Returns true if all piece instances were placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the number of placed piece instances.
    pub fn placed_count(&self) -> usize {
        self.polygons.len()
    }

    /// Returns true if at least one piece was placed.
    pub fn is_successful(&self) -> bool {
        !self.polygons.is_empty()
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }

    /// Width and height of the box enclosing every placed polygon.
    pub fn layout_extent(&self) -> (f64, f64) {
        let aabb = crate::AABB2D::from_points(self.polygons.iter().flatten().copied());
        if aabb.is_empty() {
            (0.0, 0.0)
        } else {
            (aabb.width(), aabb.height())
        }
    }
}

impl Default for SolveResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a solve result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveSummary {
    /// Total pieces placed.
    pub total_placed: usize,
    /// Piece types with unplaced instances.
    pub unplaced_types: usize,
    /// Placed area.
    pub placed_area: f64,
    /// Plate area.
    pub boundary_area: f64,
    /// Utilization percentage.
    pub utilization_percent: f64,
    /// Utilization percentage of the first layout.
    pub initial_utilization_percent: f64,
    /// Construction rounds.
    pub iterations: u64,
    /// Feasibility counters.
    pub stats: SearchStats,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
}

impl From<&SolveResult> for SolveSummary {
    fn from(result: &SolveResult) -> Self {
        Self {
            total_placed: result.polygons.len(),
            unplaced_types: result.unplaced.len(),
            placed_area: result.placed_area,
            boundary_area: result.boundary_area,
            utilization_percent: result.utilization * 100.0,
            initial_utilization_percent: result.initial_utilization * 100.0,
            iterations: result.iterations,
            stats: result.stats,
            time_ms: result.computation_time_ms,
            strategy: result
                .strategy
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_at(x: f64, y: f64) -> Vec<(f64, f64)> {
        vec![(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)]
    }

    #[test]
    fn test_result_new() {
        let result = SolveResult::new();
        assert!(result.polygons.is_empty());
        assert_eq!(result.utilization, 0.0);
        assert!(result.all_placed());
        assert!(!result.is_successful());
    }

    #[test]
    fn test_result_with_polygons() {
        let mut result = SolveResult::new();
        result.polygons.push(unit_square_at(0.0, 0.0));
        result.polygons.push(unit_square_at(1.0, 0.0));
        result.utilization = 0.85;

        assert_eq!(result.placed_count(), 2);
        assert!(result.is_successful());
        assert_eq!(result.utilization_percent(), "85.0%");

        let (w, h) = result.layout_extent();
        assert_relative_eq!(w, 2.0);
        assert_relative_eq!(h, 1.0);
    }

    #[test]
    fn test_bb_success_rate() {
        let stats = SearchStats {
            feasibility_tests: 10,
            bb_tests: 8,
            bb_tests_succeeded: 2,
        };
        assert_relative_eq!(stats.bb_success_rate(), 0.25);
        assert_relative_eq!(SearchStats::default().bb_success_rate(), 0.0);
    }

    #[test]
    fn test_solve_summary() {
        let mut result = SolveResult::new().with_strategy("iterated-greedy");
        result.polygons.push(unit_square_at(0.0, 0.0));
        result.utilization = 0.75;
        result.initial_utilization = 0.5;
        result.unplaced.push("p1".to_string());
        result.computation_time_ms = 100;

        let summary = SolveSummary::from(&result);
        assert_eq!(summary.total_placed, 1);
        assert_eq!(summary.unplaced_types, 1);
        assert_relative_eq!(summary.utilization_percent, 75.0);
        assert_relative_eq!(summary.initial_utilization_percent, 50.0);
        assert_eq!(summary.strategy, "iterated-greedy");
    }
}
