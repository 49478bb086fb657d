//! # ignest 2D
//!
//! Irregular 2D nesting for the ignest placement engine.
//!
//! Pieces are placed one at a time by aligning a vertex of the (rotated)
//! piece with a vertex of the plate or of an already fixed piece, keeping the
//! feasible alignment with the best objective score. Three drivers reuse that
//! construction: a single pass, alpha-greedy restarts, and iterated greedy
//! with a destroy/repair cycle over the placement adjacency graph.
//!
//! ## Features
//!
//! - Exact orientation predicates for segment crossing and hulls
//! - Rectangular and general simple-polygon plates
//! - Per-piece angle lists or a global rotation sweep
//! - Length, width and convex-hull compaction objectives
//! - Seeded, reproducible randomized search
//!
//! ## Quick Start
//!
//! ```rust
//! use ignest_d2::{Boundary2D, Config, Geometry2D, Nester2D, Solver, Strategy};
//!
//! let pieces = vec![
//!     Geometry2D::rectangle("bar", 4.0, 1.0)
//!         .with_quantity(3)
//!         .with_rotations_deg(vec![0.0, 90.0]),
//!     Geometry2D::l_shape("ell", 3.0, 3.0, 1.0, 1.0).with_quantity(2),
//! ];
//! let plate = Boundary2D::rectangle(10.0, 6.0);
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::IteratedGreedy)
//!     .with_seed(7)
//!     .with_max_rounds(5)
//!     .with_time_limit(0);
//!
//! let result = Nester2D::new(config).solve(&pieces, &plate).unwrap();
//! println!(
//!     "placed {} pieces, utilization {}",
//!     result.placed_count(),
//!     result.utilization_percent()
//! );
//! ```
//!
//! ## Geometry Creation
//!
//! ```rust
//! use ignest_d2::Geometry2D;
//!
//! let rect = Geometry2D::rectangle("r1", 100.0, 50.0);
//! let ell = Geometry2D::l_shape("l1", 100.0, 80.0, 30.0, 30.0);
//! let custom = Geometry2D::new("custom")
//!     .with_polygon(vec![(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)])
//!     .with_quantity(3);
//! ```

pub mod boundary;
pub mod deconstruct;
pub mod feasibility;
pub mod geometry;
pub mod greedy_nesting;
pub mod instance;
pub mod layout;
pub mod nester;
pub mod objective;
pub mod placement;
pub mod point;
pub mod polygon;
pub mod random_placement;

// Re-exports
pub use boundary::Boundary2D;
pub use deconstruct::deconstruct;
pub use feasibility::FeasibilityOracle;
pub use geometry::Geometry2D;
pub use greedy_nesting::{ConstructionMode, GreedyNestingProblem};
pub use instance::{FloatingPiece, NestingInstance, PieceSpec};
pub use layout::{AdjacencyGraph, FixedPiece, Layout, NodeId, PLATE_NODE};
pub use nester::Nester2D;
pub use objective::Objective;
pub use placement::{PiecePlacement, PlacementSearch};
pub use point::{Point, EPS};
pub use polygon::{convex_hull, Polygon};
pub use ignest_core::{
    Boundary, Config, Error, Geometry, ObjectiveGoals, ProgressCallback, ProgressInfo, Result,
    RotationConstraint, SearchStats, SolveResult, SolveSummary, Solver, Strategy, AABB2D,
};
