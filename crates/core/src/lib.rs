//! # ignest core
//!
//! Dimension-free building blocks for the ignest irregular nesting engine.
//!
//! ## Core Components
//!
//! - **Geometry traits**: [`Geometry`], [`Boundary`], [`RotationConstraint`]
//! - **Solver trait**: [`Solver`] with its [`Config`] and [`Strategy`]
//! - **Greedy drivers**: [`GreedyRunner`], [`GreedyProblem`] for single,
//!   restarted and iterated construction
//! - **Predicates**: [`robust::orient2d`], [`robust::segments_cross`]
//! - **Boxes**: [`AABB2D`]
//!
//! ## Strategies
//!
//! | Strategy | Stops on | Description |
//! |----------|----------|-------------|
//! | `Constructive` | pool empty | One greedy pass, largest pieces first |
//! | `AlphaGreedy` | deadline | Randomized greedy restarted from scratch |
//! | `IteratedGreedy` | deadline | Destroy a connected region and rebuild |
//! | `RandomPlacement` | pool empty | Random piece, random angle, first fit |
//!
//! ## Configuration
//!
//! ```rust
//! use ignest_core::{Config, ObjectiveGoals, Strategy};
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::IteratedGreedy)
//!     .with_objective(ObjectiveGoals::parse("length,compaction").unwrap())
//!     .with_deconstruct_fraction(0.3)
//!     .with_time_limit(10_000);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod deadline;
pub mod error;
pub mod geometry;
pub mod greedy;
pub mod result;
pub mod robust;
pub mod solver;
pub mod transform;

// Re-exports
pub use deadline::Deadline;
pub use error::{Error, Result};
pub use geometry::{Boundary, Geometry, GeometryId, RotationConstraint};
pub use greedy::{
    Criterion, GreedyConfig, GreedyProblem, GreedyProgress, GreedyResult, GreedyRunner,
};
pub use result::{SearchStats, SolveResult, SolveSummary};
pub use solver::{
    Config, ObjectiveGoals, ProgressCallback, ProgressInfo, Solver, Strategy, MIN_ROTATION_STEP_DEG,
};
pub use transform::AABB2D;
