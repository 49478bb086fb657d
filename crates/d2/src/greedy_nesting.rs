//! Construction heuristic and its binding to the greedy drivers.
//!
//! [`GreedyNestingProblem`] implements [`GreedyProblem`] so the same
//! construction can be run once, restarted from an empty plate, or alternated
//! with [`deconstruct`] by [`ignest_core::GreedyRunner`].
//!
//! # Construction
//!
//! Each step looks at the first `m` entries of the floating pool (largest
//! area first) and runs the placement search on each:
//!
//! - **Deterministic** (`alpha == 0`): the lowest-scoring placement wins.
//! - **Alpha**: every feasible candidate of the window is pooled and one is
//!   drawn uniformly among those scoring within `alpha * (worst - best)` of
//!   the best.
//! - **Random**: see [`crate::random_placement`].
//!
//! Window entries without any feasible placement leave the pool. The pool is
//! rebuilt at the start of every construction from the instance quantities
//! minus the instances already fixed.

use ignest_core::{Config, Deadline, GreedyProblem, SearchStats, Strategy};
use rand::rngs::StdRng;
use rand::Rng;

use crate::deconstruct::deconstruct;
use crate::instance::{FloatingPiece, NestingInstance};
use crate::layout::{Layout, NodeId};
use crate::objective::Objective;
use crate::placement::{PiecePlacement, PlacementSearch};
use crate::random_placement::place_random;

/// How a construction step selects the next placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstructionMode {
    /// Best score over the lookahead window.
    Deterministic,
    /// Uniform draw within the alpha band of the pooled candidates.
    Alpha(f64),
    /// Random piece, random angle, first feasible alignment.
    Random,
}

impl ConstructionMode {
    /// Selects the mode for a run: random placement for that strategy,
    /// otherwise alpha mode whenever `alpha > 0`.
    pub fn from_config(config: &Config) -> Self {
        if config.strategy == Strategy::RandomPlacement {
            Self::Random
        } else if config.alpha > 0.0 {
            Self::Alpha(config.alpha)
        } else {
            Self::Deterministic
        }
    }
}

/// Draws one candidate uniformly among those within the alpha band,
/// `value <= best + alpha * (worst - best)`, by reservoir sampling.
pub fn select_within_band(
    pool: Vec<PiecePlacement>,
    alpha: f64,
    rng: &mut StdRng,
) -> Option<PiecePlacement> {
    let best = pool.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let worst = pool.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let spread = worst - best;
    let threshold = if spread.is_finite() {
        best + alpha * spread
    } else {
        f64::INFINITY
    };

    let mut chosen = None;
    let mut seen = 0usize;
    for placement in pool {
        if placement.value <= threshold {
            seen += 1;
            if rng.gen_range(0..seen) == 0 {
                chosen = Some(placement);
            }
        }
    }
    chosen
}

/// Fixes `placement` on the layout and updates the floating pool.
///
/// The placed entry loses one instance and leaves the pool at zero. `removals`
/// are pool indices taken before any removal; they are applied largest first.
pub(crate) fn commit(
    placement: PiecePlacement,
    mut removals: Vec<usize>,
    floating: &mut Vec<FloatingPiece>,
    layout: &mut Layout,
) -> Option<NodeId> {
    let index = placement.floating_index?;
    let entry = floating.get_mut(index)?;
    entry.remaining = entry.remaining.saturating_sub(1);
    let piece = entry.piece;
    if entry.remaining == 0 {
        removals.push(index);
    }

    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for i in removals {
        floating.remove(i);
    }

    let anchor = placement.anchor;
    let node = layout.push(piece, placement.polygon, anchor);
    log::debug!(
        "fixed piece {} as node {} (anchor {}, vertex {} -> {}, angle {:.3}, value {:.6})",
        piece,
        node,
        anchor,
        placement.piece_vertex,
        placement.anchor_vertex,
        placement.angle,
        placement.value
    );
    Some(node)
}

/// The nesting state driven by [`ignest_core::GreedyRunner`].
pub struct GreedyNestingProblem<'a> {
    instance: &'a NestingInstance,
    search: PlacementSearch<'a>,
    mode: ConstructionMode,
    lookahead: usize,
    target_area: f64,
    deadline: &'a Deadline,
    layout: Layout,
    floating: Vec<FloatingPiece>,
    stats: SearchStats,
}

impl<'a> GreedyNestingProblem<'a> {
    /// Creates the problem over a prepared instance.
    pub fn new(instance: &'a NestingInstance, config: &Config, deadline: &'a Deadline) -> Self {
        let objective = Objective::new(config.objective);
        Self {
            instance,
            search: PlacementSearch::new(
                instance.plate(),
                config.use_bounding_boxes,
                objective,
                deadline,
            ),
            mode: ConstructionMode::from_config(config),
            lookahead: config.lookahead.max(1),
            target_area: config.deconstruct_fraction * instance.plate().polygon().area(),
            deadline,
            layout: Layout::new(config.objective.compaction),
            floating: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// The construction mode in use.
    pub fn mode(&self) -> ConstructionMode {
        self.mode
    }

    /// The current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The floating pool left by the last construction.
    pub fn floating(&self) -> &[FloatingPiece] {
        &self.floating
    }

    /// Search counters accumulated over the run.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Consumes the problem, returning the current layout.
    pub fn into_layout(self) -> Layout {
        self.layout
    }

    /// One deterministic or alpha step. Returns true if a piece was fixed.
    fn greedy_step(&mut self, alpha: Option<f64>, rng: &mut StdRng) -> bool {
        let instance = self.instance;
        let window = self.lookahead.min(self.floating.len());
        let mut best = PiecePlacement::none();
        let mut pool = Vec::new();
        let mut unplaceable = Vec::new();

        for i in 0..window {
            let spec = &instance.pieces()[self.floating[i].piece];
            let collect = alpha.is_some().then_some(&mut pool);
            let candidate = self.search.best(
                i,
                &spec.polygon,
                &spec.angles,
                &self.layout,
                &mut self.stats,
                collect,
            );
            if candidate.is_none() {
                unplaceable.push(i);
            } else if best.is_none() || candidate.value < best.value {
                best = candidate;
            }
        }

        if best.is_none() {
            log::debug!("no placement for the next {} floating entries", window);
            self.floating.drain(..window);
            return false;
        }

        if let Some(alpha) = alpha {
            if let Some(drawn) = select_within_band(pool, alpha, rng) {
                best = drawn;
            }
        }
        commit(best, unplaceable, &mut self.floating, &mut self.layout).is_some()
    }
}

impl GreedyProblem for GreedyNestingProblem<'_> {
    type Snapshot = Layout;

    fn reset(&mut self) {
        self.layout.clear();
        self.floating.clear();
    }

    fn construct(&mut self, rng: &mut StdRng) -> usize {
        self.floating = self.instance.floating(&self.layout);
        if self.floating.is_empty() {
            log::warn!("construction started with an empty floating pool");
            return 0;
        }

        let mut placed = 0;
        while !self.floating.is_empty() && !self.deadline.expired() {
            let fixed = match self.mode {
                ConstructionMode::Deterministic => self.greedy_step(None, rng),
                ConstructionMode::Alpha(alpha) => self.greedy_step(Some(alpha), rng),
                ConstructionMode::Random => place_random(
                    &self.search,
                    self.instance.pieces(),
                    &mut self.floating,
                    &mut self.layout,
                    &mut self.stats,
                    rng,
                ),
            };
            if fixed {
                placed += 1;
            }
        }
        placed
    }

    fn destroy(&mut self, rng: &mut StdRng) {
        deconstruct(&mut self.layout, self.target_area, rng, self.deadline);
    }

    fn placed_area(&self) -> f64 {
        self.layout.fixed_area()
    }

    fn extent(&self) -> f64 {
        self.layout.extent()
    }

    fn placed_count(&self) -> usize {
        self.layout.len()
    }

    fn snapshot(&self) -> Layout {
        self.layout.clone()
    }

    fn restore(&mut self, snapshot: Layout) {
        self.layout = snapshot;
    }

    fn deadline(&self) -> &Deadline {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary2D;
    use crate::geometry::Geometry2D;
    use crate::polygon::Polygon;
    use ignest_core::ObjectiveGoals;
    use rand::SeedableRng;

    fn placement(index: usize, value: f64) -> PiecePlacement {
        PiecePlacement {
            floating_index: Some(index),
            value,
            ..PiecePlacement::none()
        }
    }

    fn squares(plate_w: f64, plate_h: f64, quantity: usize, config: &Config) -> NestingInstance {
        let geometries = vec![Geometry2D::rectangle("sq", 1.0, 1.0).with_quantity(quantity)];
        NestingInstance::prepare(&geometries, &Boundary2D::rectangle(plate_w, plate_h), config)
    }

    fn deterministic() -> Config {
        Config::default()
            .with_strategy(Strategy::Constructive)
            .with_alpha(0.0)
            .with_objective(ObjectiveGoals {
                length: true,
                width: false,
                compaction: false,
            })
    }

    #[test]
    fn test_mode_from_config() {
        assert_eq!(
            ConstructionMode::from_config(&deterministic()),
            ConstructionMode::Deterministic
        );
        assert_eq!(
            ConstructionMode::from_config(&Config::default()),
            ConstructionMode::Alpha(0.01)
        );
        let random = Config::default().with_strategy(Strategy::RandomPlacement);
        assert_eq!(ConstructionMode::from_config(&random), ConstructionMode::Random);
    }

    #[test]
    fn test_band_with_zero_alpha_keeps_only_best() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let pool = vec![placement(0, 3.0), placement(1, 1.0), placement(2, 2.0)];
            let chosen = select_within_band(pool, 0.0, &mut rng).unwrap();
            assert_eq!(chosen.floating_index, Some(1));
        }
    }

    #[test]
    fn test_band_with_full_alpha_reaches_every_candidate() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hits = [0usize; 3];
        for _ in 0..300 {
            let pool = vec![placement(0, 3.0), placement(1, 1.0), placement(2, 2.0)];
            let chosen = select_within_band(pool, 1.0, &mut rng).unwrap();
            hits[chosen.floating_index.unwrap()] += 1;
        }
        assert!(hits.iter().all(|&h| h > 50), "{hits:?}");
    }

    #[test]
    fn test_band_excludes_values_beyond_threshold() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let pool = vec![placement(0, 0.0), placement(1, 0.4), placement(2, 10.0)];
            let chosen = select_within_band(pool, 0.05, &mut rng).unwrap();
            assert_ne!(chosen.floating_index, Some(2));
        }
        assert!(select_within_band(Vec::new(), 0.5, &mut rng).is_none());
    }

    #[test]
    fn test_commit_resolves_removals_from_the_back() {
        let mut floating = vec![
            FloatingPiece { piece: 0, remaining: 1 },
            FloatingPiece { piece: 1, remaining: 2 },
            FloatingPiece { piece: 2, remaining: 1 },
            FloatingPiece { piece: 3, remaining: 1 },
        ];
        let mut layout = Layout::new(false);
        let mut placed = placement(2, 0.0);
        placed.polygon = Polygon::from_tuples([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);

        let node = commit(placed, vec![0], &mut floating, &mut layout);
        assert!(node.is_some());
        let left: Vec<usize> = floating.iter().map(|f| f.piece).collect();
        assert_eq!(left, vec![1, 3]);
        assert_eq!(layout.count_of(2), 1);
    }

    #[test]
    fn test_deterministic_fills_plate_then_drops_rest() {
        let config = deterministic().with_super_sample(0, 0);
        let instance = squares(2.0, 1.0, 3, &config);
        let deadline = Deadline::unlimited();
        let mut problem = GreedyNestingProblem::new(&instance, &config, &deadline);
        let mut rng = StdRng::seed_from_u64(0);

        problem.reset();
        let placed = problem.construct(&mut rng);
        assert_eq!(placed, 2);
        assert_eq!(problem.placed_count(), 2);
        assert!((problem.placed_area() - 2.0).abs() < 1e-12);
        assert!(problem.floating().is_empty());
        assert!(problem.stats().feasibility_tests > 0);
    }

    #[test]
    fn test_construct_resumes_from_current_layout() {
        let config = deterministic().with_deconstruct_fraction(0.5);
        let instance = squares(4.0, 1.0, 4, &config);
        let deadline = Deadline::unlimited();
        let mut problem = GreedyNestingProblem::new(&instance, &config, &deadline);
        let mut rng = StdRng::seed_from_u64(3);

        problem.reset();
        assert_eq!(problem.construct(&mut rng), 4);
        problem.destroy(&mut rng);
        assert_eq!(problem.placed_count(), 2);
        // Destroyed instances are available again and never exceed the quantity
        assert_eq!(problem.construct(&mut rng), 2);
        assert_eq!(problem.placed_count(), 4);
        assert!(problem.layout().graph().is_consistent());
    }

    #[test]
    fn test_snapshot_restore() {
        let config = deterministic();
        let instance = squares(3.0, 1.0, 3, &config);
        let deadline = Deadline::unlimited();
        let mut problem = GreedyNestingProblem::new(&instance, &config, &deadline);
        let mut rng = StdRng::seed_from_u64(0);

        problem.reset();
        problem.construct(&mut rng);
        let snapshot = problem.snapshot();
        problem.reset();
        assert_eq!(problem.placed_count(), 0);
        problem.restore(snapshot);
        assert_eq!(problem.placed_count(), 3);
        assert!((problem.extent() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_lookahead_window_places_everything() {
        let config = deterministic().with_lookahead(3);
        let geometries = vec![
            Geometry2D::rectangle("a", 2.0, 1.0).with_quantity(1),
            Geometry2D::rectangle("b", 1.0, 1.0).with_quantity(2),
        ];
        let instance =
            NestingInstance::prepare(&geometries, &Boundary2D::rectangle(4.0, 1.0), &config);
        let deadline = Deadline::unlimited();
        let mut problem = GreedyNestingProblem::new(&instance, &config, &deadline);
        let mut rng = StdRng::seed_from_u64(0);

        problem.reset();
        assert_eq!(problem.construct(&mut rng), 3);
        assert!((problem.placed_area() - 4.0).abs() < 1e-12);
    }
}
