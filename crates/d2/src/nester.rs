//! 2D nesting solver.

use crate::boundary::Boundary2D;
use crate::geometry::Geometry2D;
use crate::greedy_nesting::GreedyNestingProblem;
use crate::instance::NestingInstance;
use crate::layout::Layout;
use ignest_core::geometry::{Boundary, Geometry};
use ignest_core::greedy::{Criterion, GreedyConfig, GreedyProgress, GreedyResult, GreedyRunner};
use ignest_core::solver::{Config, ProgressCallback, ProgressInfo, Solver, Strategy};
use ignest_core::{Deadline, Result, SolveResult};

/// 2D nesting solver.
pub struct Nester2D {
    config: Config,
}

impl Nester2D {
    /// Creates a new nester with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a nester with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validate(&self, geometries: &[Geometry2D], boundary: &Boundary2D) -> Result<()> {
        self.config.validate()?;
        boundary.validate()?;
        for geom in geometries {
            geom.validate()?;
        }
        Ok(())
    }

    fn criterion(&self) -> Criterion {
        if self.config.objective.compaction {
            Criterion::PlacedArea
        } else {
            Criterion::Extent
        }
    }

    fn runner(&self) -> GreedyRunner {
        let mut greedy = GreedyConfig::new()
            .with_criterion(self.criterion())
            .with_max_rounds(self.config.max_rounds);
        if let Some(seed) = self.config.seed {
            greedy = greedy.with_seed(seed);
        }
        GreedyRunner::new(greedy)
    }

    fn run<F>(
        &self,
        geometries: &[Geometry2D],
        boundary: &Boundary2D,
        mut progress: F,
    ) -> Result<SolveResult>
    where
        F: FnMut(ProgressInfo),
    {
        self.validate(geometries, boundary)?;

        let deadline = Deadline::start(self.config.time_limit_ms);
        let instance = NestingInstance::prepare(geometries, boundary, &self.config);
        let total = instance.total_quantity();
        let plate_area = boundary.measure();
        let strategy = self.config.strategy;

        if total == 0 {
            log::warn!("no piece instances requested");
        }

        let mut problem = GreedyNestingProblem::new(&instance, &self.config, &deadline);
        log::info!(
            "strategy {}: {:?} construction, {} instances of {} pieces, objective {}",
            strategy.name(),
            problem.mode(),
            total,
            instance.pieces().len(),
            self.config.objective
        );

        let on_round = |p: &GreedyProgress| {
            progress(
                ProgressInfo::new()
                    .with_iteration(p.round as u32)
                    .with_utilization(p.placed_area / plate_area)
                    .with_best_value(p.best_value)
                    .with_items(p.placed_count, total)
                    .with_elapsed(p.elapsed_ms)
                    .with_phase(strategy.name()),
            )
        };

        let runner = self.runner();
        let outcome = match strategy {
            Strategy::Constructive | Strategy::RandomPlacement => {
                runner.run_single(&mut problem, on_round)
            }
            Strategy::AlphaGreedy => runner.run_restarts(&mut problem, on_round),
            Strategy::IteratedGreedy => runner.run_iterated(&mut problem, on_round),
        };

        let stats = problem.stats();
        let layout = problem.into_layout();
        if layout.is_empty() && total > 0 {
            log::warn!("no piece fits on the plate");
        }

        let mut result = self.build_result(&instance, &layout, &outcome, plate_area, &deadline);
        result.stats = stats;

        progress(
            ProgressInfo::new()
                .with_iteration(outcome.rounds as u32)
                .with_utilization(result.utilization)
                .with_best_value(outcome.best_value)
                .with_items(layout.len(), total)
                .with_elapsed(result.computation_time_ms)
                .with_phase("done")
                .finished(),
        );

        log::info!(
            "{} pieces placed, utilization {}, {} rounds, {} feasibility tests",
            result.placed_count(),
            result.utilization_percent(),
            result.iterations,
            result.stats.feasibility_tests
        );
        Ok(result)
    }

    fn build_result(
        &self,
        instance: &NestingInstance,
        layout: &Layout,
        outcome: &GreedyResult,
        plate_area: f64,
        deadline: &Deadline,
    ) -> SolveResult {
        let mut result = SolveResult::new().with_strategy(self.config.strategy.name());

        for fixed in layout.pieces() {
            result.polygons.push(fixed.polygon.to_tuples());
            result.piece_ids.push(instance.pieces()[fixed.piece].id.clone());
        }
        result.unplaced = instance
            .pieces()
            .iter()
            .enumerate()
            .filter(|(i, spec)| layout.count_of(*i) < spec.quantity)
            .map(|(_, spec)| spec.id.clone())
            .collect();

        result.placed_area = layout.fixed_area();
        result.boundary_area = plate_area;
        if plate_area > 0.0 {
            result.utilization = result.placed_area / plate_area;
            result.initial_utilization = outcome.initial_area / plate_area;
        }
        result.iterations = outcome.rounds as u64;
        result.best_history = outcome.history.clone();
        result.computation_time_ms = deadline.elapsed_ms();
        result
    }
}

impl Solver for Nester2D {
    type Geometry = Geometry2D;
    type Boundary = Boundary2D;

    fn solve(&self, geometries: &[Self::Geometry], boundary: &Self::Boundary) -> Result<SolveResult> {
        self.run(geometries, boundary, |_| {})
    }

    fn solve_with_progress(
        &self,
        geometries: &[Self::Geometry],
        boundary: &Self::Boundary,
        callback: ProgressCallback,
    ) -> Result<SolveResult> {
        self.run(geometries, boundary, |info| callback(info))
    }
}
