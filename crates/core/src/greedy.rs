//! # Greedy Meta-heuristic Drivers
//!
//! Outer loops around a greedy construction heuristic:
//!
//! - **Single construction**: one pass from an empty layout.
//! - **Randomized restarts**: reset, construct, keep the best layout, repeat
//!   until the deadline.
//! - **Iterated greedy**: construct, keep the best layout, destroy part of the
//!   *current* layout and construct again from what is left, repeat until the
//!   deadline.
//!
//! The problem owns its layout state and deadline; the runner only decides
//! when to reset, construct, destroy, snapshot and restore.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ignest_core::greedy::{GreedyConfig, GreedyRunner};
//!
//! let runner = GreedyRunner::new(GreedyConfig::default().with_seed(7));
//! let result = runner.run_iterated(&mut problem, |progress| println!("{:?}", progress));
//! ```

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::deadline::Deadline;

/// How two layouts are compared between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    /// Larger placed area is better.
    #[default]
    PlacedArea,
    /// Smaller rightmost extent is better.
    Extent,
}

impl Criterion {
    /// Criterion value of a problem's current layout, in natural units.
    pub fn value<P: GreedyProblem + ?Sized>(&self, problem: &P) -> f64 {
        match self {
            Criterion::PlacedArea => problem.placed_area(),
            Criterion::Extent => problem.extent(),
        }
    }

    /// Returns true if `candidate` strictly beats `best`.
    pub fn improves(&self, candidate: f64, best: f64) -> bool {
        match self {
            Criterion::PlacedArea => candidate > best,
            Criterion::Extent => candidate < best,
        }
    }
}

/// Configuration for the greedy drivers.
#[derive(Debug, Clone, Default)]
pub struct GreedyConfig {
    /// Layout comparison between rounds.
    pub criterion: Criterion,
    /// Random seed for reproducibility (None = entropy).
    pub seed: Option<u64>,
    /// Maximum number of rounds (0 = until the deadline).
    pub max_rounds: usize,
}

impl GreedyConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comparison criterion.
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the round cap.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }
}

/// Progress information emitted after every round.
#[derive(Debug, Clone)]
pub struct GreedyProgress {
    /// Round number, starting at 0.
    pub round: usize,
    /// Best criterion value so far.
    pub best_value: f64,
    /// Criterion value of the layout just built.
    pub current_value: f64,
    /// Pieces in the layout just built.
    pub placed_count: usize,
    /// Area covered by the layout just built.
    pub placed_area: f64,
    /// Whether this round produced a new best.
    pub improved: bool,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of a greedy run. The problem is left holding the best layout.
#[derive(Debug, Clone)]
pub struct GreedyResult {
    /// Best criterion value.
    pub best_value: f64,
    /// Placed area of the first layout built.
    pub initial_area: f64,
    /// Rounds performed.
    pub rounds: usize,
    /// Total time elapsed in milliseconds.
    pub elapsed_ms: u64,
    /// Number of rounds that improved the best layout.
    pub improvements: usize,
    /// Best criterion value after each round.
    pub history: Vec<f64>,
}

/// A layout-building problem driven by [`GreedyRunner`].
pub trait GreedyProblem {
    /// Deep copy of the layout state.
    type Snapshot: Clone + Debug;

    /// Resets the layout to the empty plate.
    fn reset(&mut self);

    /// Places pieces onto the current layout until nothing fits or the
    /// deadline passes. Returns the number of pieces placed by this call.
    fn construct(&mut self, rng: &mut StdRng) -> usize;

    /// Removes part of the current layout.
    fn destroy(&mut self, rng: &mut StdRng);

    /// Total area of the current layout.
    fn placed_area(&self) -> f64;

    /// Rightmost extent of the current layout (+inf when empty).
    fn extent(&self) -> f64;

    /// Pieces in the current layout.
    fn placed_count(&self) -> usize;

    /// Copies the current layout.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replaces the current layout.
    fn restore(&mut self, snapshot: Self::Snapshot);

    /// The run's wall-clock budget.
    fn deadline(&self) -> &Deadline;
}

/// Book-keeping shared by the three drivers.
struct Tracker<S> {
    criterion: Criterion,
    best: Option<(f64, S)>,
    initial_area: Option<f64>,
    improvements: usize,
    history: Vec<f64>,
}

impl<S: Clone> Tracker<S> {
    fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            best: None,
            initial_area: None,
            improvements: 0,
            history: Vec::new(),
        }
    }

    /// Evaluates the current layout and snapshots it if it is the best so far.
    fn observe<P>(&mut self, problem: &P, round: usize) -> GreedyProgress
    where
        P: GreedyProblem<Snapshot = S> + ?Sized,
    {
        let value = self.criterion.value(problem);
        self.initial_area.get_or_insert_with(|| problem.placed_area());

        let improved = match &self.best {
            None => true,
            Some((best, _)) => self.criterion.improves(value, *best),
        };
        if improved {
            self.best = Some((value, problem.snapshot()));
            self.improvements += 1;
        }

        let best_value = self.best.as_ref().map_or(value, |(v, _)| *v);
        self.history.push(best_value);

        GreedyProgress {
            round,
            best_value,
            current_value: value,
            placed_count: problem.placed_count(),
            placed_area: problem.placed_area(),
            improved,
            elapsed_ms: problem.deadline().elapsed_ms(),
        }
    }

    fn finish<P>(self, problem: &mut P, rounds: usize) -> GreedyResult
    where
        P: GreedyProblem<Snapshot = S> + ?Sized,
    {
        let best_value = match self.best {
            Some((value, snapshot)) => {
                problem.restore(snapshot);
                value
            }
            None => self.criterion.value(problem),
        };

        GreedyResult {
            best_value,
            initial_area: self.initial_area.unwrap_or(0.0),
            rounds,
            elapsed_ms: problem.deadline().elapsed_ms(),
            improvements: self.improvements,
            history: self.history,
        }
    }
}

/// Runs the greedy meta-heuristics.
pub struct GreedyRunner {
    config: GreedyConfig,
}

impl GreedyRunner {
    /// Create a new runner with the given configuration.
    pub fn new(config: GreedyConfig) -> Self {
        Self { config }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn round_cap_reached(&self, rounds: usize) -> bool {
        self.config.max_rounds > 0 && rounds >= self.config.max_rounds
    }

    /// One construction from the empty plate.
    pub fn run_single<P, F>(&self, problem: &mut P, mut progress_callback: F) -> GreedyResult
    where
        P: GreedyProblem,
        F: FnMut(&GreedyProgress),
    {
        let mut rng = self.rng();
        let mut tracker = Tracker::new(self.config.criterion);

        problem.reset();
        problem.construct(&mut rng);
        progress_callback(&tracker.observe(problem, 0));

        tracker.finish(problem, 1)
    }

    /// Restarts from the empty plate until the deadline, keeping the best layout.
    pub fn run_restarts<P, F>(&self, problem: &mut P, mut progress_callback: F) -> GreedyResult
    where
        P: GreedyProblem,
        F: FnMut(&GreedyProgress),
    {
        let mut rng = self.rng();
        let mut tracker = Tracker::new(self.config.criterion);
        let mut rounds = 0;

        loop {
            problem.reset();
            let placed = problem.construct(&mut rng);
            let progress = tracker.observe(problem, rounds);
            log::info!(
                "restart {}: placed {}, value {:.6}, best {:.6}",
                rounds,
                placed,
                progress.current_value,
                progress.best_value
            );
            progress_callback(&progress);
            rounds += 1;

            if problem.deadline().expired() || self.round_cap_reached(rounds) {
                break;
            }
        }

        tracker.finish(problem, rounds)
    }

    /// Alternates construction and destruction on the current layout until the
    /// deadline, then restores the best layout seen.
    pub fn run_iterated<P, F>(&self, problem: &mut P, mut progress_callback: F) -> GreedyResult
    where
        P: GreedyProblem,
        F: FnMut(&GreedyProgress),
    {
        let mut rng = self.rng();
        let mut tracker = Tracker::new(self.config.criterion);
        let mut rounds = 0;

        problem.reset();
        loop {
            let placed = problem.construct(&mut rng);
            let progress = tracker.observe(problem, rounds);
            log::info!(
                "round {}: placed {}, layout {} pieces, value {:.6}, best {:.6}",
                rounds,
                placed,
                progress.placed_count,
                progress.current_value,
                progress.best_value
            );
            progress_callback(&progress);
            rounds += 1;

            if problem.deadline().expired() || self.round_cap_reached(rounds) {
                break;
            }
            problem.destroy(&mut rng);
        }

        tracker.finish(problem, rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_greedy_config_builder() {
        let config = GreedyConfig::new()
            .with_criterion(Criterion::Extent)
            .with_seed(42)
            .with_max_rounds(10);

        assert_eq!(config.criterion, Criterion::Extent);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_rounds, 10);
    }

    #[test]
    fn test_criterion_improves() {
        assert!(Criterion::PlacedArea.improves(2.0, 1.0));
        assert!(!Criterion::PlacedArea.improves(1.0, 1.0));
        assert!(Criterion::Extent.improves(1.0, 2.0));
        assert!(Criterion::Extent.improves(5.0, f64::INFINITY));
        assert!(!Criterion::Extent.improves(f64::INFINITY, f64::INFINITY));
    }

    // Mock problem: each construction adds random unit "pieces" up to a cap,
    // destroy removes a random number of them.
    struct MockProblem {
        items: Vec<f64>,
        capacity: usize,
        resets: usize,
        destroys: usize,
        deadline: Deadline,
    }

    impl MockProblem {
        fn new(capacity: usize) -> Self {
            Self {
                items: Vec::new(),
                capacity,
                resets: 0,
                destroys: 0,
                deadline: Deadline::unlimited(),
            }
        }
    }

    impl GreedyProblem for MockProblem {
        type Snapshot = Vec<f64>;

        fn reset(&mut self) {
            self.items.clear();
            self.resets += 1;
        }

        fn construct(&mut self, rng: &mut StdRng) -> usize {
            let target = rng.gen_range(1..=self.capacity);
            let mut placed = 0;
            while self.items.len() < target {
                self.items.push(rng.gen_range(0.5..1.5));
                placed += 1;
            }
            placed
        }

        fn destroy(&mut self, rng: &mut StdRng) {
            let keep = rng.gen_range(0..=self.items.len());
            self.items.truncate(keep);
            self.destroys += 1;
        }

        fn placed_area(&self) -> f64 {
            self.items.iter().sum()
        }

        fn extent(&self) -> f64 {
            if self.items.is_empty() {
                f64::INFINITY
            } else {
                self.items.len() as f64
            }
        }

        fn placed_count(&self) -> usize {
            self.items.len()
        }

        fn snapshot(&self) -> Vec<f64> {
            self.items.clone()
        }

        fn restore(&mut self, snapshot: Vec<f64>) {
            self.items = snapshot;
        }

        fn deadline(&self) -> &Deadline {
            &self.deadline
        }
    }

    #[test]
    fn test_run_single() {
        let mut problem = MockProblem::new(5);
        let runner = GreedyRunner::new(GreedyConfig::new().with_seed(1));
        let mut calls = 0;
        let result = runner.run_single(&mut problem, |_| calls += 1);

        assert_eq!(result.rounds, 1);
        assert_eq!(calls, 1);
        assert_eq!(problem.resets, 1);
        assert!((result.initial_area - problem.placed_area()).abs() < 1e-12);
    }

    #[test]
    fn test_run_restarts_keeps_best() {
        let mut problem = MockProblem::new(8);
        let runner = GreedyRunner::new(GreedyConfig::new().with_seed(7).with_max_rounds(20));
        let mut seen = Vec::new();
        let result = runner.run_restarts(&mut problem, |p| seen.push(p.current_value));

        assert_eq!(result.rounds, 20);
        assert_eq!(problem.resets, 20);
        let best_seen = seen.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((result.best_value - best_seen).abs() < 1e-12);
        // The problem ends holding the best layout
        assert!((problem.placed_area() - best_seen).abs() < 1e-12);
    }

    #[test]
    fn test_run_iterated_history_monotone() {
        let mut problem = MockProblem::new(10);
        let runner = GreedyRunner::new(GreedyConfig::new().with_seed(3).with_max_rounds(30));
        let result = runner.run_iterated(&mut problem, |_| {});

        assert_eq!(result.rounds, 30);
        assert_eq!(problem.resets, 1);
        assert_eq!(problem.destroys, 29);
        assert_eq!(result.history.len(), 30);
        for pair in result.history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(result.improvements >= 1);
    }

    #[test]
    fn test_run_iterated_extent_monotone() {
        let mut problem = MockProblem::new(10);
        let config = GreedyConfig::new()
            .with_seed(11)
            .with_max_rounds(25)
            .with_criterion(Criterion::Extent);
        let result = GreedyRunner::new(config).run_iterated(&mut problem, |_| {});

        for pair in result.history.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert!((problem.extent() - result.best_value).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut problem = MockProblem::new(10);
            let runner = GreedyRunner::new(GreedyConfig::new().with_seed(99).with_max_rounds(15));
            runner.run_iterated(&mut problem, |_| {}).history
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_run_restarts_time_limit() {
        let mut problem = MockProblem::new(3);
        problem.deadline = Deadline::start(30);
        let runner = GreedyRunner::new(GreedyConfig::new().with_seed(5));
        let result = runner.run_restarts(&mut problem, |_| {});

        assert!(result.rounds >= 1);
        assert!(result.elapsed_ms >= 30);
    }
}
