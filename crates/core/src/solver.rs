//! Solver traits and configuration.

use crate::error::Error;
use crate::geometry::{Boundary, Geometry};
use crate::result::SolveResult;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Meta-heuristic driving the construction heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// One greedy construction pass.
    #[default]
    Constructive,
    /// Randomized greedy construction restarted from scratch until the deadline.
    AlphaGreedy,
    /// Construct, destroy a connected region, reconstruct, until the deadline.
    IteratedGreedy,
    /// Random piece, random angle, first feasible alignment.
    RandomPlacement,
}

impl Strategy {
    /// Picks the strategy the way the command line does: a positive destroy
    /// fraction selects iterated greedy, otherwise a positive alpha selects
    /// randomized restarts, otherwise a single construction.
    pub fn from_parameters(alpha: f64, deconstruct_fraction: f64, random: bool) -> Self {
        if random {
            Strategy::RandomPlacement
        } else if deconstruct_fraction > 0.0 {
            Strategy::IteratedGreedy
        } else if alpha > 0.0 {
            Strategy::AlphaGreedy
        } else {
            Strategy::Constructive
        }
    }

    /// Returns true for strategies that only stop on the deadline.
    pub fn needs_deadline(&self) -> bool {
        matches!(self, Strategy::AlphaGreedy | Strategy::IteratedGreedy)
    }

    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Constructive => "constructive",
            Strategy::AlphaGreedy => "alpha-greedy",
            Strategy::IteratedGreedy => "iterated-greedy",
            Strategy::RandomPlacement => "random",
        }
    }
}

/// Optimization goals composing the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectiveGoals {
    /// Minimize the layout extent along x.
    pub length: bool,
    /// Minimize the layout extent along y.
    pub width: bool,
    /// Reward low growth of the convex hull around the fixed pieces.
    pub compaction: bool,
}

impl Default for ObjectiveGoals {
    fn default() -> Self {
        Self {
            length: true,
            width: true,
            compaction: true,
        }
    }
}

impl ObjectiveGoals {
    /// No goal selected.
    pub fn none() -> Self {
        Self {
            length: false,
            width: false,
            compaction: false,
        }
    }

    /// Parses a `,` or `|` separated list such as `"length,width,compaction"`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut goals = Self::none();
        for token in s.split([',', '|']).map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "length" => goals.length = true,
                "width" => goals.width = true,
                "compaction" => goals.compaction = true,
                other => {
                    return Err(Error::InvalidConfig(format!(
                        "unknown optimization goal '{}'",
                        other
                    )))
                }
            }
        }
        if !goals.any() {
            return Err(Error::InvalidConfig(
                "at least one optimization goal is required".to_string(),
            ));
        }
        Ok(goals)
    }

    /// Returns true if at least one goal is selected.
    pub fn any(&self) -> bool {
        self.length || self.width || self.compaction
    }
}

impl std::fmt::Display for ObjectiveGoals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.length {
            parts.push("length");
        }
        if self.width {
            parts.push("width");
        }
        if self.compaction {
            parts.push("compaction");
        }
        write!(f, "{}", parts.join(","))
    }
}

/// Smallest accepted non-zero rotation step in degrees (36000 angles).
pub const MIN_ROTATION_STEP_DEG: f64 = 0.01;

/// Run configuration shared by every strategy.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Optimization strategy.
    pub strategy: Strategy,

    /// Goals composing the placement objective.
    pub objective: ObjectiveGoals,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Random seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Maximum construction rounds for the looping strategies (0 = until the deadline).
    pub max_rounds: usize,

    /// Quality band for randomized selection (0.0 - 1.0).
    pub alpha: f64,

    /// Number of floating pieces considered per placement step (`m`).
    pub lookahead: usize,

    /// Fraction of the plate area removed per destroy step (0.0 - 1.0).
    pub deconstruct_fraction: f64,

    /// Global rotation step in degrees (0 = use per-piece angles).
    pub rotation_step_deg: f64,

    /// Enables bounding-box culling in the feasibility test.
    pub use_bounding_boxes: bool,

    /// Points inserted on every plate edge.
    pub plate_super_sample: usize,

    /// Points inserted on every piece edge.
    pub piece_super_sample: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::IteratedGreedy,
            objective: ObjectiveGoals::default(),
            time_limit_ms: 600_000,
            seed: None,
            max_rounds: 0,
            alpha: 0.01,
            lookahead: 1,
            deconstruct_fraction: 0.4,
            rotation_step_deg: 0.0,
            use_bounding_boxes: true,
            plate_super_sample: 5,
            piece_super_sample: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the optimization strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the objective goals.
    pub fn with_objective(mut self, objective: ObjectiveGoals) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Caps the number of construction rounds.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Sets the randomized selection band.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the lookahead window.
    pub fn with_lookahead(mut self, m: usize) -> Self {
        self.lookahead = m;
        self
    }

    /// Sets the destroy area fraction.
    pub fn with_deconstruct_fraction(mut self, fraction: f64) -> Self {
        self.deconstruct_fraction = fraction;
        self
    }

    /// Sets the global rotation step in degrees.
    pub fn with_rotation_step(mut self, deg: f64) -> Self {
        self.rotation_step_deg = deg;
        self
    }

    /// Enables or disables bounding-box culling.
    pub fn with_bounding_boxes(mut self, enabled: bool) -> Self {
        self.use_bounding_boxes = enabled;
        self
    }

    /// Sets plate and piece super-sampling.
    pub fn with_super_sample(mut self, plate: usize, piece: usize) -> Self {
        self.plate_super_sample = plate;
        self.piece_super_sample = piece;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.objective.any() {
            return Err(Error::InvalidConfig(
                "at least one optimization goal is required".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha must lie in [0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.deconstruct_fraction) {
            return Err(Error::InvalidConfig(format!(
                "deconstruct fraction must lie in [0, 1], got {}",
                self.deconstruct_fraction
            )));
        }
        if self.lookahead == 0 {
            return Err(Error::InvalidConfig(
                "lookahead must be at least 1".to_string(),
            ));
        }
        if !self.rotation_step_deg.is_finite() || self.rotation_step_deg < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "rotation step must be non-negative, got {}",
                self.rotation_step_deg
            )));
        }
        if self.rotation_step_deg > 0.0 && self.rotation_step_deg < MIN_ROTATION_STEP_DEG {
            return Err(Error::InvalidConfig(format!(
                "rotation step must be 0 or at least {} degrees, got {}",
                MIN_ROTATION_STEP_DEG, self.rotation_step_deg
            )));
        }
        if self.time_limit_ms == 0 && self.max_rounds == 0 && self.strategy.needs_deadline() {
            return Err(Error::InvalidConfig(format!(
                "strategy '{}' requires a time limit or a round cap",
                self.strategy.name()
            )));
        }
        Ok(())
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during solving.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Current round number.
    pub iteration: u32,
    /// Current best utilization (0.0 to 1.0).
    pub utilization: f64,
    /// Current best criterion value (area or extent).
    pub best_value: f64,
    /// Number of pieces placed in the current layout.
    pub items_placed: usize,
    /// Total number of piece instances requested.
    pub total_items: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Current phase description.
    pub phase: String,
    /// Whether the solver is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress info with default values.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the round number.
    pub fn with_iteration(mut self, current: u32) -> Self {
        self.iteration = current;
        self
    }

    /// Sets the utilization.
    pub fn with_utilization(mut self, utilization: f64) -> Self {
        self.utilization = utilization;
        self
    }

    /// Sets the best criterion value.
    pub fn with_best_value(mut self, value: f64) -> Self {
        self.best_value = value;
        self
    }

    /// Sets the items placed info.
    pub fn with_items(mut self, placed: usize, total: usize) -> Self {
        self.items_placed = placed;
        self.total_items = total;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the solver as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }
}

/// Trait for nesting solvers.
pub trait Solver {
    /// The piece type this solver handles.
    type Geometry: Geometry;
    /// The plate type this solver handles.
    type Boundary: Boundary;

    /// Solves the nesting problem.
    fn solve(&self, geometries: &[Self::Geometry], boundary: &Self::Boundary)
        -> Result<SolveResult>;

    /// Solves with a progress callback.
    fn solve_with_progress(
        &self,
        geometries: &[Self::Geometry],
        boundary: &Self::Boundary,
        callback: ProgressCallback,
    ) -> Result<SolveResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_parameters() {
        assert_eq!(
            Strategy::from_parameters(0.01, 0.4, false),
            Strategy::IteratedGreedy
        );
        assert_eq!(
            Strategy::from_parameters(0.01, 0.0, false),
            Strategy::AlphaGreedy
        );
        assert_eq!(
            Strategy::from_parameters(0.0, 0.0, false),
            Strategy::Constructive
        );
        assert_eq!(
            Strategy::from_parameters(0.5, 0.5, true),
            Strategy::RandomPlacement
        );
    }

    #[test]
    fn test_objective_parse() {
        let goals = ObjectiveGoals::parse("length,width,compaction").unwrap();
        assert_eq!(goals, ObjectiveGoals::default());

        let goals = ObjectiveGoals::parse("width|compaction").unwrap();
        assert!(!goals.length);
        assert!(goals.width);
        assert!(goals.compaction);
        assert_eq!(goals.to_string(), "width,compaction");

        assert!(ObjectiveGoals::parse("").is_err());
        assert!(ObjectiveGoals::parse("length,height").is_err());
    }

    #[test]
    fn test_config_defaults_validate() {
        let config = Config::default();
        assert_eq!(config.lookahead, 1);
        assert_eq!(config.plate_super_sample, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_ranges() {
        assert!(Config::new().with_alpha(1.5).validate().is_err());
        assert!(Config::new().with_deconstruct_fraction(-0.1).validate().is_err());
        assert!(Config::new().with_lookahead(0).validate().is_err());
        assert!(Config::new().with_rotation_step(-90.0).validate().is_err());
        assert!(Config::new().with_rotation_step(1e-12).validate().is_err());
        assert!(Config::new().with_rotation_step(f64::NAN).validate().is_err());
        assert!(Config::new().with_rotation_step(MIN_ROTATION_STEP_DEG).validate().is_ok());
        assert!(Config::new()
            .with_objective(ObjectiveGoals::none())
            .validate()
            .is_err());
    }

    #[test]
    fn test_unlimited_time_needs_terminating_strategy() {
        let config = Config::new().with_time_limit(0);
        assert!(config.clone().with_strategy(Strategy::IteratedGreedy).validate().is_err());
        assert!(config.clone().with_strategy(Strategy::AlphaGreedy).validate().is_err());
        assert!(config
            .clone()
            .with_strategy(Strategy::AlphaGreedy)
            .with_max_rounds(5)
            .validate()
            .is_ok());
        assert!(config.clone().with_strategy(Strategy::Constructive).validate().is_ok());
        assert!(config.with_strategy(Strategy::RandomPlacement).validate().is_ok());
    }

    #[test]
    fn test_progress_info_builder() {
        let info = ProgressInfo::new()
            .with_iteration(3)
            .with_items(4, 10)
            .with_phase("iterated-greedy")
            .finished();
        assert_eq!(info.iteration, 3);
        assert_eq!(info.items_placed, 4);
        assert!(!info.running);
    }
}
