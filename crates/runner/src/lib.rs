//! # ignest runner
//!
//! Command-line front end for the ignest nesting engine: reads an instance
//! file, runs the configured strategy, writes the layout and reports run
//! statistics.

pub mod instance;
pub mod output;
pub mod report;

pub use instance::{Instance, InstanceError, InstanceFormat, RawInstance, RawPiece};
pub use output::{save_layout, write_layout};
pub use report::Report;

use ignest_d2::{Config, Nester2D, ProgressInfo, Result, SolveResult, Solver};

/// Solves a loaded instance, logging every construction round.
pub fn solve_instance(instance: &Instance, config: &Config) -> Result<SolveResult> {
    let nester = Nester2D::new(config.clone());
    nester.solve_with_progress(
        &instance.pieces,
        &instance.plate,
        Box::new(|info: ProgressInfo| {
            if info.running {
                log::info!(
                    "{} #{}: {} of {} placed, utilization {:.2} %, best value {:.4}",
                    info.phase,
                    info.iteration,
                    info.items_placed,
                    info.total_items,
                    info.utilization * 100.0,
                    info.best_value
                );
            }
        }),
    )
}
