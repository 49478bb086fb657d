//! Run statistics.
//!
//! A [`Report`] collects the run parameters, instance figures and solution
//! figures of one run. It prints as `--statistic <key> <value>` lines and
//! serializes to JSON.

use std::io::Write;
use std::path::Path;

use ignest_d2::{Config, Geometry, SolveResult, SolveSummary};
use serde::Serialize;

use crate::instance::Instance;

/// Statistics of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub instance: String,
    pub alpha: f64,
    pub m: usize,
    pub phi: f64,
    pub deconstruct: f64,
    pub optimize: String,
    pub seed: u64,

    pub num_polys: usize,
    pub total_vertices: usize,
    pub min_vertices: usize,
    pub max_vertices: usize,
    pub avg_vertices: f64,

    pub plate_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub avg_area: f64,

    pub total_length: f64,
    pub total_width: f64,
    pub final_polygons_area: f64,
    /// Percentage of the plate covered by the final layout.
    pub value: f64,
    /// Percentage covered by the first complete layout.
    pub v0: f64,

    pub bb_tests: u64,
    pub bb_tests_succeeded: u64,
    pub feasibility_tests: u64,
    /// Wall time in seconds.
    pub time: f64,
    pub iterations: u64,

    pub summary: SolveSummary,
}

impl Report {
    /// Builds the report. `seed` is the seed given on the command line, 0
    /// when it was drawn from entropy.
    pub fn new(instance: &Instance, config: &Config, seed: u64, result: &SolveResult) -> Self {
        let vertex_counts: Vec<usize> = instance
            .pieces
            .iter()
            .map(|p| p.super_sampled(config.piece_super_sample).polygon().len())
            .collect();
        let areas: Vec<f64> = instance.pieces.iter().map(|p| p.measure()).collect();
        let n = instance.pieces.len();
        let total_vertices: usize = vertex_counts.iter().sum();
        let total_area: f64 = areas.iter().sum();
        let (total_length, total_width) = result.layout_extent();

        Self {
            instance: instance.name.clone(),
            alpha: config.alpha,
            m: config.lookahead,
            phi: config.rotation_step_deg,
            deconstruct: config.deconstruct_fraction,
            optimize: config.objective.to_string(),
            seed,

            num_polys: n,
            total_vertices,
            min_vertices: vertex_counts.iter().copied().min().unwrap_or(0),
            max_vertices: vertex_counts.iter().copied().max().unwrap_or(0),
            avg_vertices: mean(total_vertices as f64, n),

            plate_area: result.boundary_area,
            min_area: if areas.is_empty() {
                0.0
            } else {
                areas.iter().copied().fold(f64::INFINITY, f64::min)
            },
            max_area: areas.iter().copied().fold(0.0, f64::max),
            avg_area: mean(total_area, n),

            total_length,
            total_width,
            final_polygons_area: result.placed_area,
            value: result.utilization * 100.0,
            v0: result.initial_utilization * 100.0,

            bb_tests: result.stats.bb_tests,
            bb_tests_succeeded: result.stats.bb_tests_succeeded,
            feasibility_tests: result.stats.feasibility_tests,
            time: result.computation_time_ms as f64 / 1000.0,
            iterations: result.iterations,

            summary: SolveSummary::from(result),
        }
    }

    /// Key/value pairs in print order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("instance", self.instance.clone()),
            ("alpha", self.alpha.to_string()),
            ("m", self.m.to_string()),
            ("phi", self.phi.to_string()),
            ("deconstruct", self.deconstruct.to_string()),
            ("optimize", self.optimize.clone()),
            ("seed", self.seed.to_string()),
            ("num-polys", self.num_polys.to_string()),
            ("total-vertices", self.total_vertices.to_string()),
            ("min-vertices", self.min_vertices.to_string()),
            ("max-vertices", self.max_vertices.to_string()),
            ("avg-vertices", self.avg_vertices.to_string()),
            ("plate-area", self.plate_area.to_string()),
            ("min-area", self.min_area.to_string()),
            ("max-area", self.max_area.to_string()),
            ("avg-area", self.avg_area.to_string()),
            ("total-length", self.total_length.to_string()),
            ("total-width", self.total_width.to_string()),
            ("final-polygons-area", self.final_polygons_area.to_string()),
            ("value", self.value.to_string()),
            ("v0", self.v0.to_string()),
            ("bb-tests", self.bb_tests.to_string()),
            ("bb-tests-succeeded", self.bb_tests_succeeded.to_string()),
            ("feasibility-tests", self.feasibility_tests.to_string()),
            ("time", self.time.to_string()),
            ("iterations", self.iterations.to_string()),
        ]
    }

    /// Prints every entry as a `--statistic <key> <value>` line.
    pub fn write_statistics<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for (key, value) in self.entries() {
            writeln!(out, "--statistic {} {}", key, value)?;
        }
        Ok(())
    }

    /// The single number printed in silent mode, the negated value.
    pub fn silent_value(&self) -> f64 {
        -self.value
    }

    /// Writes the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn mean(total: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}
