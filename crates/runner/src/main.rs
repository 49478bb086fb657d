//! ignest command-line runner.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ignest_d2::{Config, ObjectiveGoals, Strategy};
use ignest_runner::{save_layout, solve_instance, Instance, Report};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "ignest")]
#[command(about = "Irregular 2D nesting by greedy vertex alignment")]
#[command(version)]
struct Cli {
    /// Instance file (.xml, .json, or whitespace separated text)
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Layout output file
    #[arg(long, default_value = "out.txt")]
    out: PathBuf,

    /// Random seed, 0 draws one from entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Lookahead: floating entries evaluated per greedy step
    #[arg(long, default_value_t = 1)]
    m: usize,

    /// Comma separated goals among length, width and compaction
    #[arg(long, default_value = "length,width,compaction")]
    optimize: String,

    /// Rotation sweep step in degrees applied to every piece, at least 0.01;
    /// 0 keeps the angles of the instance
    #[arg(long, default_value_t = 0.0)]
    phi: f64,

    /// Points inserted on every piece edge
    #[arg(long, default_value_t = 0)]
    supersample: usize,

    /// Points inserted on every plate edge
    #[arg(long, default_value_t = 5)]
    platesupersample: usize,

    /// Keep the quantities of the instance instead of the area bound
    #[arg(long)]
    finitepolygons: bool,

    /// Disable the bounding-box pre-test
    #[arg(long)]
    nobb: bool,

    /// Time limit in seconds, 0 for none
    #[arg(long, default_value_t = 600.0)]
    time: f64,

    /// Round cap for the restart strategies, 0 for none
    #[arg(long, default_value_t = 0)]
    rounds: usize,

    /// Fraction of the plate area destroyed per iterated-greedy round, 0
    /// disables iterated greedy
    #[arg(long, default_value_t = 0.4)]
    deconstruct: f64,

    /// Candidate band width of the randomized construction
    #[arg(long, default_value_t = 0.01)]
    alpha: f64,

    /// Random-placement baseline
    #[arg(long)]
    random: bool,

    /// Print only the negated coverage percentage
    #[arg(long)]
    silent: bool,

    /// Also write the statistics as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        if !(self.time >= 0.0 && self.time.is_finite()) {
            anyhow::bail!("--time must be a non-negative number of seconds");
        }
        let objective = ObjectiveGoals::parse(&self.optimize)
            .with_context(|| format!("invalid --optimize '{}'", self.optimize))?;
        let strategy = Strategy::from_parameters(self.alpha, self.deconstruct, self.random);

        let mut config = Config::new()
            .with_strategy(strategy)
            .with_objective(objective)
            .with_time_limit((self.time * 1000.0).round() as u64)
            .with_max_rounds(self.rounds)
            .with_alpha(self.alpha)
            .with_lookahead(self.m)
            .with_deconstruct_fraction(self.deconstruct)
            .with_rotation_step(self.phi)
            .with_bounding_boxes(!self.nobb)
            .with_super_sample(self.platesupersample, self.supersample);
        if self.seed != 0 {
            config = config.with_seed(self.seed);
        }
        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> LevelFilter {
        if self.silent {
            LevelFilter::WARN
        } else {
            match self.verbose {
                0 => LevelFilter::INFO,
                1 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(cli.log_level())
        .init();

    let config = cli.config()?;
    let instance = Instance::load(&cli.input, cli.finitepolygons)
        .with_context(|| format!("failed to read instance {}", cli.input.display()))?;
    log::info!(
        "instance '{}': {} piece types, {} instances",
        instance.name,
        instance.pieces.len(),
        instance.total_quantity()
    );

    let result = solve_instance(&instance, &config).context("nesting failed")?;

    save_layout(&cli.out, &instance.plate, &result)
        .with_context(|| format!("failed to write layout {}", cli.out.display()))?;

    let report = Report::new(&instance, &config, cli.seed, &result);
    if let Some(path) = &cli.json {
        report
            .save_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if cli.silent {
        println!("{}", report.silent_value());
    } else {
        report.write_statistics(std::io::stdout().lock())?;
    }
    Ok(())
}
