use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod analyze;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a telemetry byte stream from the arm plant model.
    Simulate(SimulateArgs),
    /// Recover frames from a byte stream and report alerts and statistics.
    Analyze(AnalyzeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Simulate(args) => simulate::run(args),
        Command::Analyze(args) => analyze::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of frames to generate (0 = unbounded).
    #[arg(long, short = 'n', default_value = "0")]
    pub count: u64,
    /// Frame rate in Hz.
    #[arg(long, short = 'f', default_value = "100")]
    pub rate: f32,
    /// Probability of a noise burst before each frame (0.0-1.0).
    #[arg(long, short = 'b', default_value = "0.05")]
    pub noise_probability: f64,
    /// Probability of an injected over-current per frame (0.0-1.0).
    #[arg(long, short = 'a', default_value = "0.02")]
    pub alert_probability: f64,
    /// Pace output in real time, sleeping to each tick boundary.
    #[arg(long, short = 'r')]
    pub realtime: bool,
    /// Seed the generator for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write frames to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file, or "-" for stdin.
    pub input: PathBuf,
    /// Current alert threshold in amperes.
    #[arg(long, short = 't', default_value = "5.0")]
    pub threshold: f32,
    /// Write the report to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
