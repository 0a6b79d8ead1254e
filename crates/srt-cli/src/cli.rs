use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Risk-averse routing over stochastic networks", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a random connected instance
    Generate {
        /// Number of nodes
        #[arg(long)]
        nodes: usize,
        /// RNG seed (omit for a fresh seed)
        #[arg(long)]
        seed: Option<u64>,
        /// Output instance file (JSON)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
    /// Solve a routing request against an instance file
    Solve {
        /// Path to the instance file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
        /// Origin node label (1-based)
        #[arg(long)]
        origin: usize,
        /// Destination node label (1-based)
        #[arg(long)]
        destination: usize,
        /// Risk-aversion coefficient
        #[arg(long, default_value_t = 1.0)]
        gamma: f64,
        /// Objective formulation
        #[arg(long, value_enum, default_value_t = Method::MeanStddev)]
        method: Method,
        /// Maximum bisection depth
        #[arg(long, default_value_t = 100)]
        max_depth: usize,
        /// Convergence tolerance on the variance bracket
        #[arg(long, default_value_t = 1e-6)]
        epsilon: f64,
        /// Log every bisection iteration
        #[arg(long)]
        verbose_iterations: bool,
        /// Print the solution as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Print instance statistics
    Inspect {
        /// Path to the instance file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Minimize mean + gamma * variance (one LP solve)
    MeanVariance,
    /// Minimize mean + gamma * standard deviation (bisection over LP solves)
    MeanStddev,
}
