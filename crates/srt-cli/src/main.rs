use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use srt_algo::{mean_stddev, mean_variance, RouteConfig};
use srt_core::Travel;
use srt_io::{generate_connected, RouteInstance};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod cli;
use cli::{Cli, Commands, Method};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match cli.command {
        Commands::Generate { nodes, seed, out } => cmd_generate(nodes, seed, &out),
        Commands::Solve {
            instance,
            origin,
            destination,
            gamma,
            method,
            max_depth,
            epsilon,
            verbose_iterations,
            json,
        } => cmd_solve(
            &instance,
            origin,
            destination,
            gamma,
            method,
            max_depth,
            epsilon,
            verbose_iterations,
            json,
        ),
        Commands::Inspect { instance } => cmd_inspect(&instance),
    };

    if let Err(e) = result {
        error!("command failed: {e:#}");
        std::process::exit(1);
    }
}

fn cmd_generate(nodes: usize, seed: Option<u64>, out: &Path) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let graph = generate_connected(nodes, &mut rng)?;
    RouteInstance::from_graph(&graph).write_json(out)?;
    info!(
        "Generated instance with {} nodes and {} links",
        graph.node_count(),
        graph.link_count()
    );
    println!(
        "Wrote {} ({} nodes, {} links)",
        out.display(),
        graph.node_count(),
        graph.link_count()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_solve(
    instance: &Path,
    origin: usize,
    destination: usize,
    gamma: f64,
    method: Method,
    max_depth: usize,
    epsilon: f64,
    verbose_iterations: bool,
    json: bool,
) -> anyhow::Result<()> {
    let graph = RouteInstance::read_json(instance)?.to_graph()?;

    let origin = graph
        .get_node(origin)
        .with_context(|| format!("origin node {origin} is not in the instance"))?;
    let destination = graph
        .get_node(destination)
        .with_context(|| format!("destination node {destination} is not in the instance"))?;
    let mut travel = Travel::new(origin, destination).with_gamma(gamma);

    let config = RouteConfig {
        epsilon,
        max_depth,
        log_iterations: verbose_iterations,
        ..RouteConfig::default()
    };

    info!(
        "Solving {} -> {} with {:?} (gamma {})",
        origin.value(),
        destination.value(),
        method,
        gamma
    );
    let mut solution = match method {
        Method::MeanVariance => mean_variance::solve(&graph, &mut travel, &config)?,
        Method::MeanStddev => mean_stddev::solve(&graph, &mut travel, &config)?,
    };
    solution.peak_memory_mb = peak_rss_mb();

    if json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }

    let labels: Vec<String> = solution
        .path_labels()
        .iter()
        .map(|l| l.to_string())
        .collect();
    println!("Path (links)  : {}", labels.join(" -> "));
    println!("Objective     : {:.6}", solution.objective_value);
    println!(
        "Iterations    : {} ({} oracle calls)",
        solution.iterations, solution.oracle_calls
    );
    println!("Solve time    : {} ms", solution.solve_time_ms);
    if let Some(mb) = solution.peak_memory_mb {
        println!("Peak RSS      : {mb:.1} MiB");
    }
    if let Some((lb, ub)) = solution.final_bounds {
        println!("Final bounds  : [{lb:.6}, {ub:.6}]");
    }
    if solution.diagnostics.has_issues() {
        eprint!("{}", solution.diagnostics);
    }
    Ok(())
}

fn cmd_inspect(instance: &Path) -> anyhow::Result<()> {
    let graph = RouteInstance::read_json(instance)?.to_graph()?;
    println!("{}", graph.stats());
    Ok(())
}

/// Peak resident set size of this process in MiB.
///
/// `ru_maxrss` is reported in KiB on Linux and in bytes on macOS.
fn peak_rss_mb() -> Option<f64> {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    #[cfg(target_os = "macos")]
    let mb = usage.ru_maxrss as f64 / (1024.0 * 1024.0);
    #[cfg(not(target_os = "macos"))]
    let mb = usage.ru_maxrss as f64 / 1024.0;
    Some(mb)
}
