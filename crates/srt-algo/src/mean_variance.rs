//! Mean-variance formulation: a single LP.
//!
//! Minimizes `sum mu(a) omega(a,a) + sum phi(a,b) omega(a,b)` over the path
//! relaxation. The variance term is already linear in omega, so one oracle
//! call suffices; `gamma` plays no role here. Infeasibility is fatal for the
//! request and propagated, never retried.

use tracing::debug;
use web_time::Instant;

use srt_core::{Graph, HyperlinkIndex, RouteSolution, SrtResult, Travel};

use crate::extract::extract_path;
use crate::oracle::{self, LpRequest};
use crate::relaxation::{build_objective, mean_value, quadratic_value, Relaxation};
use crate::types::RouteConfig;

/// Solve the mean-variance problem for one travel and record the result on
/// the travel.
pub fn solve(graph: &Graph, travel: &mut Travel, config: &RouteConfig) -> SrtResult<RouteSolution> {
    let start = Instant::now();

    let phi = HyperlinkIndex::build(graph)?;
    let Relaxation {
        variables,
        omega,
        constraints,
    } = Relaxation::build(graph, travel);
    let objective = build_objective(graph, &phi, &omega, 1.0);

    let outcome = oracle::solve(LpRequest {
        variables,
        omega,
        constraints,
        objective,
    })?;

    let objective_value =
        mean_value(graph, &outcome.omega_values) + quadratic_value(&phi, &outcome.omega_values);
    let (path, diagnostics) = extract_path(
        graph,
        travel,
        &outcome.omega_values,
        config.integrality_tolerance,
    );

    debug!(
        objective_value,
        path_len = path.len(),
        warnings = diagnostics.warning_count(),
        "mean-variance solve finished"
    );

    let solution = RouteSolution {
        path,
        objective_value,
        iterations: 1,
        oracle_calls: 1,
        solve_time_ms: start.elapsed().as_millis(),
        peak_memory_mb: None,
        final_bounds: None,
        diagnostics,
    };
    travel.solution = Some(solution.clone());
    Ok(solution)
}
