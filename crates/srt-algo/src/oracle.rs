//! LP oracle boundary.
//!
//! The oracle is the only external collaborator of the solvers: it receives
//! one immutable [`LpRequest`] (variables, constraints, linear objective) and
//! returns an immutable [`LpOutcome`] or an error. No solver state survives
//! between calls, so the mean-variance and bisection solvers can never leak
//! model mutations into each other.
//!
//! Backed by `good_lp` with the pure-Rust Clarabel solver.

use good_lp::solvers::clarabel::clarabel;
use good_lp::{Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel};
use srt_core::{SrtError, SrtResult};

use crate::relaxation::OmegaVars;

/// One complete linear program: consumed by [`solve`].
pub struct LpRequest {
    pub variables: ProblemVariables,
    pub omega: OmegaVars,
    pub constraints: Vec<Constraint>,
    /// Linear objective, minimized
    pub objective: Expression,
}

/// Optimal assignment of the omega variables, row-major per
/// [`OmegaVars::all`]. Values are floating point; 0/1 interpretation is
/// tolerance-based downstream.
pub struct LpOutcome {
    pub omega_values: Vec<f64>,
}

/// Solve one linear program. Infeasibility is reported as
/// [`SrtError::Infeasible`] (without bounds; the bisection solver attaches
/// its current interval), any other solver failure as [`SrtError::Solver`].
pub fn solve(request: LpRequest) -> SrtResult<LpOutcome> {
    let LpRequest {
        variables,
        omega,
        constraints,
        objective,
    } = request;

    let mut model = variables.minimise(objective).using(clarabel);
    for c in constraints {
        model = model.with(c);
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Err(SrtError::Infeasible { lb: None, ub: None })
        }
        Err(e) => return Err(SrtError::Solver(format!("LP solver failed: {:?}", e))),
    };

    let omega_values = omega.all().iter().map(|&v| solution.value(v)).collect();
    Ok(LpOutcome { omega_values })
}
