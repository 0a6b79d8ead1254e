//! Mean-standard-deviation formulation: secant bisection over the variance
//! term.
//!
//! `E[T] + gamma * sqrt(Var[T])` is not linear in omega because of the square
//! root. The solver replaces `gamma * sqrt(eta)` with its secant line over a
//! bracket `[lb, ub]` on the quadratic term `eta`, solves the resulting LP,
//! reads off the realized `eta_star`, and descends into whichever half-bracket
//! yields the smaller surrogate value. The secant interpolates the true term
//! exactly at both endpoints, so the bracket midpoint converging is a fixed
//! point of the linearization.
//!
//! The loop carries `(lb, ub, depth)` explicitly — no recursion — and is
//! exposed as a steppable [`Bisection`] so each iteration can be driven and
//! inspected on its own. A collapsed interval (`ub == lb`) is immediate
//! convergence, not a division by zero; all tightness tests are
//! tolerance-based rather than exact float equality.

use tracing::{debug, info};
use web_time::Instant;

use srt_core::{Graph, HyperlinkIndex, RouteSolution, SrtError, SrtResult, Travel};

use crate::extract::extract_path;
use crate::oracle::{self, LpOutcome, LpRequest};
use crate::relaxation::{build_objective, mean_value, quadratic_value, Relaxation};
use crate::types::RouteConfig;

/// Interval widths below this are treated as already collapsed; the secant
/// denominator is never formed from them.
const DENOM_FLOOR: f64 = 1e-12;

/// Secant line of `gamma * sqrt(eta)` over `[lb, ub]`: returns `(slope,
/// intercept)`, exact at both endpoints. Collapsed intervals get a flat line
/// through `gamma * sqrt(lb)`.
fn secant_coefficients(gamma: f64, lb: f64, ub: f64) -> (f64, f64) {
    let width = ub - lb;
    if width.abs() <= DENOM_FLOOR {
        return (0.0, gamma * lb.max(0.0).sqrt());
    }
    let slope = gamma * (ub.sqrt() - lb.sqrt()) / width;
    let intercept = gamma * (lb.sqrt() * ub - ub.sqrt() * lb) / width;
    (slope, intercept)
}

/// Surrogate value function: the linearized objective evaluated at a fixed
/// assignment with the secant taken over `[x, y]`.
fn surrogate_value(mean_term: f64, gamma: f64, x: f64, y: f64, eta_star: f64) -> f64 {
    let (slope, intercept) = secant_coefficients(gamma, x, y);
    mean_term + slope * eta_star + intercept
}

/// Outcome of one [`Bisection::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// An LP was solved; the realized quadratic term is attached
    Solved { eta_star: f64 },
    /// The solver had already converged; no oracle call was made
    Converged,
}

/// Steppable bisection state for one travel request.
///
/// Each [`step`](Self::step) performs at most one oracle call. Once
/// [`converged`](Self::converged) is true, further steps return immediately.
pub struct Bisection<'a> {
    graph: &'a Graph,
    travel: &'a Travel,
    config: RouteConfig,
    phi: HyperlinkIndex,
    pub lb: f64,
    pub ub: f64,
    pub depth: usize,
    converged: bool,
    incumbent: Option<LpOutcome>,
    oracle_calls: usize,
}

impl<'a> Bisection<'a> {
    /// Initialize with the conservative bounds `lb = 0`,
    /// `ub = sum phi(a, b)` over all hyperlink pairs.
    ///
    /// A correlation table whose pairwise entries are individually valid can
    /// still make `sum phi` negative; the upper bound is clamped at 0 so the
    /// interval collapses and the square root never sees a negative argument.
    pub fn new(graph: &'a Graph, travel: &'a Travel, config: &RouteConfig) -> SrtResult<Self> {
        if !travel.gamma.is_finite() || travel.gamma < 0.0 {
            return Err(SrtError::Validation(format!(
                "risk-aversion weight gamma must be finite and >= 0, got {}",
                travel.gamma
            )));
        }
        let phi = HyperlinkIndex::build(graph)?;
        let ub = phi.total().max(0.0);
        Ok(Self {
            graph,
            travel,
            config: config.clone(),
            phi,
            lb: 0.0,
            ub,
            depth: 0,
            converged: false,
            incumbent: None,
            oracle_calls: 0,
        })
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }

    /// Solve the surrogate LP for the current bracket.
    fn solve_surrogate(&mut self, slope: f64) -> SrtResult<LpOutcome> {
        let Relaxation {
            variables,
            omega,
            constraints,
        } = Relaxation::build(self.graph, self.travel);
        let objective = build_objective(self.graph, &self.phi, &omega, slope);
        let outcome = oracle::solve(LpRequest {
            variables,
            omega,
            constraints,
            objective,
        })
        .map_err(|e| match e {
            SrtError::Infeasible { .. } => SrtError::Infeasible {
                lb: Some(self.lb),
                ub: Some(self.ub),
            },
            other => other,
        })?;
        self.oracle_calls += 1;
        Ok(outcome)
    }

    /// Perform one bisection iteration.
    ///
    /// An oracle failure aborts the solve; the state is not advanced past a
    /// failed solve and the error carries the current bounds.
    pub fn step(&mut self) -> SrtResult<Step> {
        if self.converged {
            return Ok(Step::Converged);
        }

        let gamma = self.travel.gamma;
        let collapsed = (self.ub - self.lb).abs() <= DENOM_FLOOR;
        if collapsed && self.incumbent.is_some() {
            self.converged = true;
            return Ok(Step::Converged);
        }

        let (slope, _intercept) = secant_coefficients(gamma, self.lb, self.ub);
        let outcome = self.solve_surrogate(slope)?;
        // A realized quadratic term below zero (non-PSD correlations) would
        // poison the next bracket with a negative endpoint; clamp it.
        let eta_star = quadratic_value(&self.phi, &outcome.omega_values).max(0.0);
        let mean_term = mean_value(self.graph, &outcome.omega_values);
        self.incumbent = Some(outcome);

        if self.config.log_iterations {
            info!(
                depth = self.depth,
                lb = self.lb,
                ub = self.ub,
                eta_star,
                "bisection iteration"
            );
        } else {
            debug!(
                depth = self.depth,
                lb = self.lb,
                ub = self.ub,
                eta_star,
                "bisection iteration"
            );
        }

        if collapsed {
            self.converged = true;
            return Ok(Step::Solved { eta_star });
        }

        // Linearization already tight at the achieved point
        if (eta_star - self.ub).abs() <= self.config.eta_tolerance
            || (eta_star - self.lb).abs() <= self.config.eta_tolerance
        {
            self.converged = true;
            return Ok(Step::Solved { eta_star });
        }

        // Descend into whichever half-bracket the current solution favors
        let val_lower = surrogate_value(mean_term, gamma, self.lb, eta_star, eta_star);
        let val_upper = surrogate_value(mean_term, gamma, eta_star, self.ub, eta_star);
        let (new_lb, new_ub) = if val_lower < val_upper {
            (self.lb, eta_star)
        } else {
            (eta_star, self.ub)
        };

        let moved = ((new_lb + new_ub) / 2.0 - (self.lb + self.ub) / 2.0).abs();
        self.lb = new_lb;
        self.ub = new_ub;
        if moved < self.config.epsilon || self.depth >= self.config.max_depth {
            self.converged = true;
        } else {
            self.depth += 1;
        }
        Ok(Step::Solved { eta_star })
    }

    /// Drive [`step`](Self::step) to convergence and extract the result.
    pub fn run(&mut self) -> SrtResult<RouteSolution> {
        let start = Instant::now();
        let mut iterations = 0;
        while !self.converged {
            if let Step::Solved { .. } = self.step()? {
                iterations += 1;
            }
        }

        let incumbent = self
            .incumbent
            .as_ref()
            .ok_or_else(|| SrtError::Solver("bisection converged without an incumbent".into()))?;

        let (slope, intercept) = secant_coefficients(self.travel.gamma, self.lb, self.ub);
        let eta_star = quadratic_value(&self.phi, &incumbent.omega_values).max(0.0);
        let objective_value =
            mean_value(self.graph, &incumbent.omega_values) + slope * eta_star + intercept;

        let (path, diagnostics) = extract_path(
            self.graph,
            self.travel,
            &incumbent.omega_values,
            self.config.integrality_tolerance,
        );

        Ok(RouteSolution {
            path,
            objective_value,
            iterations,
            oracle_calls: self.oracle_calls,
            solve_time_ms: start.elapsed().as_millis(),
            peak_memory_mb: None,
            final_bounds: Some((self.lb, self.ub)),
            diagnostics,
        })
    }
}

/// Solve the mean-standard-deviation problem for one travel and record the
/// result on the travel.
pub fn solve(graph: &Graph, travel: &mut Travel, config: &RouteConfig) -> SrtResult<RouteSolution> {
    let start = Instant::now();
    let mut bisection = Bisection::new(graph, travel, config)?;
    let mut solution = bisection.run()?;
    solution.solve_time_ms = start.elapsed().as_millis();

    info!(
        iterations = solution.iterations,
        oracle_calls = solution.oracle_calls,
        objective_value = solution.objective_value,
        "mean-std-dev solve finished"
    );

    travel.solution = Some(solution.clone());
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secant_is_exact_at_the_endpoints() {
        let (slope, intercept) = secant_coefficients(2.0, 1.0, 9.0);
        assert!((slope * 1.0 + intercept - 2.0).abs() < 1e-12); // 2 * sqrt(1)
        assert!((slope * 9.0 + intercept - 6.0).abs() < 1e-12); // 2 * sqrt(9)
    }

    #[test]
    fn collapsed_interval_gives_flat_secant() {
        let (slope, intercept) = secant_coefficients(3.0, 4.0, 4.0);
        assert_eq!(slope, 0.0);
        assert!((intercept - 6.0).abs() < 1e-12); // 3 * sqrt(4)
    }

    #[test]
    fn secant_under_estimates_sqrt_in_the_interior() {
        // sqrt is concave, so its secant lies below it strictly inside the
        // bracket and matches it at the endpoints.
        let interior = surrogate_value(0.0, 2.0, 0.0, 100.0, 25.0);
        assert!(interior < 2.0 * 25.0_f64.sqrt());
        let endpoint = surrogate_value(0.0, 2.0, 0.0, 100.0, 100.0);
        assert!((endpoint - 20.0).abs() < 1e-12);
    }
}
