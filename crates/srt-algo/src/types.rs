//! Shared solver configuration and result plumbing.

/// Tuning knobs for both route formulations.
///
/// Passed explicitly to every solve call; there is no process-global solver
/// state. `epsilon` and `max_depth` bound the bisection loop (and with it the
/// total number of oracle invocations), which doubles as the cancellation
/// mechanism for an oracle with no mid-solve cancellation of its own.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Minimum midpoint movement of the `[lb, ub]` interval per iteration
    pub epsilon: f64,
    /// Maximum bisection depth
    pub max_depth: usize,
    /// Tolerance for reading a relaxed omega value as 0 or 1
    pub integrality_tolerance: f64,
    /// Tolerance for the "linearization already tight" test
    /// (`eta_star` against `lb`/`ub`)
    pub eta_tolerance: f64,
    /// Emit per-iteration statistics at info level instead of debug
    pub log_iterations: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            max_depth: 100,
            integrality_tolerance: 1e-6,
            eta_tolerance: 1e-9,
            log_iterations: false,
        }
    }
}
