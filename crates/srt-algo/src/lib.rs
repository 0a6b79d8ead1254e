//! # srt-algo: Risk-Averse Routing Algorithms
//!
//! Optimization algorithms for minimum-risk paths over graphs with
//! correlated stochastic arc times, built on one shared LP relaxation.
//!
//! ## Formulations
//!
//! | Formulation | Objective | Oracle calls |
//! |-------------|-----------|--------------|
//! | [`mean_variance`] | `E[T] + Var[T]` | 1 |
//! | [`mean_stddev`] | `E[T] + gamma * sqrt(Var[T])` | one per bisection iteration |
//!
//! ### Architecture
//!
//! - **[`relaxation`]**: the omega variable space and the six constraint
//!   families shared by both formulations (what to solve)
//! - **[`oracle`]**: the LP boundary — one immutable request in, one
//!   immutable outcome out (how it is solved)
//! - **[`mean_stddev::Bisection`]**: explicit `(lb, ub, depth)` loop
//!   linearizing the square root by its secant over the current bracket
//! - **[`extract`]**: turns a solved assignment into an ordered path and
//!   attaches consistency diagnostics instead of failing
//!
//! ## Example
//!
//! ```ignore
//! use srt_algo::{mean_stddev, RouteConfig};
//! use srt_core::{Graph, Travel};
//!
//! let graph: Graph = load_instance()?;
//! let mut travel = Travel::new(origin, destination).with_gamma(2.0);
//!
//! let solution = mean_stddev::solve(&graph, &mut travel, &RouteConfig::default())?;
//! println!("path: {:?}", solution.path_labels());
//! println!("objective: {:.3}", solution.objective_value);
//! ```

pub mod extract;
pub mod mean_stddev;
pub mod mean_variance;
pub mod oracle;
pub mod relaxation;
pub mod test_utils;
pub mod types;

pub use extract::extract_path;
pub use mean_stddev::{Bisection, Step};
pub use oracle::{LpOutcome, LpRequest};
pub use relaxation::{OmegaVars, Relaxation};
pub use types::RouteConfig;
