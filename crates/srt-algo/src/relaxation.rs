//! Path relaxation over the omega (hyperlink activation) variable space.
//!
//! One continuous variable `omega(a, b)` in `[0, 1]` exists for every ordered
//! pair of links; `omega(a, a)` is the indicator of link `a` in the chosen
//! path. Six constraint families make the diagonal an indicator vector of a
//! simple directed path from origin to destination and restrict off-diagonal
//! activations to pairs where correlation propagation is structurally
//! possible:
//!
//! 1. origin flow balance: in − out = −1
//! 2. destination flow balance: in − out = +1
//! 3. flow conservation at every other node
//! 4. output exclusivity: distinct outgoing pairs at a node are zero
//! 5. input exclusivity: distinct incoming pairs at a node are zero
//! 6. pairwise symmetry of incoming pairs at a node
//!
//! The constraint set is shared verbatim by both formulations; only the
//! objective differs. Building never fails for a well-formed graph — an
//! unreachable destination surfaces as LP infeasibility, not here.

use good_lp::{constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable};
use srt_core::{Graph, HyperlinkIndex, LinkId, Travel};

/// Dense row-major handle matrix for the omega variables of one relaxation.
pub struct OmegaVars {
    n: usize,
    vars: Vec<Variable>,
}

impl OmegaVars {
    /// Number of links the variable space ranges over.
    pub fn link_count(&self) -> usize {
        self.n
    }

    /// Variable handle for an ordered pair of link ids.
    #[inline]
    pub fn get(&self, a: LinkId, b: LinkId) -> Variable {
        self.at(a.value() - 1, b.value() - 1)
    }

    /// Variable handle by 0-based link index pair.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> Variable {
        self.vars[i * self.n + j]
    }

    /// All handles in row-major order; oracle outcomes align with this order.
    pub fn all(&self) -> &[Variable] {
        &self.vars
    }
}

/// Omega value lookup in the same row-major order as [`OmegaVars::all`].
#[inline]
pub fn omega_value(values: &[f64], n: usize, i: usize, j: usize) -> f64 {
    values[i * n + j]
}

/// Variable space plus the six constraint families for one travel request.
pub struct Relaxation {
    pub variables: ProblemVariables,
    pub omega: OmegaVars,
    pub constraints: Vec<Constraint>,
}

impl Relaxation {
    /// Translate a travel request over a graph into the constraint system.
    pub fn build(graph: &Graph, travel: &Travel) -> Relaxation {
        let n = graph.link_count();
        let mut vars = variables!();
        let handles: Vec<Variable> = (0..n * n)
            .map(|_| vars.add(variable().min(0.0).max(1.0)))
            .collect();
        let omega = OmegaVars { n, vars: handles };

        let diag_sum = |links: &[LinkId]| -> Expression {
            links
                .iter()
                .fold(Expression::from(0.0), |acc, &l| acc + omega.get(l, l))
        };

        let mut constraints = Vec::new();

        // Flow balance, input − output convention: the path leaves the origin
        // net once and enters the destination net once.
        constraints.push(constraint!(
            diag_sum(&graph.incoming(travel.origin)) - diag_sum(&graph.outgoing(travel.origin))
                == -1.0
        ));
        constraints.push(constraint!(
            diag_sum(&graph.incoming(travel.destination))
                - diag_sum(&graph.outgoing(travel.destination))
                == 1.0
        ));
        for node in graph.nodes() {
            if node != travel.origin && node != travel.destination {
                constraints.push(constraint!(
                    diag_sum(&graph.incoming(node)) == diag_sum(&graph.outgoing(node))
                ));
            }
        }

        // Exclusivity and symmetry over link pairs sharing a node
        for node in graph.nodes() {
            let out = graph.outgoing(node);
            for &a in &out {
                for &b in &out {
                    if a != b {
                        constraints.push(constraint!(omega.get(a, b) == 0.0));
                    }
                }
            }

            let inp = graph.incoming(node);
            for &a in &inp {
                for &b in &inp {
                    if a != b {
                        constraints.push(constraint!(omega.get(a, b) == 0.0));
                    }
                }
            }

            for &a in &inp {
                for &b in &inp {
                    if a != b {
                        constraints.push(constraint!(omega.get(a, b) == omega.get(b, a)));
                    }
                }
            }
        }

        Relaxation {
            variables: vars,
            omega,
            constraints,
        }
    }
}

/// Linear objective `sum mu(a) omega(a,a) + weight * sum phi(a,b) omega(a,b)`.
///
/// `weight = 1` gives the mean-variance objective; the bisection solver passes
/// the secant slope of the standard-deviation term instead.
pub fn build_objective(
    graph: &Graph,
    phi: &HyperlinkIndex,
    omega: &OmegaVars,
    variance_weight: f64,
) -> Expression {
    let n = omega.link_count();
    let mut expr = Expression::from(0.0);
    for (i, link) in graph.links().enumerate() {
        if link.mu != 0.0 {
            expr += link.mu * omega.at(i, i);
        }
    }
    for i in 0..n {
        for j in 0..n {
            let coeff = variance_weight * phi.at(i, j);
            if coeff != 0.0 {
                expr += coeff * omega.at(i, j);
            }
        }
    }
    expr
}

/// Realized mean term `sum mu(a) omega(a,a)` at a solved assignment.
pub fn mean_value(graph: &Graph, values: &[f64]) -> f64 {
    let n = graph.link_count();
    graph
        .links()
        .enumerate()
        .map(|(i, link)| link.mu * omega_value(values, n, i, i))
        .sum()
}

/// Realized quadratic term `eta = sum phi(a,b) omega(a,b)` at an assignment.
pub fn quadratic_value(phi: &HyperlinkIndex, values: &[f64]) -> f64 {
    let n = phi.link_count();
    let mut eta = 0.0;
    for i in 0..n {
        for j in 0..n {
            eta += phi.at(i, j) * omega_value(values, n, i, j);
        }
    }
    eta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::worked_example;
    use srt_core::Travel;

    #[test]
    fn worked_example_constraint_count() {
        let graph = worked_example();
        let travel = Travel::new(
            graph.get_node(1).unwrap(),
            graph.get_node(4).unwrap(),
        );
        let relax = Relaxation::build(&graph, &travel);

        assert_eq!(relax.omega.link_count(), 4);
        assert_eq!(relax.omega.all().len(), 16);
        // 4 flow-balance rows, 2 output-exclusivity rows at node 2,
        // 2 input-exclusivity rows at node 3, 2 symmetry rows at node 3
        assert_eq!(relax.constraints.len(), 10);
    }

    #[test]
    fn realized_terms_match_an_indicator_assignment() {
        let graph = worked_example();
        let phi = srt_core::HyperlinkIndex::build(&graph).unwrap();
        let n = graph.link_count();

        // Indicator of the path over links 1, 2, 4
        let mut values = vec![0.0; n * n];
        values[0] = 1.0; // omega(1,1)
        values[n + 1] = 1.0; // omega(2,2)
        values[3 * n + 3] = 1.0; // omega(4,4)

        assert!((mean_value(&graph, &values) - 7.0).abs() < 1e-12);
        // sigma_1^2 + sigma_2^2 + sigma_4^2 with zero cross-correlation
        assert!((quadratic_value(&phi, &values) - 0.21).abs() < 1e-12);
    }
}
