//! Path extraction from a solved omega assignment.
//!
//! Collects every link whose diagonal variable is at 1 (within tolerance) and
//! orders them by walking from the travel origin, following each link's
//! destination to the next selected link's origin. Everything the relaxation
//! should have forbidden but did not — fractional diagonals, active
//! off-diagonals the exclusivity rules pin to zero, selected links the walk
//! never reaches — is reported as a diagnostic on the result rather than
//! printed; the partial path is still returned.
//!
//! Off-diagonal checks cover only pairs of links sharing a node: those are
//! the pairs the exclusivity constraints force to zero. Pairs with no common
//! node are unconstrained, and with a zero objective coefficient the
//! interior-point solver is free to leave them anywhere in `[0, 1]`.

use srt_core::{Diagnostics, Graph, LinkId, Travel};

use crate::relaxation::omega_value;

/// Interpret a solved assignment as an ordered path plus consistency
/// diagnostics. `tol` is the integrality tolerance for reading a relaxed
/// value as 0 or 1.
pub fn extract_path(
    graph: &Graph,
    travel: &Travel,
    values: &[f64],
    tol: f64,
) -> (Vec<LinkId>, Diagnostics) {
    let n = graph.link_count();
    let mut diagnostics = Diagnostics::new();

    let mut selected = vec![false; n];
    for (i, link) in graph.links().enumerate() {
        let value = omega_value(values, n, i, i);
        if (value - 1.0).abs() <= tol {
            selected[i] = true;
        } else if value > tol {
            diagnostics.add_warning_with_entity(
                "relaxation",
                &format!("omega({0}, {0}) = {1:.6} is fractional; the relaxation is not integral", link.id.value(), value),
                &format!("Link {}", link.id.value()),
            );
        }
    }

    // Pairs the exclusivity constraints apply to: distinct links sharing a
    // node on the incoming or outgoing side.
    let mut constrained = vec![false; n * n];
    for node in graph.nodes() {
        for side in [graph.outgoing(node), graph.incoming(node)] {
            for &a in &side {
                for &b in &side {
                    if a != b {
                        constrained[(a.value() - 1) * n + (b.value() - 1)] = true;
                    }
                }
            }
        }
    }

    for i in 0..n {
        for j in 0..n {
            if constrained[i * n + j] && omega_value(values, n, i, j).abs() > tol {
                diagnostics.add_warning(
                    "consistency",
                    &format!(
                        "omega({}, {}) = {:.6} is non-zero for an exclusive link pair",
                        i + 1,
                        j + 1,
                        omega_value(values, n, i, j)
                    ),
                );
            }
        }
    }

    // Order the selected links by chaining destination -> origin from the
    // travel origin.
    let links: Vec<_> = graph.links().collect();
    let mut used = vec![false; n];
    let mut path = Vec::new();
    let mut current = travel.origin;
    loop {
        let next = (0..n).find(|&i| selected[i] && !used[i] && links[i].origin == current);
        let Some(i) = next else { break };
        used[i] = true;
        path.push(links[i].id);
        current = links[i].destination;
        if current == travel.destination {
            break;
        }
    }

    if current != travel.destination {
        diagnostics.add_warning(
            "path",
            &format!(
                "walk stops at node {} before reaching destination {}",
                current.value(),
                travel.destination.value()
            ),
        );
    }
    for i in 0..n {
        if selected[i] && !used[i] {
            diagnostics.add_warning_with_entity(
                "path",
                "link is selected but unreachable in walk order",
                &format!("Link {}", links[i].id.value()),
            );
        }
    }

    (path, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::worked_example;
    use srt_core::Travel;

    fn travel_1_to_4(graph: &Graph) -> Travel {
        Travel::new(graph.get_node(1).unwrap(), graph.get_node(4).unwrap())
    }

    #[test]
    fn orders_a_clean_indicator() {
        let graph = worked_example();
        let travel = travel_1_to_4(&graph);
        let n = graph.link_count();
        let mut values = vec![0.0; n * n];
        values[0] = 1.0; // link 1
        values[n + 1] = 1.0; // link 2
        values[3 * n + 3] = 1.0; // link 4

        let (path, diag) = extract_path(&graph, &travel, &values, 1e-6);
        assert_eq!(path, vec![LinkId::new(1), LinkId::new(2), LinkId::new(4)]);
        assert!(!diag.has_issues());
    }

    #[test]
    fn flags_fractional_diagonals() {
        let graph = worked_example();
        let travel = travel_1_to_4(&graph);
        let n = graph.link_count();
        let mut values = vec![0.0; n * n];
        values[0] = 0.5;
        values[n + 1] = 0.5; // link 2 also half-used
        values[3 * n + 3] = 1.0;

        let (path, diag) = extract_path(&graph, &travel, &values, 1e-6);
        assert_eq!(diag.issues_by_category("relaxation").count(), 2);
        // only the fully-selected link survives, so the walk stalls
        assert_eq!(path, Vec::<LinkId>::new());
        assert_eq!(diag.issues_by_category("path").count(), 2);
    }

    #[test]
    fn flags_active_off_diagonals() {
        let graph = worked_example();
        let travel = travel_1_to_4(&graph);
        let n = graph.link_count();
        let mut values = vec![0.0; n * n];
        values[0] = 1.0;
        values[n + 1] = 1.0;
        values[3 * n + 3] = 1.0;
        values[n + 2] = 1.0; // omega(2,3) should be forced to zero

        let (path, diag) = extract_path(&graph, &travel, &values, 1e-6);
        assert_eq!(path, vec![LinkId::new(1), LinkId::new(2), LinkId::new(4)]);
        assert_eq!(diag.issues_by_category("consistency").count(), 1);
    }

    #[test]
    fn ignores_unconstrained_off_diagonals() {
        // Links 1 (1 -> 2) and 4 (3 -> 4) share no node, so no exclusivity
        // rule touches omega(1,4); an interior-point solver may leave it
        // anywhere in [0, 1] when its objective coefficient is zero.
        let graph = worked_example();
        let travel = travel_1_to_4(&graph);
        let n = graph.link_count();
        let mut values = vec![0.0; n * n];
        values[0] = 1.0;
        values[n + 1] = 1.0;
        values[3 * n + 3] = 1.0;
        values[3] = 0.5; // omega(1,4)
        values[3 * n] = 0.5; // omega(4,1)

        let (path, diag) = extract_path(&graph, &travel, &values, 1e-6);
        assert_eq!(path, vec![LinkId::new(1), LinkId::new(2), LinkId::new(4)]);
        assert!(!diag.has_issues());
    }
}
