//! Shared graph fixtures for unit and integration tests.

use srt_core::Graph;

/// The worked 4-node example: incidence matrix
/// `[[-1,0,0,0],[1,-1,-1,0],[0,1,1,-1],[0,0,0,1]]` with `mu = [1,2,3,4]`,
/// `sigma = [0.1,0.2,0.3,0.4]` and zero cross-correlation everywhere.
///
/// Link 1 is 1 -> 2, links 2 and 3 both run 2 -> 3, link 4 is 3 -> 4. The
/// two feasible paths from node 1 to node 4 are links 1,2,4 and links 1,3,4;
/// the first is the minimum mean-plus-variance path
/// (1 + 2 + 4 + 0.01 + 0.04 + 0.16 = 7.21).
pub fn worked_example() -> Graph {
    let matrix = vec![
        vec![-1, 0, 0, 0],
        vec![1, -1, -1, 0],
        vec![0, 1, 1, -1],
        vec![0, 0, 0, 1],
    ];
    let mu = [1.0, 2.0, 3.0, 4.0];
    let sigma = [0.1, 0.2, 0.3, 0.4];
    let mut graph = Graph::from_incidence_matrix(&matrix, Some(&mu), Some(&sigma)).unwrap();

    let links: Vec<_> = graph.links().map(|l| l.id).collect();
    for (i, &a) in links.iter().enumerate() {
        for &b in &links[i + 1..] {
            graph.set_correlation(a, b, 0.0).unwrap();
        }
    }
    graph
}

/// Two parallel routes between two nodes: link 1 has the lower mean but a
/// large deviation, link 2 the higher mean and a tiny one. Risk-neutral
/// routing picks link 1; a sufficiently risk-averse gamma flips to link 2.
pub fn risk_tradeoff_pair() -> Graph {
    let mut graph = Graph::new();
    let a = graph.add_node();
    let b = graph.add_node();
    let fast = graph.add_link(a, b, 10.0, 5.0).unwrap();
    let steady = graph.add_link(a, b, 12.0, 0.1).unwrap();
    graph.set_correlation(fast, steady, 0.0).unwrap();
    graph
}

/// A graph where every sigma is zero, so the variance bound collapses to
/// `ub0 = lb0 = 0`.
pub fn deterministic_chain() -> Graph {
    let mut graph = Graph::new();
    let n1 = graph.add_node();
    let n2 = graph.add_node();
    let n3 = graph.add_node();
    let l1 = graph.add_link(n1, n2, 1.0, 0.0).unwrap();
    let l2 = graph.add_link(n2, n3, 2.0, 0.0).unwrap();
    graph.set_correlation(l1, l2, 0.0).unwrap();
    graph
}
