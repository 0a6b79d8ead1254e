//! Derived covariance index over link pairs ("hyperlinks").
//!
//! For every ordered pair of links `(a, b)` the index stores
//! `phi(a, b) = rho(a, b) * sigma(a) * sigma(b)`; the diagonal is
//! `sigma(a)^2`. The quadratic variance term of a path is the sum of
//! `phi(a, b) * omega(a, b)` over the active pairs.
//!
//! Stored as a dense row-major `n x n` array indexed by 0-based link index,
//! so lookups are O(1) array reads. Building is O(n^2) and is re-done per
//! solve; a missing correlation for a distinct pair is an error, never a
//! silent zero.

use crate::{Graph, LinkId, SrtError, SrtResult};

/// Dense `phi` matrix over all ordered link pairs of one graph.
#[derive(Debug, Clone)]
pub struct HyperlinkIndex {
    n: usize,
    phi: Vec<f64>,
}

impl HyperlinkIndex {
    /// Derive the full index from a graph's links and correlation table.
    ///
    /// Fails with [`SrtError::MissingCorrelation`] if any distinct pair has
    /// no stored coefficient. The diagonal needs no entry (`rho = 1`).
    pub fn build(graph: &Graph) -> SrtResult<Self> {
        let links: Vec<_> = graph.links().collect();
        let n = links.len();
        let mut phi = vec![0.0; n * n];

        for (i, a) in links.iter().enumerate() {
            for (j, b) in links.iter().enumerate() {
                let rho = graph
                    .correlation(a.id, b.id)
                    .ok_or(SrtError::MissingCorrelation { a: a.id, b: b.id })?;
                phi[i * n + j] = rho * (a.sigma * b.sigma);
            }
        }

        Ok(Self { n, phi })
    }

    /// Number of links the index was built over.
    pub fn link_count(&self) -> usize {
        self.n
    }

    /// Number of hyperlink pairs (`link_count^2`).
    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }

    /// `phi` for a pair of link ids.
    #[inline]
    pub fn phi(&self, a: LinkId, b: LinkId) -> f64 {
        self.at(a.value() - 1, b.value() - 1)
    }

    /// `phi` by 0-based link index pair.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.phi[i * self.n + j]
    }

    /// Sum of `phi` over all pairs: the conservative initial upper bound on
    /// the achievable variance term.
    pub fn total(&self) -> f64 {
        self.phi.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;

    fn correlated_triangle() -> Graph {
        let mut g = Graph::new();
        let n1 = g.add_node();
        let n2 = g.add_node();
        let n3 = g.add_node();
        let l1 = g.add_link(n1, n2, 1.0, 0.5).unwrap();
        let l2 = g.add_link(n2, n3, 2.0, 2.0).unwrap();
        let l3 = g.add_link(n1, n3, 3.0, 1.0).unwrap();
        g.set_correlation(l1, l2, 0.5).unwrap();
        g.set_correlation(l1, l3, -0.25).unwrap();
        g.set_correlation(l2, l3, 0.0).unwrap();
        g
    }

    #[test]
    fn diagonal_is_variance() {
        let idx = HyperlinkIndex::build(&correlated_triangle()).unwrap();
        assert!((idx.at(0, 0) - 0.25).abs() < 1e-12);
        assert!((idx.at(1, 1) - 4.0).abs() < 1e-12);
        assert!((idx.at(2, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn phi_is_symmetric() {
        let idx = HyperlinkIndex::build(&correlated_triangle()).unwrap();
        for i in 0..idx.link_count() {
            for j in 0..idx.link_count() {
                assert_eq!(idx.at(i, j), idx.at(j, i));
            }
        }
        // rho * sigma_a * sigma_b = 0.5 * 0.5 * 2.0
        assert!((idx.phi(LinkId::new(1), LinkId::new(2)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_correlation_is_an_error() {
        let mut g = Graph::new();
        let n1 = g.add_node();
        let n2 = g.add_node();
        g.add_link(n1, n2, 1.0, 0.1).unwrap();
        g.add_link(n1, n2, 2.0, 0.2).unwrap();

        match HyperlinkIndex::build(&g) {
            Err(SrtError::MissingCorrelation { a, b }) => {
                assert_ne!(a, b);
            }
            other => panic!("expected MissingCorrelation, got {:?}", other),
        }
    }

    #[test]
    fn total_sums_all_pairs() {
        let idx = HyperlinkIndex::build(&correlated_triangle()).unwrap();
        // diagonals 0.25 + 4 + 1, off-diagonals 2 * (0.5 - 0.125 + 0.0)
        assert!((idx.total() - 6.0).abs() < 1e-12);
        assert_eq!(idx.len(), 9);
    }
}
