//! # srt-core: Stochastic Routing Core Model
//!
//! Provides the graph data model for risk-averse routing over directed graphs
//! whose arc traversal times are correlated random variables.
//!
//! ## Design Philosophy
//!
//! Graphs are modeled as **directed multigraphs** where:
//! - **Nodes**: plain junctions with dense 1-based labels
//! - **Links**: directed arcs carrying a mean traversal time `mu`, a standard
//!   deviation `sigma`, and pairwise correlation coefficients `rho`
//!
//! The graph-based approach enables:
//! - Fast adjacency queries (incoming/outgoing links per node)
//! - Type-safe element access with newtype IDs
//! - Support for parallel links between the same node pair
//!
//! ## Quick Start
//!
//! ```rust
//! use srt_core::{Graph, Travel};
//!
//! let mut graph = Graph::new();
//! let a = graph.add_node();
//! let b = graph.add_node();
//! let link = graph.add_link(a, b, 10.0, 2.5).unwrap();
//!
//! let travel = Travel::new(a, b).with_gamma(1.5);
//! assert_eq!(graph.outgoing(a), vec![link]);
//! assert_eq!(travel.gamma, 1.5);
//! ```
//!
//! ## Core Data Structures
//!
//! - [`Graph`] - graph container (petgraph `DiGraph<Node, Link>`) plus the
//!   symmetric correlation table
//! - [`Link`] / [`Node`] - arc and junction records
//! - [`HyperlinkIndex`] - dense covariance-contribution matrix `phi(a,b)`
//! - [`Travel`] - one routing request (origin, destination, risk weight)
//! - [`RouteSolution`] - solver output attached to a travel
//! - Type-safe IDs: [`NodeId`], [`LinkId`] (1-based, dense)
//!
//! ## Modules
//!
//! - [`diagnostics`] - warning/error collection attached to results
//! - [`error`] - unified [`SrtError`] type
//! - [`hyperlink`] - the derived `phi` covariance index

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod diagnostics;
pub mod error;
pub mod hyperlink;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{SrtError, SrtResult};
pub use hyperlink::HyperlinkIndex;

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl LinkId {
    #[inline]
    pub fn new(value: usize) -> Self {
        LinkId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// A junction in the routing graph. Incoming and outgoing link lists are
/// derived from the topology, see [`Graph::incoming`] and [`Graph::outgoing`].
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
}

/// A directed arc with stochastic traversal time.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    pub origin: NodeId,
    pub destination: NodeId,
    /// Mean traversal time
    pub mu: f64,
    /// Standard deviation of the traversal time
    pub sigma: f64,
}

/// Directed graph with stochastic arcs and a symmetric correlation table.
///
/// Node and link labels are dense and 1-based; insertion order defines them
/// and nothing is ever removed. Correlations are stored once per unordered
/// pair; `rho(a, a) = 1` is implicit.
pub struct Graph {
    pub graph: DiGraph<Node, Link>,
    correlations: HashMap<(LinkId, LinkId), f64>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            correlations: HashMap::new(),
        }
    }

    #[inline]
    fn node_index(id: NodeId) -> NodeIndex {
        NodeIndex::new(id.value() - 1)
    }

    #[inline]
    fn edge_index(id: LinkId) -> EdgeIndex {
        EdgeIndex::new(id.value() - 1)
    }

    /// Append a node; labels start at 1.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId::new(self.graph.node_count() + 1);
        self.graph.add_node(Node { id });
        id
    }

    /// Append a directed link from `origin` to `destination`.
    ///
    /// Rejects unknown endpoints and negative or non-finite parameters.
    pub fn add_link(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        mu: f64,
        sigma: f64,
    ) -> SrtResult<LinkId> {
        let n = self.graph.node_count();
        if origin.value() == 0 || origin.value() > n {
            return Err(SrtError::Validation(format!(
                "link origin {} is not a node of this graph",
                origin.value()
            )));
        }
        if destination.value() == 0 || destination.value() > n {
            return Err(SrtError::Validation(format!(
                "link destination {} is not a node of this graph",
                destination.value()
            )));
        }
        if !mu.is_finite() || mu < 0.0 {
            return Err(SrtError::Validation(format!(
                "link mean must be finite and >= 0, got {mu}"
            )));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(SrtError::Validation(format!(
                "link standard deviation must be finite and >= 0, got {sigma}"
            )));
        }

        let id = LinkId::new(self.graph.edge_count() + 1);
        self.graph.add_edge(
            Self::node_index(origin),
            Self::node_index(destination),
            Link {
                id,
                origin,
                destination,
                mu,
                sigma,
            },
        );
        Ok(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node id for a 1-based label, if present.
    pub fn get_node(&self, label: usize) -> Option<NodeId> {
        (label >= 1 && label <= self.graph.node_count()).then(|| NodeId::new(label))
    }

    /// Link record by id. Panics on an id not issued by this graph.
    pub fn link(&self, id: LinkId) -> &Link {
        &self.graph[Self::edge_index(id)]
    }

    /// Links in label order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.edge_weights()
    }

    /// Node ids in label order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().map(|n| n.id)
    }

    /// Incoming links of a node, in label order.
    pub fn incoming(&self, node: NodeId) -> Vec<LinkId> {
        self.adjacent(node, Direction::Incoming)
    }

    /// Outgoing links of a node, in label order.
    pub fn outgoing(&self, node: NodeId) -> Vec<LinkId> {
        self.adjacent(node, Direction::Outgoing)
    }

    fn adjacent(&self, node: NodeId, dir: Direction) -> Vec<LinkId> {
        let mut ids: Vec<LinkId> = self
            .graph
            .edges_directed(Self::node_index(node), dir)
            .map(|e| e.weight().id)
            .collect();
        // petgraph iterates most-recently-added first
        ids.sort();
        ids
    }

    /// Set the correlation coefficient between two distinct links.
    ///
    /// The table is symmetric: one call covers both orders. `rho(a, a)` is 1
    /// by convention and may not be overridden.
    pub fn set_correlation(&mut self, a: LinkId, b: LinkId, rho: f64) -> SrtResult<()> {
        let m = self.graph.edge_count();
        for id in [a, b] {
            if id.value() == 0 || id.value() > m {
                return Err(SrtError::Validation(format!(
                    "link {} is not a link of this graph",
                    id.value()
                )));
            }
        }
        if a == b {
            if (rho - 1.0).abs() > f64::EPSILON {
                return Err(SrtError::Validation(format!(
                    "rho({0}, {0}) is fixed at 1, got {rho}",
                    a.value()
                )));
            }
            return Ok(());
        }
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(SrtError::Validation(format!(
                "correlation must lie in [-1, 1], got {rho}"
            )));
        }
        self.correlations.insert(Self::pair_key(a, b), rho);
        Ok(())
    }

    /// Correlation coefficient between two links, if known.
    pub fn correlation(&self, a: LinkId, b: LinkId) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.correlations.get(&Self::pair_key(a, b)).copied()
    }

    /// All explicitly stored correlations as `(a, b, rho)` with `a < b`.
    pub fn correlations(&self) -> impl Iterator<Item = (LinkId, LinkId, f64)> + '_ {
        self.correlations.iter().map(|(&(a, b), &rho)| (a, b, rho))
    }

    #[inline]
    fn pair_key(a: LinkId, b: LinkId) -> (LinkId, LinkId) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Node-link incidence matrix: rows are nodes, columns are links, with
    /// -1 at the origin row and +1 at the destination row of each column.
    pub fn to_incidence_matrix(&self) -> Vec<Vec<i8>> {
        let n = self.node_count();
        let m = self.link_count();
        let mut matrix = vec![vec![0i8; m]; n];
        for (j, link) in self.links().enumerate() {
            matrix[link.origin.value() - 1][j] = -1;
            matrix[link.destination.value() - 1][j] = 1;
        }
        matrix
    }

    /// Build a graph from an incidence matrix and optional per-link parameter
    /// vectors. Missing parameter vectors default every link to 0.0.
    ///
    /// The matrix must be non-empty and rectangular, and every column must
    /// contain exactly one -1 (origin) and one +1 (destination).
    pub fn from_incidence_matrix(
        matrix: &[Vec<i8>],
        mu: Option<&[f64]>,
        sigma: Option<&[f64]>,
    ) -> SrtResult<Graph> {
        if matrix.is_empty() || matrix[0].is_empty() {
            return Err(SrtError::Validation(
                "incidence matrix must have at least one node row and one link column".into(),
            ));
        }
        let num_nodes = matrix.len();
        let num_links = matrix[0].len();
        if matrix.iter().any(|row| row.len() != num_links) {
            return Err(SrtError::Validation(
                "all incidence matrix rows must have the same number of columns".into(),
            ));
        }
        if let Some(mu) = mu {
            if mu.len() != num_links {
                return Err(SrtError::Validation(format!(
                    "mu vector has {} entries but the matrix has {} link columns",
                    mu.len(),
                    num_links
                )));
            }
        }
        if let Some(sigma) = sigma {
            if sigma.len() != num_links {
                return Err(SrtError::Validation(format!(
                    "sigma vector has {} entries but the matrix has {} link columns",
                    sigma.len(),
                    num_links
                )));
            }
        }

        let mut graph = Graph::new();
        let nodes: Vec<NodeId> = (0..num_nodes).map(|_| graph.add_node()).collect();

        for j in 0..num_links {
            let mut origin = None;
            let mut destination = None;
            for (i, row) in matrix.iter().enumerate() {
                match row[j] {
                    -1 if origin.is_none() => origin = Some(i),
                    1 if destination.is_none() => destination = Some(i),
                    0 => {}
                    _ => {
                        return Err(SrtError::Validation(format!(
                            "column {} must contain exactly one -1 and one +1",
                            j
                        )))
                    }
                }
            }
            let (origin, destination) = match (origin, destination) {
                (Some(o), Some(d)) => (o, d),
                _ => {
                    return Err(SrtError::Validation(format!(
                        "column {} must contain exactly one -1 and one +1",
                        j
                    )))
                }
            };
            graph.add_link(
                nodes[origin],
                nodes[destination],
                mu.map_or(0.0, |v| v[j]),
                sigma.map_or(0.0, |v| v[j]),
            )?;
        }

        Ok(graph)
    }

    /// Compute basic statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            num_nodes: self.node_count(),
            num_links: self.link_count(),
            ..GraphStats::default()
        };
        for link in self.links() {
            stats.total_mean += link.mu;
            stats.total_variance += link.sigma * link.sigma;
        }
        stats.num_correlations = self.correlations.len();
        stats
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphStats {
    pub num_nodes: usize,
    pub num_links: usize,
    pub num_correlations: usize,
    pub total_mean: f64,
    pub total_variance: f64,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} links ({:.1} total mean, {:.3} total variance), {} correlation pairs",
            self.num_nodes, self.num_links, self.total_mean, self.total_variance, self.num_correlations
        )
    }
}

/// One risk-adjusted routing request.
///
/// `gamma` weights the standard-deviation penalty and is used by the
/// mean-standard-deviation formulation only. Whichever solver runs the
/// request writes [`Travel::solution`] exactly once; concurrent solves on
/// the same travel are not supported.
#[derive(Debug, Clone)]
pub struct Travel {
    pub origin: NodeId,
    pub destination: NodeId,
    /// Risk-aversion weight, >= 0
    pub gamma: f64,
    pub solution: Option<RouteSolution>,
}

impl Travel {
    pub fn new(origin: NodeId, destination: NodeId) -> Self {
        Self {
            origin,
            destination,
            gamma: 0.0,
            solution: None,
        }
    }

    /// Set the risk-aversion weight
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }
}

/// Solver output for one travel: the chosen path plus advisory diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSolution {
    /// Links of the path in traversal order from origin to destination
    pub path: Vec<LinkId>,
    /// Achieved objective value of the formulation that produced this result
    pub objective_value: f64,
    /// Bisection iterations (1 for the single-LP mean-variance formulation)
    pub iterations: usize,
    /// Total LP oracle invocations
    pub oracle_calls: usize,
    /// Wall-clock solve time in milliseconds
    pub solve_time_ms: u128,
    /// Peak resident memory in MiB, filled by the caller's instrumentation
    pub peak_memory_mb: Option<f64>,
    /// Final `(lb, ub)` bounds on the variance term (bisection only)
    pub final_bounds: Option<(f64, f64)>,
    /// Consistency warnings from path extraction
    pub diagnostics: Diagnostics,
}

impl RouteSolution {
    /// Path as 1-based link labels
    pub fn path_labels(&self) -> Vec<usize> {
        self.path.iter().map(|l| l.value()).collect()
    }
}
