//! JSON instance format and CSV incidence-matrix import.

use serde::{Deserialize, Serialize};
use srt_core::{Graph, LinkId, SrtError, SrtResult};
use std::fs;
use std::path::Path;

/// One stored correlation coefficient between two links (1-based labels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub a: usize,
    pub b: usize,
    pub rho: f64,
}

/// Serializable routing instance.
///
/// Correlations are sparse: pairs not listed fall back to
/// `default_correlation` when set, otherwise they stay unset and the
/// covariance index will reject the instance at solve time (missing
/// correlations are an error, never an implicit zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInstance {
    /// Rows = nodes, columns = links; -1 at origin, +1 at destination
    pub incidence: Vec<Vec<i8>>,
    pub mu: Vec<f64>,
    pub sigma: Vec<f64>,
    #[serde(default)]
    pub correlations: Vec<CorrelationEntry>,
    #[serde(default)]
    pub default_correlation: Option<f64>,
}

impl RouteInstance {
    /// Build the full graph, validating everything through the core
    /// constructors.
    pub fn to_graph(&self) -> SrtResult<Graph> {
        let mut graph =
            Graph::from_incidence_matrix(&self.incidence, Some(&self.mu), Some(&self.sigma))?;

        for entry in &self.correlations {
            graph.set_correlation(
                LinkId::new(entry.a),
                LinkId::new(entry.b),
                entry.rho,
            )?;
        }

        if let Some(rho) = self.default_correlation {
            let m = graph.link_count();
            for a in 1..=m {
                for b in (a + 1)..=m {
                    let (a, b) = (LinkId::new(a), LinkId::new(b));
                    if graph.correlation(a, b).is_none() {
                        graph.set_correlation(a, b, rho)?;
                    }
                }
            }
        }

        Ok(graph)
    }

    /// Export a graph back into the instance format.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut correlations: Vec<CorrelationEntry> = graph
            .correlations()
            .map(|(a, b, rho)| CorrelationEntry {
                a: a.value(),
                b: b.value(),
                rho,
            })
            .collect();
        correlations.sort_by_key(|e| (e.a, e.b));

        RouteInstance {
            incidence: graph.to_incidence_matrix(),
            mu: graph.links().map(|l| l.mu).collect(),
            sigma: graph.links().map(|l| l.sigma).collect(),
            correlations,
            default_correlation: None,
        }
    }

    /// Read an instance from a JSON file.
    pub fn read_json(path: impl AsRef<Path>) -> SrtResult<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| SrtError::Parse(format!("instance JSON: {e}")))
    }

    /// Write the instance as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> SrtResult<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| SrtError::Parse(format!("instance JSON: {e}")))?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Read a headerless CSV incidence matrix: one row per node, integer cells.
///
/// Shape and column validity are checked later by
/// [`Graph::from_incidence_matrix`]; this only rejects cells that are not
/// integers.
pub fn read_incidence_csv(path: impl AsRef<Path>) -> SrtResult<Vec<Vec<i8>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .map_err(|e| SrtError::Parse(format!("incidence CSV: {e}")))?;

    let mut matrix = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| SrtError::Parse(format!("incidence CSV: {e}")))?;
        let mut row = Vec::with_capacity(record.len());
        for (col_idx, cell) in record.iter().enumerate() {
            let value: i8 = cell.parse().map_err(|_| {
                SrtError::Parse(format!(
                    "incidence CSV: cell ({row_idx}, {col_idx}) is not an integer: {cell:?}"
                ))
            })?;
            row.push(value);
        }
        matrix.push(row);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_instance() -> RouteInstance {
        RouteInstance {
            incidence: vec![
                vec![-1, 0, 0, 0],
                vec![1, -1, -1, 0],
                vec![0, 1, 1, -1],
                vec![0, 0, 0, 1],
            ],
            mu: vec![1.0, 2.0, 3.0, 4.0],
            sigma: vec![0.1, 0.2, 0.3, 0.4],
            correlations: vec![CorrelationEntry { a: 1, b: 4, rho: 0.5 }],
            default_correlation: Some(0.0),
        }
    }

    #[test]
    fn instance_builds_a_fully_correlated_graph() {
        let graph = sample_instance().to_graph().unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.link_count(), 4);
        assert_eq!(graph.correlation(LinkId::new(1), LinkId::new(4)), Some(0.5));
        // unlisted pairs take the default
        assert_eq!(graph.correlation(LinkId::new(2), LinkId::new(3)), Some(0.0));
        // the covariance index accepts the result
        srt_core::HyperlinkIndex::build(&graph).unwrap();
    }

    #[test]
    fn without_default_unlisted_pairs_stay_missing() {
        let mut instance = sample_instance();
        instance.default_correlation = None;
        let graph = instance.to_graph().unwrap();
        assert_eq!(graph.correlation(LinkId::new(2), LinkId::new(3)), None);
        assert!(matches!(
            srt_core::HyperlinkIndex::build(&graph),
            Err(SrtError::MissingCorrelation { .. })
        ));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instance.json");

        let graph = sample_instance().to_graph().unwrap();
        RouteInstance::from_graph(&graph).write_json(&path).unwrap();
        let reread = RouteInstance::read_json(&path).unwrap();
        let rebuilt = reread.to_graph().unwrap();

        assert_eq!(rebuilt.to_incidence_matrix(), graph.to_incidence_matrix());
        assert_eq!(
            rebuilt.correlation(LinkId::new(1), LinkId::new(4)),
            Some(0.5)
        );
    }

    #[test]
    fn rejects_malformed_instances() {
        let mut instance = sample_instance();
        instance.mu.pop();
        assert!(matches!(
            instance.to_graph(),
            Err(SrtError::Validation(_))
        ));

        let mut instance = sample_instance();
        instance.correlations[0].rho = 2.0;
        assert!(instance.to_graph().is_err());
    }

    #[test]
    fn reads_csv_incidence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "-1,0").unwrap();
        writeln!(file, "1,-1").unwrap();
        writeln!(file, "0,1").unwrap();
        drop(file);

        let matrix = read_incidence_csv(&path).unwrap();
        assert_eq!(matrix, vec![vec![-1, 0], vec![1, -1], vec![0, 1]]);
        Graph::from_incidence_matrix(&matrix, None, None).unwrap();
    }

    #[test]
    fn csv_with_non_integer_cells_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        std::fs::write(&path, "-1,x\n1,0\n").unwrap();

        assert!(matches!(
            read_incidence_csv(&path),
            Err(SrtError::Parse(_))
        ));
    }
}
