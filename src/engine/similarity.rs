use tracing::debug;

use crate::collections::graph::Graph;
use crate::core::error::Result;
use crate::core::record::Record;
use crate::engine::store::IndexEngine;

/// Euclidean distance over the five similarity metrics, in raw
/// (non-normalized) units.
pub fn distance(a: &Record, b: &Record) -> f64 {
    let mut sum = 0.0;
    sum += diff_sq(a.pe, b.pe);
    sum += diff_sq(a.roe, b.roe);
    sum += diff_sq(a.book_value, b.book_value);
    sum += diff_sq(a.latest_eps, b.latest_eps);
    sum += diff_sq(a.dividend_yield, b.dividend_yield);
    sum.sqrt()
}

fn diff_sq(x: f64, y: f64) -> f64 {
    let d = x - y;
    d * d
}

/// Build the undirected similarity graph: one vertex per record, an edge
/// for every unordered pair strictly closer than `threshold`.
///
/// O(n^2) pairwise pass; this dominates (re)load cost and is the price
/// of answering neighborhood queries without a spatial index.
pub fn build_graph(records: &[Record], threshold: f64) -> Result<Graph<usize>> {
    let mut graph = Graph::with_vertices(false, records.len());
    for i in 0..records.len() {
        graph.set_vertex_data(i, i)?;
    }
    for i in 0..records.len() {
        for j in (i + 1)..records.len() {
            if distance(&records[i], &records[j]) < threshold {
                graph.add_edge(i, j)?;
            }
        }
    }
    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "similarity graph built"
    );
    Ok(graph)
}

impl IndexEngine {
    /// The `k` records nearest to `index` with their distances, nearest
    /// first. Empty for an out-of-range index or a one-record arena.
    pub fn similar(&self, index: usize, k: usize) -> Vec<(f64, &Record)> {
        let Some(origin) = self.records.get(index) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(f64, &Record)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, record)| (distance(origin, record), record))
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbors.truncate(k);
        neighbors
    }

    /// Record indices sharing a similarity edge with `index`.
    pub fn similarity_neighbors(&self, index: usize) -> Vec<usize> {
        match self.similarity.neighbors(index) {
            Ok(list) => list.to_vec(),
            Err(_) => Vec::new(),
        }
    }
}
