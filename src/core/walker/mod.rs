//! # Walker Module
//!
//! Orders linked ids for incremental placement, hubs first.
//!
//! ## How It Works
//! 1. Build an undirected graph from the pairs
//! 2. Pick the node with the highest degree
//! 3. Mark its neighbors as the frontier
//! 4. Repeatedly pick the highest-degree unvisited frontier node and widen
//!    the frontier with its neighbors
//!
//! The walk stays within the first component it enters, so nodes never
//! reached from it are left out. Ties go to the node that appeared first in
//! the edge list.

mod graph;

pub use graph::LinkGraph;

use tracing::debug;

/// Greedy descending-degree walk over a link graph
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityWalker;

impl ConnectivityWalker {
    pub fn new() -> Self {
        Self
    }

    /// Visitation order of the nodes reachable from the best-connected hub
    pub fn walk<I, S>(&self, edges: I) -> Vec<String>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let graph = LinkGraph::from_edges(edges);
        let order = self.walk_graph(&graph);
        debug!(nodes = graph.len(), visited = order.len(), "walked link graph");
        order
    }

    /// Walk an already-built graph
    pub fn walk_graph(&self, graph: &LinkGraph) -> Vec<String> {
        let mut remaining: Vec<bool> = vec![true; graph.len()];
        let mut frontier: Vec<bool> = vec![false; graph.len()];
        let mut frontier_empty = true;
        let mut order = Vec::new();

        loop {
            let mut best: Option<(usize, usize)> = None;
            for node in 0..graph.len() {
                if !remaining[node] || (!frontier_empty && !frontier[node]) {
                    continue;
                }
                let degree = graph.degree(node);
                if best.map_or(true, |(_, top)| degree > top) {
                    best = Some((node, degree));
                }
            }

            let Some((node, _)) = best else {
                break;
            };

            remaining[node] = false;
            order.push(graph.id(node).to_string());
            for neighbor in graph.neighbors(node) {
                frontier[neighbor] = true;
                frontier_empty = false;
            }
        }

        order
    }
}
