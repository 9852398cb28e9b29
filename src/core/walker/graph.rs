//! Arena-backed undirected graph built from an edge list.

use std::collections::{BTreeSet, HashMap};

/// Undirected, unweighted graph whose nodes keep first-appearance order
///
/// Repeated edges collapse; self-loops register the node but add no
/// neighbor.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    neighbors: Vec<BTreeSet<usize>>,
}

impl LinkGraph {
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::default();
        for (a, b) in edges {
            let a = graph.node(a.as_ref());
            let b = graph.node(b.as_ref());
            if a != b {
                graph.neighbors[a].insert(b);
                graph.neighbors[b].insert(a);
            }
        }
        graph
    }

    fn node(&mut self, id: &str) -> usize {
        if let Some(&existing) = self.index.get(id) {
            return existing;
        }
        let slot = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), slot);
        self.neighbors.push(BTreeSet::new());
        slot
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier of the node in arena slot `node`
    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    /// Number of distinct neighbors
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors[node].len()
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[node].iter().copied()
    }
}
