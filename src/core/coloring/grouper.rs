//! Grouping of pairs into clusters.
//!
//! Two strategies are available. Scan-order grouping merges each pair into
//! the first existing group that shares an endpoint, so its result depends
//! on pair order and a bridging pair does not fuse two groups. Disjoint-set
//! grouping computes the true transitive closure.

use crate::core::matcher::Pair;
use std::collections::{BTreeSet, HashMap};

/// Group pairs by first-match-wins scanning
///
/// Groups only grow. When a pair bridges two existing groups, both ids join
/// the first of them and the other group keeps its members, so an id may
/// appear in more than one group.
pub fn scan_order_groups(pairs: &[Pair]) -> Vec<BTreeSet<String>> {
    let mut groups: Vec<BTreeSet<String>> = Vec::new();

    for Pair(a, b) in pairs {
        match groups
            .iter_mut()
            .find(|group| group.contains(a) || group.contains(b))
        {
            Some(group) => {
                group.insert(a.clone());
                group.insert(b.clone());
            }
            None => groups.push(BTreeSet::from([a.clone(), b.clone()])),
        }
    }

    groups
}

/// Group pairs into connected components
///
/// Groups are returned in order of their first id's first appearance.
pub fn disjoint_set_groups(pairs: &[Pair]) -> Vec<BTreeSet<String>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ids: Vec<&str> = Vec::new();
    for Pair(a, b) in pairs {
        for id in [a.as_str(), b.as_str()] {
            index.entry(id).or_insert_with(|| {
                ids.push(id);
                ids.len() - 1
            });
        }
    }

    let mut sets = DisjointSet::new(ids.len());
    for Pair(a, b) in pairs {
        if let (Some(&left), Some(&right)) = (index.get(a.as_str()), index.get(b.as_str())) {
            sets.union(left, right);
        }
    }

    let mut slot_for_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<BTreeSet<String>> = Vec::new();
    for (node, id) in ids.iter().enumerate() {
        let root = sets.find(node);
        let slot = *slot_for_root.entry(root).or_insert_with(|| {
            groups.push(BTreeSet::new());
            groups.len() - 1
        });
        groups[slot].insert((*id).to_string());
    }

    groups
}

/// Union-find with union by rank and path compression
#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return;
        }
        if self.rank[left] < self.rank[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if self.rank[left] == self.rank[right] {
            self.rank[left] = self.rank[left].saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<Pair> {
        list.iter().map(|(a, b)| Pair::new(*a, *b)).collect()
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn scan_order_chains_through_shared_ids() {
        let groups = scan_order_groups(&pairs(&[("1", "2"), ("2", "3"), ("4", "5")]));
        assert_eq!(groups, vec![set(&["1", "2", "3"]), set(&["4", "5"])]);
    }

    #[test]
    fn scan_order_does_not_fuse_existing_groups() {
        let groups = scan_order_groups(&pairs(&[("1", "2"), ("3", "4"), ("2", "3")]));
        assert_eq!(groups, vec![set(&["1", "2", "3"]), set(&["3", "4"])]);
    }

    #[test]
    fn scan_order_depends_on_pair_order() {
        let forward = scan_order_groups(&pairs(&[("1", "2"), ("3", "4"), ("2", "3")]));
        let bridged_first = scan_order_groups(&pairs(&[("2", "3"), ("1", "2"), ("3", "4")]));
        assert_ne!(forward, bridged_first);
        assert_eq!(bridged_first, vec![set(&["1", "2", "3", "4"])]);
    }

    #[test]
    fn disjoint_set_fuses_bridged_groups() {
        let groups = disjoint_set_groups(&pairs(&[("1", "2"), ("3", "4"), ("2", "3"), ("5", "6")]));
        assert_eq!(groups, vec![set(&["1", "2", "3", "4"]), set(&["5", "6"])]);
    }

    #[test]
    fn empty_pairs_make_no_groups() {
        assert!(scan_order_groups(&[]).is_empty());
        assert!(disjoint_set_groups(&[]).is_empty());
    }
}
