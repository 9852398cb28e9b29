//! # Coloring Module
//!
//! Assigns every linked crop a color shared with the rest of its cluster.
//!
//! ## How It Works
//! 1. Merge pairs into groups (see [`GroupingMode`])
//! 2. Draw one palette color per group, in group creation order
//! 3. Give every id in the group that color
//!
//! Ids that appear in no pair get no color. The random source is injected,
//! so a seeded RNG pins the outcome.

mod grouper;
mod palette;

pub use grouper::{disjoint_set_groups, scan_order_groups};
pub use palette::{Color, Palette, DEFAULT_COLORS};

use crate::core::matcher::Pair;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// How pairs are merged into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingMode {
    /// First-match-wins scan; order-sensitive, does not fuse groups that a
    /// later pair bridges
    #[default]
    ScanOrder,
    /// Union-find; true transitive closure
    DisjointSet,
}

impl std::fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingMode::ScanOrder => write!(f, "scan-order"),
            GroupingMode::DisjointSet => write!(f, "disjoint-set"),
        }
    }
}

/// Colors clusters of linked ids
#[derive(Debug, Clone, Default)]
pub struct ClusterColorAssigner {
    palette: Palette,
    mode: GroupingMode,
}

impl ClusterColorAssigner {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            mode: GroupingMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: GroupingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Groups formed from `pairs`, in creation order
    pub fn groups(&self, pairs: &[Pair]) -> Vec<BTreeSet<String>> {
        match self.mode {
            GroupingMode::ScanOrder => scan_order_groups(pairs),
            GroupingMode::DisjointSet => disjoint_set_groups(pairs),
        }
    }

    /// Map every id appearing in `pairs` to its group's color
    ///
    /// Under scan-order grouping an id can sit in two groups; the group
    /// created later decides its color.
    pub fn assign<R: Rng + ?Sized>(&self, pairs: &[Pair], rng: &mut R) -> BTreeMap<String, Color> {
        let groups = self.groups(pairs);
        debug!(groups = groups.len(), mode = %self.mode, "grouped pairs");

        let mut colors = BTreeMap::new();
        for group in groups {
            let color = self.palette.choose(rng);
            for id in group {
                colors.insert(id, color);
            }
        }
        colors
    }
}
