//! # Matcher Module
//!
//! Turns pairwise crop distances into deduplicated, cross-referenced pairs.
//!
//! ## How It Works
//! 1. Compute the full distance matrix with the injected distance function
//! 2. Keep every cell with distance at or below the threshold
//! 3. Canonicalize and prune the cells with [`PairFilter`]
//! 4. Keep only the items some surviving pair refers to
//! 5. Optionally namespace identifiers with a prefix
//!
//! Results of several matchers (faces, objects) share one namespace once
//! each uses its own prefix; see [`MatchOutput::merge`].

mod filter;

pub use filter::{PairFilter, DEFAULT_COARSE_THRESHOLD};

use crate::core::comparator::{CoarseComparator, DistanceFunction};
use crate::core::crop::CropItem;
use crate::error::CompareError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// An unordered pair of item positions, stored with the smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexPair(usize, usize);

impl IndexPair {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn low(&self) -> usize {
        self.0
    }

    pub fn high(&self) -> usize {
        self.1
    }

    pub fn is_self_pair(&self) -> bool {
        self.0 == self.1
    }
}

impl From<(usize, usize)> for IndexPair {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

/// A similarity link between two item identifiers
///
/// Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pair(pub String, pub String);

impl Pair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self(a.into(), b.into())
    }

    pub fn a(&self) -> &str {
        &self.0
    }

    pub fn b(&self) -> &str {
        &self.1
    }
}

/// Surviving pairs plus the items they reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutput {
    pub pairs: Vec<Pair>,
    pub items: BTreeMap<String, CropItem>,
}

impl MatchOutput {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Append another matcher's results
    ///
    /// Identifiers are expected not to collide; use distinct prefixes.
    pub fn merge(&mut self, other: MatchOutput) {
        self.pairs.extend(other.pairs);
        self.items.extend(other.items);
    }
}

/// Finds similar crops among one collection
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatcher {
    threshold: f64,
    prefix: Option<String>,
    filter: PairFilter,
}

impl SimilarityMatcher {
    /// Create a matcher; distances at or below `threshold` are similar
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            prefix: None,
            filter: PairFilter::default(),
        }
    }

    /// Prefix every identifier, e.g. `"f"` turns index 3 into `"f3"`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Replace the default pair filter
    pub fn with_filter(mut self, filter: PairFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Identifier for the item at `index`
    pub fn id_for(&self, index: usize) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, index),
            None => index.to_string(),
        }
    }

    /// Match `items` against each other
    ///
    /// Empty input returns an empty output without calling `distance`.
    pub fn match_items(
        &self,
        items: &[CropItem],
        distance: &dyn DistanceFunction,
        coarse: &dyn CoarseComparator,
    ) -> Result<MatchOutput, CompareError> {
        if items.is_empty() {
            return Ok(MatchOutput::default());
        }

        let paths: Vec<PathBuf> = items.iter().map(|item| item.path.clone()).collect();
        let matrix = distance.distances(&paths)?;
        if matrix.len() != items.len() {
            return Err(CompareError::DimensionMismatch {
                expected: items.len(),
                actual: matrix.len(),
            });
        }

        let candidates = matrix.pairs_within(self.threshold);
        debug!(
            items = items.len(),
            candidates = candidates.len(),
            threshold = self.threshold,
            "thresholded distance matrix"
        );

        let pairs = self.filter.filter(candidates, items, coarse)?;

        let referenced: BTreeSet<usize> = pairs
            .iter()
            .flat_map(|pair| [pair.low(), pair.high()])
            .collect();

        let output = MatchOutput {
            pairs: pairs
                .iter()
                .map(|pair| Pair(self.id_for(pair.low()), self.id_for(pair.high())))
                .collect(),
            items: referenced
                .into_iter()
                .map(|index| (self.id_for(index), items[index].clone()))
                .collect(),
        };

        info!(
            prefix = self.prefix.as_deref().unwrap_or(""),
            pairs = output.pairs.len(),
            items = output.items.len(),
            "matched crops"
        );
        Ok(output)
    }
}
