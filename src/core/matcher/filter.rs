//! Pruning of raw index pairs into canonical candidate pairs.
//!
//! Cheap checks (self pairs, same parent image) run before the coarse
//! comparator, which is only called for pairs that survive them.

use super::IndexPair;
use crate::core::comparator::CoarseComparator;
use crate::core::crop::CropItem;
use crate::error::CompareError;
use std::collections::BTreeSet;
use tracing::debug;

/// Default coarse distance at or below which two parent images count as
/// near-duplicates of each other
pub const DEFAULT_COARSE_THRESHOLD: f64 = 0.5;

/// Removes redundant and uninteresting pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairFilter {
    /// Parents whose coarse distance is at or below this are too similar
    coarse_threshold: f64,
}

impl PairFilter {
    pub fn new(coarse_threshold: f64) -> Self {
        Self { coarse_threshold }
    }

    pub fn coarse_threshold(&self) -> f64 {
        self.coarse_threshold
    }

    /// Canonicalize, deduplicate and prune `raw` pairs of indices into `items`
    ///
    /// Output is in ascending order of `(low, high)`. Pairs naming an index
    /// outside `items` are dropped. Any comparator failure aborts the pass.
    pub fn filter<I, P>(
        &self,
        raw: I,
        items: &[CropItem],
        coarse: &dyn CoarseComparator,
    ) -> Result<Vec<IndexPair>, CompareError>
    where
        I: IntoIterator<Item = P>,
        P: Into<IndexPair>,
    {
        let canonical: BTreeSet<IndexPair> = raw.into_iter().map(Into::into).collect();
        let candidates = canonical.len();

        let mut kept = Vec::new();
        let mut coarse_calls = 0usize;
        for pair in canonical {
            if pair.is_self_pair() {
                continue;
            }
            let (Some(a), Some(b)) = (items.get(pair.low()), items.get(pair.high())) else {
                continue;
            };
            if a.source_id == b.source_id {
                continue;
            }

            coarse_calls += 1;
            let parent_distance = coarse.distance(&a.source_path, &b.source_path)?;
            if parent_distance > self.coarse_threshold {
                kept.push(pair);
            }
        }

        debug!(
            candidates,
            coarse_calls,
            kept = kept.len(),
            "filtered candidate pairs"
        );
        Ok(kept)
    }
}

impl Default for PairFilter {
    fn default() -> Self {
        Self::new(DEFAULT_COARSE_THRESHOLD)
    }
}
