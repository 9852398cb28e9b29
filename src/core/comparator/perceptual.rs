//! Perceptual-hash distance built on the image_hasher crate.
//!
//! Each image is reduced to a gradient hash; the distance between two
//! images is the Hamming distance between their hashes divided by the hash
//! length, so it always lies in `[0, 1]`.
//!
//! Hashing for a distance matrix runs in parallel with rayon. Hashes are
//! collected in input order, so the matrix does not depend on which task
//! finishes first.

use super::{CoarseComparator, DistanceFunction, DistanceMatrix};
use crate::error::CompareError;
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Configuration for [`PerceptualDistance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerceptualDistanceConfig {
    /// Width and height of the hash grid
    pub hash_size: u32,
}

impl Default for PerceptualDistanceConfig {
    fn default() -> Self {
        Self { hash_size: 8 }
    }
}

/// Normalized perceptual-hash distance between image files
///
/// Implements both [`DistanceFunction`] (crop matrices) and
/// [`CoarseComparator`] (parent images). Parent hashes are memoized since the
/// same parents are compared once per candidate pair.
pub struct PerceptualDistance {
    hasher: Hasher,
    memo: RwLock<HashMap<PathBuf, ImageHash>>,
}

impl PerceptualDistance {
    pub fn new(config: PerceptualDistanceConfig) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(config.hash_size, config.hash_size)
            .hash_alg(HashAlg::Gradient)
            .to_hasher();

        Self {
            hasher,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Hash one image file
    pub fn hash_file(&self, path: &Path) -> Result<ImageHash, CompareError> {
        let image = image::open(path).map_err(|e| CompareError::HashFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(self.hasher.hash_image(&image))
    }

    fn memoized_hash(&self, path: &Path) -> Result<ImageHash, CompareError> {
        if let Ok(memo) = self.memo.read() {
            if let Some(hash) = memo.get(path) {
                return Ok(hash.clone());
            }
        }

        let hash = self.hash_file(path)?;
        if let Ok(mut memo) = self.memo.write() {
            memo.insert(path.to_path_buf(), hash.clone());
        }
        Ok(hash)
    }
}

impl Default for PerceptualDistance {
    fn default() -> Self {
        Self::new(PerceptualDistanceConfig::default())
    }
}

/// Hamming distance scaled by the number of hash bits
pub fn normalized_distance(a: &ImageHash, b: &ImageHash) -> f64 {
    let bits = a.as_bytes().len().max(b.as_bytes().len()) * 8;
    if bits == 0 {
        return 0.0;
    }
    f64::from(a.dist(b)) / bits as f64
}

impl DistanceFunction for PerceptualDistance {
    fn distances(&self, paths: &[PathBuf]) -> Result<DistanceMatrix, CompareError> {
        let hashes: Vec<ImageHash> = paths
            .par_iter()
            .map(|path| self.hash_file(path))
            .collect::<Result<_, _>>()?;

        debug!(images = hashes.len(), "hashed crops for distance matrix");

        Ok(DistanceMatrix::from_fn(hashes.len(), |i, j| {
            if i == j {
                0.0
            } else {
                normalized_distance(&hashes[i], &hashes[j])
            }
        }))
    }
}

impl CoarseComparator for PerceptualDistance {
    fn distance(&self, a: &Path, b: &Path) -> Result<f64, CompareError> {
        let hash_a = self.memoized_hash(a)?;
        let hash_b = self.memoized_hash(b)?;
        Ok(normalized_distance(&hash_a, &hash_b))
    }
}
