//! Trait definitions for the injected distance capabilities.

use super::DistanceMatrix;
use crate::error::CompareError;
use std::path::{Path, PathBuf};

/// Computes all pairwise distances between a set of crops
///
/// The returned matrix must be square with one row per path, symmetric,
/// with a zero diagonal.
pub trait DistanceFunction: Send + Sync {
    fn distances(&self, paths: &[PathBuf]) -> Result<DistanceMatrix, CompareError>;
}

impl<F> DistanceFunction for F
where
    F: Fn(&[PathBuf]) -> Result<DistanceMatrix, CompareError> + Send + Sync,
{
    fn distances(&self, paths: &[PathBuf]) -> Result<DistanceMatrix, CompareError> {
        self(paths)
    }
}

/// Whole-image comparison used to suppress matches between crops whose
/// parent images are themselves near-duplicates
///
/// Higher means less similar, on the comparator's own scale.
pub trait CoarseComparator: Send + Sync {
    fn distance(&self, a: &Path, b: &Path) -> Result<f64, CompareError>;
}

impl<F> CoarseComparator for F
where
    F: Fn(&Path, &Path) -> Result<f64, CompareError> + Send + Sync,
{
    fn distance(&self, a: &Path, b: &Path) -> Result<f64, CompareError> {
        self(a, b)
    }
}
