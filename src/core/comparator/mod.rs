//! # Comparator Module
//!
//! Distance capabilities injected into the matcher.
//!
//! ## Capabilities
//! | Capability          | Input                 | Output                 |
//! |---------------------|-----------------------|------------------------|
//! | `DistanceFunction`  | crop paths            | square distance matrix |
//! | `CoarseComparator`  | two parent image paths| one distance           |
//!
//! Lower distance means more similar. Both are blocking calls; failures
//! propagate to the caller of the matching pass.

mod perceptual;
mod traits;

pub use perceptual::{PerceptualDistance, PerceptualDistanceConfig};
pub use traits::{CoarseComparator, DistanceFunction};

use crate::error::CompareError;

/// Square matrix of pairwise distances, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Build a matrix from rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CompareError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != size {
                return Err(CompareError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
            values.extend(cells);
        }
        Ok(Self { size, values })
    }

    /// Build a matrix by evaluating `f(i, j)` for every cell
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut values = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                values.push(f(i, j));
            }
        }
        Self { size, values }
    }

    /// Number of rows (and columns)
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance between items `i` and `j`, if both are in range
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.values.get(i * self.size + j).copied()
    }

    /// All `(i, j)` cells with distance at or below `threshold`, row-major
    ///
    /// Both orientations of a symmetric match are returned, as is the
    /// diagonal; the pair filter removes them.
    pub fn pairs_within(&self, threshold: f64) -> Vec<(usize, usize)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, distance)| **distance <= threshold)
            .map(|(cell, _)| (cell / self.size, cell % self.size))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let result = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(
            result,
            Err(CompareError::NotSquare { row: 1, len: 1, expected: 2 })
        ));
    }

    #[test]
    fn get_is_bounds_checked() {
        let matrix = DistanceMatrix::from_fn(2, |i, j| (i + j) as f64);
        assert_eq!(matrix.get(1, 1), Some(2.0));
        assert_eq!(matrix.get(2, 0), None);
    }

    #[test]
    fn pairs_within_is_inclusive() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 0.4], vec![0.4, 0.0]]).unwrap();
        let pairs = matrix.pairs_within(0.4);
        assert_eq!(pairs, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn pairs_within_excludes_distances_above_threshold() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 0.41], vec![0.41, 0.0]]).unwrap();
        assert_eq!(matrix.pairs_within(0.4), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn empty_matrix_has_no_pairs() {
        let matrix = DistanceMatrix::from_rows(Vec::new()).unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.pairs_within(1.0).is_empty());
    }
}
