//! # Source Module
//!
//! Loads crop records for parent images and discovers the parent images
//! themselves.
//!
//! ## On-disk layout
//! ```text
//! <crop root>/
//!   faces/<parent file name>/bboxes.json   [[l, t, r, b], ...]
//!   faces/<parent file name>/*.jpg         one crop per box, sorted by name
//!   objects/<parent file name>/...
//! ```
//!
//! A parent image with no records contributes nothing; it is not an error.

mod directory;
mod memory;

pub use directory::DirectoryCropSource;
pub use memory::InMemoryCropSource;

use crate::core::crop::{CropItem, CropKind};
use crate::error::SourceError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognised as parent images
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// Trait for crop record sources
///
/// Implement this trait to load crops from somewhere other than the
/// directory layout (e.g., for testing).
pub trait CropSource: Send + Sync {
    /// Load all crops of `kind` cut from `parent`
    ///
    /// Returns an empty list when no records exist.
    fn load(&self, parent: &Path, kind: CropKind) -> Result<Vec<CropItem>, SourceError>;
}

/// Check whether a path looks like a supported image file
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the image files directly inside `dir`, sorted by path
pub fn discover_parent_images(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| SourceError::ReadFailed {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && is_image_file(path) {
            images.push(path.to_path_buf());
        }
    }
    images.sort();
    Ok(images)
}

/// Random sample of at most `n` parent images, without replacement
///
/// The sample keeps the input's relative order so downstream ids are stable
/// for a given seed.
pub fn sample_parent_images<R: Rng + ?Sized>(paths: &[PathBuf], n: usize, rng: &mut R) -> Vec<PathBuf> {
    if n >= paths.len() {
        return paths.to_vec();
    }
    let indices: Vec<usize> = (0..paths.len()).collect();
    let mut picked: Vec<usize> = indices.choose_multiple(rng, n).copied().collect();
    picked.sort_unstable();
    picked.into_iter().map(|i| paths[i].clone()).collect()
}
