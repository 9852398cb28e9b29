//! # Crop Module
//!
//! Data model for face and object crops.
//!
//! A crop is a region cut out of a larger parent image. The parent image
//! matters as much as the crop itself: two crops from the same parent are
//! never linked, and neither are crops whose parents are near-duplicates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Axis-aligned bounding box of a crop within its parent image
///
/// Stored on disk as a four-element array `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Scale the box by independent horizontal and vertical ratios
    pub fn scale(&self, ratio_x: f64, ratio_y: f64) -> Self {
        Self {
            left: self.left * ratio_x,
            top: self.top * ratio_y,
            right: self.right * ratio_x,
            bottom: self.bottom * ratio_y,
        }
    }

    /// Translate the box by an offset
    pub fn shift(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Anchor point used when drawing links between crops
    pub fn origin(&self) -> (f64, f64) {
        (self.left, self.top)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.left, bbox.top, bbox.right, bbox.bottom]
    }
}

/// The kind of crop, which also selects the directory records live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    Faces,
    Objects,
}

impl CropKind {
    /// Directory name under the crop root
    pub fn dir_name(&self) -> &'static str {
        match self {
            CropKind::Faces => "faces",
            CropKind::Objects => "objects",
        }
    }

    /// Identifier prefix that keeps matcher outputs from colliding
    pub fn default_prefix(&self) -> &'static str {
        match self {
            CropKind::Faces => "f",
            CropKind::Objects => "o",
        }
    }
}

impl std::fmt::Display for CropKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// One crop record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropItem {
    /// Path to the cropped image file
    pub path: PathBuf,
    /// Location of the crop within its parent image
    pub bbox: BoundingBox,
    /// Identifier of the parent image (its file name)
    pub source_id: String,
    /// Path to the parent image
    pub source_path: PathBuf,
}

impl CropItem {
    /// Create a crop record, deriving the source id from the parent's file name
    pub fn new(path: impl Into<PathBuf>, bbox: BoundingBox, source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        Self {
            path: path.into(),
            bbox,
            source_id: source_id_for(&source_path),
            source_path,
        }
    }
}

/// Derive a parent image identifier from its path
pub fn source_id_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_deserializes_from_array() {
        let bbox: BoundingBox = serde_json::from_str("[10, 20, 110, 220]").unwrap();
        assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 110.0, 220.0));
    }

    #[test]
    fn bbox_serializes_as_array() {
        let json = serde_json::to_string(&BoundingBox::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
    }

    #[test]
    fn scale_applies_ratios_per_axis() {
        let bbox = BoundingBox::new(10.0, 10.0, 20.0, 40.0).scale(0.5, 0.25);
        assert_eq!(bbox, BoundingBox::new(5.0, 2.5, 10.0, 10.0));
    }

    #[test]
    fn shift_moves_all_corners() {
        let bbox = BoundingBox::new(0.0, 0.0, 5.0, 5.0).shift(100.0, 50.0);
        assert_eq!(bbox.origin(), (100.0, 50.0));
        assert_eq!(bbox.right, 105.0);
        assert_eq!(bbox.bottom, 55.0);
    }

    #[test]
    fn source_id_is_parent_file_name() {
        let item = CropItem::new(
            "/data/faces/beach.jpg/0.jpg",
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            "/images/beach.jpg",
        );
        assert_eq!(item.source_id, "beach.jpg");
    }

    #[test]
    fn crop_kind_names() {
        assert_eq!(CropKind::Faces.dir_name(), "faces");
        assert_eq!(CropKind::Objects.default_prefix(), "o");
        assert_eq!(CropKind::Objects.to_string(), "objects");
    }
}
