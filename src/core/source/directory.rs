//! Crop records stored as per-parent directories.

use super::CropSource;
use crate::core::crop::{source_id_for, BoundingBox, CropItem, CropKind};
use crate::error::SourceError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File holding the bounding boxes for one parent image
const BBOXES_FILE: &str = "bboxes.json";

/// Extension of the crop image files
const CROP_EXTENSION: &str = "jpg";

/// Reads crops from `<root>/<kind>/<parent file name>/`
#[derive(Debug, Clone)]
pub struct DirectoryCropSource {
    root: PathBuf,
}

impl DirectoryCropSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the records for one parent image
    pub fn record_dir(&self, parent: &Path, kind: CropKind) -> PathBuf {
        self.root.join(kind.dir_name()).join(source_id_for(parent))
    }

    fn read_bboxes(path: &Path) -> Result<Option<Vec<BoundingBox>>, SourceError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SourceError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| SourceError::InvalidRecords {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn list_crops(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let mut crops = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| SourceError::ReadFailed {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            let is_crop = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CROP_EXTENSION));
            if entry.file_type().is_file() && is_crop {
                crops.push(path.to_path_buf());
            }
        }
        crops.sort_by_cached_key(|path| crop_order_key(path));
        Ok(crops)
    }
}

/// Numbered crops (`0.jpg`, `1.jpg`, ...) in numeric order, then the rest by path
fn crop_order_key(path: &Path) -> (u8, u64, PathBuf) {
    let number = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<u64>().ok());
    match number {
        Some(n) => (0, n, path.to_path_buf()),
        None => (1, 0, path.to_path_buf()),
    }
}

impl CropSource for DirectoryCropSource {
    fn load(&self, parent: &Path, kind: CropKind) -> Result<Vec<CropItem>, SourceError> {
        let dir = self.record_dir(parent, kind);
        let Some(bboxes) = Self::read_bboxes(&dir.join(BBOXES_FILE))? else {
            return Ok(Vec::new());
        };

        let crops = Self::list_crops(&dir)?;
        if crops.len() != bboxes.len() {
            warn!(
                dir = %dir.display(),
                crops = crops.len(),
                boxes = bboxes.len(),
                "crop and box counts differ; extra entries ignored"
            );
        }

        let items: Vec<CropItem> = crops
            .into_iter()
            .zip(bboxes)
            .map(|(crop, bbox)| CropItem::new(crop, bbox, parent))
            .collect();

        debug!(parent = %parent.display(), %kind, crops = items.len(), "loaded crops");
        Ok(items)
    }
}
