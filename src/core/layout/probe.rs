//! Image dimension lookup.

use crate::error::LayoutError;
use std::path::Path;

/// Reports the pixel size of an image file
pub trait DimensionProbe: Send + Sync {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), LayoutError>;
}

/// Reads dimensions from the image header with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDimensionProbe;

impl DimensionProbe for ImageDimensionProbe {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), LayoutError> {
        image::image_dimensions(path).map_err(|e| LayoutError::DimensionsUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
