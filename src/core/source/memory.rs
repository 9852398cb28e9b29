//! In-memory crop source for testing and embedding.

use super::CropSource;
use crate::core::crop::{CropItem, CropKind};
use crate::error::SourceError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Crop source backed by a map from (parent, kind) to records
#[derive(Debug, Default, Clone)]
pub struct InMemoryCropSource {
    records: HashMap<(PathBuf, CropKind), Vec<CropItem>>,
}

impl InMemoryCropSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a crop under its own parent image
    pub fn insert(&mut self, kind: CropKind, item: CropItem) {
        self.records
            .entry((item.source_path.clone(), kind))
            .or_default()
            .push(item);
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, kind: CropKind, item: CropItem) -> Self {
        self.insert(kind, item);
        self
    }
}

impl CropSource for InMemoryCropSource {
    fn load(&self, parent: &Path, kind: CropKind) -> Result<Vec<CropItem>, SourceError> {
        Ok(self
            .records
            .get(&(parent.to_path_buf(), kind))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crop::BoundingBox;

    #[test]
    fn returns_inserted_records_in_order() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let source = InMemoryCropSource::new()
            .with(CropKind::Faces, CropItem::new("a0.jpg", bbox, "a.jpg"))
            .with(CropKind::Faces, CropItem::new("a1.jpg", bbox, "a.jpg"));

        let items = source.load(Path::new("a.jpg"), CropKind::Faces).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].path, PathBuf::from("a1.jpg"));
    }

    #[test]
    fn unknown_parent_is_empty() {
        let source = InMemoryCropSource::new();
        assert!(source.load(Path::new("x.jpg"), CropKind::Objects).unwrap().is_empty());
    }
}
