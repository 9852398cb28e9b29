//! # Layout Module
//!
//! Arranges linked crops on a collage canvas.
//!
//! ## How It Works
//! 1. Order items: the walk order first, then every other item by id
//! 2. Shrink each parent image to fit a fraction of the canvas and scale
//!    the crop's box to match
//! 3. Hand the sizes to a [`Packer`]; images it cannot fit are left out
//! 4. Jitter each position by a little noise and move the box with it
//! 5. Emit a link for every pair whose two ends were placed
//!
//! Drawing itself happens elsewhere; this module only produces geometry.

mod packer;
mod probe;

pub use packer::{Packer, ShelfPacker};
pub use probe::{DimensionProbe, ImageDimensionProbe};

use crate::core::coloring::Color;
use crate::core::crop::{BoundingBox, CropItem};
use crate::core::matcher::Pair;
use crate::error::LayoutError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Canvas geometry and jitter strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Largest share of each canvas dimension one image may take
    pub max_fraction: f64,
    /// Total spread of the positional jitter, in pixels
    pub shakiness: f64,
}

impl CanvasConfig {
    /// Largest size one image may be scaled to
    pub fn max_image_size(&self) -> (u32, u32) {
        (
            (f64::from(self.width) * self.max_fraction) as u32,
            (f64::from(self.height) * self.max_fraction) as u32,
        )
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 800,
            max_fraction: 0.3,
            shakiness: 30.0,
        }
    }
}

/// One image placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    /// Top-left corner of the scaled parent image
    pub position: (i64, i64),
    /// Scaled parent image size
    pub size: (u32, u32),
    /// Crop box in canvas coordinates
    pub bbox: BoundingBox,
    pub color: Option<Color>,
}

/// A connector between two placed crops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub pair: Pair,
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Option<Color>,
}

/// Result of arranging a collage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub placements: Vec<Placement>,
    pub links: Vec<Link>,
}

/// Uniform noise in `[-strength / 2, strength / 2)`
pub fn noise<R: Rng + ?Sized>(rng: &mut R, strength: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * strength
}

/// Shrink `size` to fit within `limit`, keeping the aspect ratio
///
/// Images that already fit are returned unchanged; nothing is enlarged.
pub fn fit_within((width, height): (u32, u32), (max_w, max_h): (u32, u32)) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_w && height <= max_h) {
        return (width, height);
    }
    let scale = (f64::from(max_w) / f64::from(width)).min(f64::from(max_h) / f64::from(height));
    (
        ((f64::from(width) * scale).round() as u32).max(1),
        ((f64::from(height) * scale).round() as u32).max(1),
    )
}

/// Inputs shared by every arrangement on one canvas
pub struct Arranger<'a> {
    pub canvas: CanvasConfig,
    pub packer: &'a dyn Packer,
    pub probe: &'a dyn DimensionProbe,
}

impl Arranger<'_> {
    /// Lay out `items`, placing the ids in `order` first
    pub fn arrange<R: Rng + ?Sized>(
        &self,
        order: &[String],
        items: &BTreeMap<String, CropItem>,
        pairs: &[Pair],
        colors: &BTreeMap<String, Color>,
        rng: &mut R,
    ) -> Result<Arrangement, LayoutError> {
        let sequence = placement_order(order, items)?;
        let limit = self.canvas.max_image_size();

        let mut sizes = Vec::with_capacity(sequence.len());
        let mut boxes = Vec::with_capacity(sequence.len());
        for (_, item) in &sequence {
            let original = self.probe.dimensions(&item.source_path)?;
            let scaled = fit_within(original, limit);
            let ratio = |new: u32, old: u32| if old == 0 { 1.0 } else { f64::from(new) / f64::from(old) };
            boxes.push(
                item.bbox
                    .scale(ratio(scaled.0, original.0), ratio(scaled.1, original.1)),
            );
            sizes.push(scaled);
        }

        let positions = self
            .packer
            .pack(&sizes, (self.canvas.width, self.canvas.height));
        if positions.len() != sequence.len() {
            return Err(LayoutError::PackerMismatch {
                expected: sequence.len(),
                actual: positions.len(),
            });
        }

        let mut placements = Vec::new();
        for (((id, _), position), (size, bbox)) in sequence
            .iter()
            .zip(positions)
            .zip(sizes.into_iter().zip(boxes))
        {
            let Some((x, y)) = position else {
                continue;
            };
            let x = (x + noise(rng, self.canvas.shakiness)).round();
            let y = (y + noise(rng, self.canvas.shakiness)).round();
            placements.push(Placement {
                id: (*id).to_string(),
                position: (x as i64, y as i64),
                size,
                bbox: bbox.shift(x, y),
                color: colors.get(*id).copied(),
            });
        }

        let anchors: HashMap<&str, (f64, f64)> = placements
            .iter()
            .map(|placement| (placement.id.as_str(), placement.bbox.origin()))
            .collect();
        let links = pairs
            .iter()
            .filter_map(|pair| {
                let from = *anchors.get(pair.a())?;
                let to = *anchors.get(pair.b())?;
                Some(Link {
                    pair: pair.clone(),
                    from,
                    to,
                    color: colors.get(pair.a()).copied(),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            offered = sequence.len(),
            placed = placements.len(),
            links = links.len(),
            "arranged collage"
        );
        Ok(Arrangement { placements, links })
    }
}

/// Walk order first, then the remaining items in id order
fn placement_order<'a>(
    order: &'a [String],
    items: &'a BTreeMap<String, CropItem>,
) -> Result<Vec<(&'a str, &'a CropItem)>, LayoutError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sequence = Vec::with_capacity(items.len());

    for id in order {
        let item = items
            .get(id)
            .ok_or_else(|| LayoutError::UnknownItem { id: id.clone() })?;
        if seen.insert(id.as_str()) {
            sequence.push((id.as_str(), item));
        }
    }
    for (id, item) in items {
        if seen.insert(id.as_str()) {
            sequence.push((id.as_str(), item));
        }
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::path::Path;

    /// Every parent image is 1000x500
    struct FixedProbe;

    impl DimensionProbe for FixedProbe {
        fn dimensions(&self, _: &Path) -> Result<(u32, u32), LayoutError> {
            Ok((1000, 500))
        }
    }

    fn items(ids: &[&str]) -> BTreeMap<String, CropItem> {
        ids.iter()
            .map(|id| {
                let item = CropItem::new(
                    format!("{}.jpg", id),
                    BoundingBox::new(100.0, 50.0, 200.0, 150.0),
                    format!("parent-{}.jpg", id),
                );
                (id.to_string(), item)
            })
            .collect()
    }

    fn still_canvas() -> CanvasConfig {
        CanvasConfig {
            width: 1000,
            height: 1000,
            max_fraction: 0.5,
            shakiness: 0.0,
        }
    }

    #[test]
    fn noise_stays_within_strength() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..100 {
            let n = noise(&mut rng, 30.0);
            assert!((-15.0..15.0).contains(&n));
        }
        assert_eq!(noise(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn fit_within_shrinks_preserving_aspect() {
        assert_eq!(fit_within((1000, 500), (420, 240)), (420, 210));
        assert_eq!(fit_within((500, 1000), (420, 240)), (120, 240));
    }

    #[test]
    fn fit_within_never_enlarges() {
        assert_eq!(fit_within((100, 50), (420, 240)), (100, 50));
    }

    #[test]
    fn walk_order_comes_first() {
        let items = items(&["a", "b", "c"]);
        let order = vec!["c".to_string(), "a".to_string()];
        let sequence = placement_order(&order, &items).unwrap();
        let ids: Vec<&str> = sequence.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn unknown_walk_id_is_an_error() {
        let order = vec!["ghost".to_string()];
        let items = items(&["a"]);
        let result = placement_order(&order, &items);
        assert!(matches!(result, Err(LayoutError::UnknownItem { .. })));
    }

    #[test]
    fn boxes_are_scaled_then_shifted() {
        let arranger = Arranger {
            canvas: still_canvas(),
            packer: &ShelfPacker,
            probe: &FixedProbe,
        };
        let items = items(&["a", "b"]);
        let order = vec!["b".to_string()];

        let arrangement = arranger
            .arrange(&order, &items, &[], &BTreeMap::new(), &mut SmallRng::seed_from_u64(0))
            .unwrap();

        // 1000x500 fits 500x500 at half scale
        assert_eq!(arrangement.placements.len(), 2);
        let first = &arrangement.placements[0];
        assert_eq!(first.id, "b");
        assert_eq!(first.size, (500, 250));
        assert_eq!(first.position, (0, 0));
        assert_eq!(first.bbox, BoundingBox::new(50.0, 25.0, 100.0, 75.0));

        let second = &arrangement.placements[1];
        assert_eq!(second.position, (500, 0));
        assert_eq!(second.bbox.origin(), (550.0, 25.0));
    }

    #[test]
    fn links_join_placed_pairs_with_group_color() {
        let arranger = Arranger {
            canvas: still_canvas(),
            packer: &ShelfPacker,
            probe: &FixedProbe,
        };
        let items = items(&["a", "b"]);
        let pairs = vec![Pair::new("a", "b")];
        let red = Color::rgb(255, 0, 0);
        let colors: BTreeMap<String, Color> =
            [("a".to_string(), red), ("b".to_string(), red)].into_iter().collect();

        let arrangement = arranger
            .arrange(&[], &items, &pairs, &colors, &mut SmallRng::seed_from_u64(0))
            .unwrap();

        assert_eq!(arrangement.links.len(), 1);
        let link = &arrangement.links[0];
        assert_eq!(link.from, (50.0, 25.0));
        assert_eq!(link.to, (550.0, 25.0));
        assert_eq!(link.color, Some(red));
        assert!(arrangement.placements.iter().all(|p| p.color == Some(red)));
    }

    #[test]
    fn unplaced_items_drop_their_links() {
        let arranger = Arranger {
            canvas: CanvasConfig {
                width: 600,
                height: 300,
                max_fraction: 1.0,
                shakiness: 0.0,
            },
            packer: &ShelfPacker,
            probe: &FixedProbe,
        };
        let items = items(&["a", "b"]);
        let pairs = vec![Pair::new("a", "b")];

        let arrangement = arranger
            .arrange(&[], &items, &pairs, &BTreeMap::new(), &mut SmallRng::seed_from_u64(0))
            .unwrap();

        assert_eq!(arrangement.placements.len(), 1);
        assert!(arrangement.links.is_empty());
    }

    #[test]
    fn jitter_is_seeded() {
        let arranger = Arranger {
            canvas: CanvasConfig::default(),
            packer: &ShelfPacker,
            probe: &FixedProbe,
        };
        let items = items(&["a", "b", "c"]);

        let run = |seed| {
            arranger
                .arrange(&[], &items, &[], &BTreeMap::new(), &mut SmallRng::seed_from_u64(seed))
                .unwrap()
        };

        assert_eq!(run(4), run(4));
    }

    /// Packer that reports the wrong number of positions
    struct BrokenPacker;

    impl Packer for BrokenPacker {
        fn pack(&self, _: &[(u32, u32)], _: (u32, u32)) -> Vec<Option<(f64, f64)>> {
            Vec::new()
        }
    }

    #[test]
    fn packer_size_mismatch_is_an_error() {
        let arranger = Arranger {
            canvas: still_canvas(),
            packer: &BrokenPacker,
            probe: &FixedProbe,
        };
        let result = arranger.arrange(
            &[],
            &items(&["a"]),
            &[],
            &BTreeMap::new(),
            &mut SmallRng::seed_from_u64(0),
        );
        assert!(matches!(
            result,
            Err(LayoutError::PackerMismatch { expected: 1, actual: 0 })
        ));
    }
}
