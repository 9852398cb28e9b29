//! Packing of image rectangles onto the canvas.

/// Places rectangles of the given sizes on a canvas
///
/// Returns one entry per size, in order. `None` means the image did not
/// fit and is left out of the collage.
pub trait Packer: Send + Sync {
    fn pack(&self, sizes: &[(u32, u32)], canvas: (u32, u32)) -> Vec<Option<(f64, f64)>>;
}

/// Fills the canvas row by row, left to right
///
/// A new shelf starts when the next image would overflow the right edge;
/// shelves are as tall as their tallest image.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfPacker;

impl Packer for ShelfPacker {
    fn pack(&self, sizes: &[(u32, u32)], (canvas_w, canvas_h): (u32, u32)) -> Vec<Option<(f64, f64)>> {
        let mut x = 0u32;
        let mut y = 0u32;
        let mut shelf_height = 0u32;

        sizes
            .iter()
            .map(|&(w, h)| {
                if w > canvas_w {
                    return None;
                }
                if x.saturating_add(w) > canvas_w {
                    x = 0;
                    y = y.saturating_add(shelf_height);
                    shelf_height = 0;
                }
                if y.saturating_add(h) > canvas_h {
                    return None;
                }
                let position = (f64::from(x), f64::from(y));
                x += w;
                shelf_height = shelf_height.max(h);
                Some(position)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_rows_then_wraps() {
        let positions = ShelfPacker.pack(&[(40, 10), (40, 20), (40, 10)], (100, 100));
        assert_eq!(
            positions,
            vec![Some((0.0, 0.0)), Some((40.0, 0.0)), Some((0.0, 20.0))]
        );
    }

    #[test]
    fn images_that_do_not_fit_are_skipped() {
        let positions = ShelfPacker.pack(&[(150, 10), (50, 60), (50, 60)], (100, 100));
        assert_eq!(positions[0], None);
        assert_eq!(positions[1], Some((0.0, 0.0)));
        assert_eq!(positions[2], Some((50.0, 0.0)));

        let overflow = ShelfPacker.pack(&[(100, 60), (100, 60)], (100, 100));
        assert_eq!(overflow, vec![Some((0.0, 0.0)), None]);
    }
}
