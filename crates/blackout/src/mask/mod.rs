//! Mask painting: turns regions into opaque pixels.
//!
//! Coordinates stay real-valued until this step. Box corners are rounded
//! outward (`floor(x), floor(y), ceil(x+w), ceil(y+h)`) so the painted
//! rectangle always covers the mathematical one.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{CoordinateSpace, MaskRegion};

/// Painter options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Fill color for production masks.
    pub mask_color: [u8; 3],
    /// Render semi-transparent per-category rectangles instead of opaque
    /// fills. Never use for output that leaves the building.
    pub debug_mode: bool,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            mask_color: [0, 0, 0],
            debug_mode: false,
        }
    }
}

/// Paint all regions onto copies of the page images.
///
/// `scale_dims` holds the per-page dimensions used to scale normalized
/// boxes (OCR-reported page size when available, image size otherwise),
/// indexed by page order. Inputs are never mutated. Regions referring to a
/// page that does not exist are skipped with a warning.
pub fn paint_regions(
    pages: &[RgbaImage],
    regions: &[MaskRegion],
    scale_dims: &[(f64, f64)],
    config: &PainterConfig,
) -> Vec<RgbaImage> {
    let mut output: Vec<RgbaImage> = pages.to_vec();

    for region in regions {
        let Some(page_idx) = (region.page as usize).checked_sub(1) else {
            warn!(page = region.page, "mask region on page 0 skipped");
            continue;
        };
        let Some(image) = output.get_mut(page_idx) else {
            warn!(
                page = region.page,
                pages = pages.len(),
                "mask region beyond last page skipped"
            );
            continue;
        };

        let bbox = match region.bounding_box.space {
            CoordinateSpace::Pixel => region.bounding_box,
            CoordinateSpace::Normalized => {
                let (w, h) = scale_dims
                    .get(page_idx)
                    .copied()
                    .unwrap_or((f64::from(image.width()), f64::from(image.height())));
                region.bounding_box.to_pixels(w, h)
            }
        };

        // Outward rounding, clamped to the image.
        let x0 = bbox.x.floor().max(0.0) as u32;
        let y0 = bbox.y.floor().max(0.0) as u32;
        let x1 = (bbox.right().ceil().max(0.0) as u32).min(image.width());
        let y1 = (bbox.bottom().ceil().max(0.0) as u32).min(image.height());
        if x0 >= x1 || y0 >= y1 {
            continue;
        }

        if config.debug_mode {
            let [r, g, b] = category_color(&region.category);
            for y in y0..y1 {
                for x in x0..x1 {
                    let px = image.get_pixel(x, y).0;
                    let blend = |base: u8, over: u8| -> u8 {
                        ((u16::from(base) * 11 + u16::from(over) * 5) / 16) as u8
                    };
                    image.put_pixel(x, y, Rgba([blend(px[0], r), blend(px[1], g), blend(px[2], b), 255]));
                }
            }
        } else {
            let [r, g, b] = config.mask_color;
            let fill = Rgba([r, g, b, 255]);
            for y in y0..y1 {
                for x in x0..x1 {
                    image.put_pixel(x, y, fill);
                }
            }
        }
    }

    output
}

/// Stable per-category debug color.
fn category_color(category: &str) -> [u8; 3] {
    const PALETTE: [[u8; 3]; 8] = [
        [220, 38, 38],
        [234, 88, 12],
        [202, 138, 4],
        [22, 163, 74],
        [8, 145, 178],
        [37, 99, 235],
        [124, 58, 237],
        [190, 24, 93],
    ];
    let mut hasher = DefaultHasher::new();
    category.hash(&mut hasher);
    PALETTE[(hasher.finish() % PALETTE.len() as u64) as usize]
}
