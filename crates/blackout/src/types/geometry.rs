//! Axis-aligned bounding boxes in page-local coordinates.
//!
//! Two coordinate conventions exist in the wild: absolute pixels and
//! normalized `[0, 1]` fractions of the page. They are distinguished at the
//! type level by [`CoordinateSpace`] and must never be mixed in a union.

use serde::{Deserialize, Serialize};

use crate::{BlackoutError, Result};

/// Coordinate convention of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Absolute pixel coordinates.
    #[default]
    Pixel,
    /// Fractions of the page dimensions, all components in `[0, 1]`.
    Normalized,
}

/// Axis-aligned rectangle on a single page.
///
/// Invariant: `width >= 0`, `height >= 0`, all components finite. Construct
/// through [`BoundingBox::pixel`] / [`BoundingBox::normalized`] to have the
/// invariant checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Page the rectangle lives on (1-based).
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Coordinate convention; defaults to pixels when absent in serialized form.
    #[serde(default)]
    pub space: CoordinateSpace,
}

impl BoundingBox {
    /// Create a pixel-space box, validating the geometry invariant.
    pub fn pixel(page: u32, x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let bbox = Self {
            page,
            x,
            y,
            width,
            height,
            space: CoordinateSpace::Pixel,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Create a normalized-space box; all components must be in `[0, 1]`.
    pub fn normalized(page: u32, x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let bbox = Self {
            page,
            x,
            y,
            width,
            height,
            space: CoordinateSpace::Normalized,
        };
        bbox.validate()?;
        for (name, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(BlackoutError::InvalidGeometry {
                    message: format!("normalized {name} out of [0, 1]: {v}"),
                });
            }
        }
        Ok(bbox)
    }

    /// Check the geometry invariant: finite components, non-negative extent,
    /// 1-based page.
    pub fn validate(&self) -> Result<()> {
        let components = [self.x, self.y, self.width, self.height];
        if components.iter().any(|v| !v.is_finite()) {
            return Err(BlackoutError::InvalidGeometry {
                message: format!("non-finite bounding box on page {}: {self:?}", self.page),
            });
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(BlackoutError::InvalidGeometry {
                message: format!(
                    "negative extent on page {}: width={} height={}",
                    self.page, self.width, self.height
                ),
            });
        }
        if self.page == 0 {
            return Err(BlackoutError::InvalidGeometry {
                message: "page numbers are 1-based; got page 0".to_string(),
            });
        }
        Ok(())
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True iff the two boxes share interior area on the same page.
    ///
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.page == other.page
            && self.space == other.space
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow the box by `pad_x` / `pad_y` on each side.
    ///
    /// With `clamp_dims = Some((w, h))` the result is clamped to
    /// `[0, w] x [0, h]`; otherwise only the origin is clamped at zero so
    /// the non-negativity invariant holds.
    pub fn inflate(&self, pad_x: f64, pad_y: f64, clamp_dims: Option<(f64, f64)>) -> Self {
        let x0 = (self.x - pad_x).max(0.0);
        let y0 = (self.y - pad_y).max(0.0);
        let mut x1 = self.right() + pad_x;
        let mut y1 = self.bottom() + pad_y;
        if let Some((max_w, max_h)) = clamp_dims {
            x1 = x1.min(max_w);
            y1 = y1.min(max_h);
        }
        Self {
            page: self.page,
            x: x0,
            y: y0,
            width: (x1 - x0).max(0.0),
            height: (y1 - y0).max(0.0),
            space: self.space,
        }
    }

    /// Scale a normalized box to pixel space using the page's pixel
    /// dimensions. Pixel-space boxes are returned unchanged.
    pub fn to_pixels(&self, page_width: f64, page_height: f64) -> Self {
        match self.space {
            CoordinateSpace::Pixel => *self,
            CoordinateSpace::Normalized => Self {
                page: self.page,
                x: self.x * page_width,
                y: self.y * page_height,
                width: self.width * page_width,
                height: self.height * page_height,
                space: CoordinateSpace::Pixel,
            },
        }
    }
}

/// Geometric union of boxes: `min(x), min(y), max(x+w), max(y+h)`.
///
/// # Errors
///
/// Fails with [`BlackoutError::InvalidGeometry`] on an empty slice or when
/// the boxes span more than one page or mix coordinate spaces.
pub fn union(boxes: &[BoundingBox]) -> Result<BoundingBox> {
    let first = boxes.first().ok_or_else(|| BlackoutError::InvalidGeometry {
        message: "union of zero boxes".to_string(),
    })?;
    for bbox in &boxes[1..] {
        if bbox.page != first.page {
            return Err(BlackoutError::InvalidGeometry {
                message: format!("union across pages {} and {}", first.page, bbox.page),
            });
        }
        if bbox.space != first.space {
            return Err(BlackoutError::InvalidGeometry {
                message: "union across coordinate spaces".to_string(),
            });
        }
    }

    let x0 = boxes.iter().map(|b| b.x).fold(f64::INFINITY, f64::min);
    let y0 = boxes.iter().map(|b| b.y).fold(f64::INFINITY, f64::min);
    let x1 = boxes.iter().map(|b| b.right()).fold(f64::NEG_INFINITY, f64::max);
    let y1 = boxes.iter().map(|b| b.bottom()).fold(f64::NEG_INFINITY, f64::max);

    Ok(BoundingBox {
        page: first.page,
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
        space: first.space,
    })
}
