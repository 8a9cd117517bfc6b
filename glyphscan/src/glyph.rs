//! Glyph cells and their pixel fingerprints.

use cast;
use image::{Rgb, RgbImage};

use crate::geom::{Icing, Rect};
use crate::page::Page;

/// The grayscale intensity of a pixel: `floor((R + G + B) / 3)`.
pub(crate) fn intensity(px: &Rgb<u8>) -> u8 {
    let Rgb([r, g, b]) = *px;
    // 'as' is safe here because the mean of three bytes fits in a byte.
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
}

/// The identity of a glyph: its shape plus the grayscale intensity of every
/// pixel, in row-major order.
///
/// Fingerprint equality is the sole recognition mechanism in this crate.
/// Two cells are the same glyph iff their fingerprints are equal element
/// for element; the shape is part of the key, so fingerprints of different
/// dimensions are simply unequal rather than a shape error.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Fingerprint {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Fingerprint {
    /// Fingerprint the pixels of `img` under `rect`.  Deterministic: the
    /// same raster always yields a bit-identical fingerprint.  Panics if
    /// the rectangle extends beyond the raster.
    pub fn of_region(img: &RgbImage, rect: &Rect) -> Fingerprint {
        let mut data =
            Vec::with_capacity(cast::usize(rect.width()) * cast::usize(rect.height()));
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                data.push(intensity(img.get_pixel(x, y)));
            }
        }
        Fingerprint {
            width: rect.width(),
            height: rect.height(),
            data,
        }
    }

    /// Fingerprint width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Fingerprint height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The row-major intensity sequence.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Build a fingerprint directly from a shape and intensity sequence.
    /// Returns `None` if the sequence length does not match the shape.
    pub fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Option<Fingerprint> {
        if data.len() != cast::usize(width) * cast::usize(height) {
            return None;
        }
        Some(Fingerprint {
            width,
            height,
            data,
        })
    }
}

/// A located glyph cell: where it sits, and what it looks like.
#[derive(Clone, Debug)]
pub struct Glyph {
    page: usize,
    rect: Rect,
    fingerprint: Fingerprint,
}

impl Glyph {
    /// Carve a glyph out of `page` at `rect`, fingerprinting the region
    /// under `id_rect` (for fixed-grid extraction this is an inset of the
    /// cell; for component extraction it is the cell itself).
    pub(crate) fn new(page: &Page, position: usize, rect: Rect, id_rect: &Rect) -> Glyph {
        Glyph {
            page: position,
            rect,
            fingerprint: Fingerprint::of_region(page.image(), id_rect),
        }
    }

    /// Position of the owning page in the processed batch.
    pub fn page(&self) -> usize {
        self.page
    }

    /// The cell rectangle on the page.
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// The glyph's identity.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The icing-padded rectangle used when rendering this glyph's
    /// thumbnail, clipped to the page bounds.
    pub fn thumbnail_rect(&self, icing: Icing, page_w: u32, page_h: u32) -> Rect {
        self.rect.pad(icing, page_w, page_h)
    }
}
