//! Test-only utilities.

use image::{Rgb, RgbImage};

use crate::geom::Rect;
use crate::page::Page;

/// A `w` x `h` raster filled with one gray level.
pub fn solid_image(w: u32, h: u32, level: u8) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([level, level, level]))
}

/// A white page with solid gray blocks painted on it, one per
/// `(rect, level)` pair.
pub fn page_with_blocks(w: u32, h: u32, blocks: &[(Rect, u8)]) -> Page {
    let mut img = solid_image(w, h, 255);
    for &(ref rect, level) in blocks {
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                img.put_pixel(x, y, Rgb([level, level, level]));
            }
        }
    }
    Page::from_image(0, img)
}
