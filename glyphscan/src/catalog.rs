//! The glyph catalog: a review sheet of every distinct glyph.
//!
//! The catalog image is the round-trip point of the manual workflow: each
//! distinct glyph is tiled into a roughly square grid in first-seen order,
//! a human annotates the tiles, and the resulting character sequence feeds
//! back in as a positional [`Mapping`](crate::Mapping).

use cast;
use image::imageops;
use image::{Rgb, RgbImage};

use crate::alphabet::Alphabet;
use crate::geom::Icing;
use crate::glyph::Glyph;
use crate::page::Page;

/// Background color of the catalog sheet; garish on purpose, so tile
/// boundaries and undersized thumbnails stand out.
const BACKGROUND: Rgb<u8> = Rgb([0, 255, 255]);

/// Default tile size, comfortably larger than the glyphs it frames.
pub const DEFAULT_PANEL: (u32, u32) = (10, 16);

/// Render the catalog sheet for every distinct glyph in `alphabet`, using
/// the first occurrence among `glyphs` as each tile's thumbnail.  Tiles are
/// laid out in first-seen order in a `round(0.5 + sqrt(n))` column grid.
pub fn render_catalog(
    pages: &[Page],
    glyphs: &[Glyph],
    alphabet: &Alphabet,
    panel: (u32, u32),
    icing: Icing,
) -> RgbImage {
    let mut firsts: Vec<Option<&Glyph>> = vec![None; alphabet.len()];
    for glyph in glyphs {
        if let Some(id) = alphabet.id(glyph.fingerprint()) {
            if firsts[id].is_none() {
                firsts[id] = Some(glyph);
            }
        }
    }

    let cols = grid_side(alphabet.len());
    let mut canvas = RgbImage::from_pixel(cols * panel.0, cols * panel.1, BACKGROUND);
    for (i, glyph) in firsts.iter().enumerate() {
        let glyph = match glyph {
            Some(glyph) => glyph,
            None => continue,
        };
        let i = cast::u32(i).expect("catalog index out of range");
        let x = (i % cols) * panel.0;
        let y = (i / cols) * panel.1;
        let page = &pages[glyph.page()];
        let thumb = page.crop(&glyph.thumbnail_rect(icing, page.width(), page.height()));
        imageops::replace(&mut canvas, &thumb, i64::from(x), i64::from(y));
    }
    canvas
}

/// Columns (and rows) of the catalog grid: the smallest roughly-square side
/// for `n` tiles, never zero.
fn grid_side(n: usize) -> u32 {
    let side = (0.5 + (n as f64).sqrt()).round();
    cast::u32(side).expect("catalog side out of range").max(1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Rect;
    use crate::test_util::page_with_blocks;

    #[test]
    fn grid_side_is_roughly_square() {
        assert_eq!(grid_side(0), 1);
        assert_eq!(grid_side(1), 2);
        assert_eq!(grid_side(2), 2);
        assert_eq!(grid_side(4), 3);
        assert_eq!(grid_side(100), 11);
    }

    #[test]
    fn catalog_tiles_distinct_glyphs_in_first_seen_order() {
        let page = page_with_blocks(
            20,
            8,
            &[(Rect::ltwh(2, 2, 2, 2), 0), (Rect::ltwh(10, 2, 2, 2), 90)],
        );
        let rects = [
            Rect::ltwh(2, 2, 2, 2),
            Rect::ltwh(10, 2, 2, 2),
            Rect::ltwh(2, 2, 2, 2), // duplicate of the first glyph
        ];
        let mut alphabet = Alphabet::new();
        let mut glyphs = vec![];
        for rect in &rects {
            let glyph = Glyph::new(&page, 0, rect.clone(), rect);
            alphabet.register(glyph.fingerprint());
            glyphs.push(glyph);
        }

        let pages = vec![page];
        let catalog = render_catalog(&pages, &glyphs, &alphabet, (6, 8), Icing::default());
        // Two distinct glyphs -> a 2x2 tile sheet.
        assert_eq!(catalog.dimensions(), (12, 16));
        // Tile 0 holds the black glyph, tile 1 the gray one.  With the
        // default icing the glyph pixel itself sits at +1,+2 inside the
        // tile.
        assert_eq!(catalog.get_pixel(1, 2), &Rgb([0, 0, 0]));
        assert_eq!(catalog.get_pixel(7, 2), &Rgb([90, 90, 90]));
        // The background shows through where no thumbnail was blitted.
        assert_eq!(catalog.get_pixel(11, 15), &BACKGROUND);
    }
}
