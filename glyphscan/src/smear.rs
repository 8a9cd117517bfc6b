//! Component-based glyph extraction.
//!
//! When the lattice geometry is unknown, glyph boundaries are discovered
//! from the pages themselves: pixel intensity is smeared along each axis to
//! find the whitespace gaps between rows and columns of glyphs, the two
//! profiles are multiplied back into a contrast-enhanced mask, and the
//! non-white blobs of that mask are flood-filled into bounding rectangles.

use cast;
use common_failures::prelude::*;
use image::GrayImage;
use safemem::write_bytes;

use crate::errors::GlyphScanError;
use crate::geom::Rect;
use crate::glyph::Glyph;
use crate::page::Page;

/// Profile values above this fraction of full white mark a whitespace row
/// or column.  The comparison is strictly greater-than: a profile exactly
/// at the threshold still counts as ink.
pub const DEFAULT_WHITE_THRESHOLD: f64 = 0.95;

/// Everything component detection learned about a batch of pages.  The
/// intermediate profiles and mask are kept around so callers can dump them
/// for manual inspection when a document set misbehaves.
pub struct Detection {
    /// Mean per-column whitespace intensity, one entry per pixel column.
    pub x_profile: Vec<f64>,
    /// Mean per-row whitespace intensity, one entry per pixel row.
    pub y_profile: Vec<f64>,
    /// The smeared whitespace mask the rectangles were filled from.
    pub mask: GrayImage,
    /// Discovered glyph bounding rectangles, in reading order.
    pub rects: Vec<Rect>,
}

/// Per-axis whitespace profiles of a single raster: each entry is the mean
/// of `intensity / 255` along the opposite axis.
fn profiles(page: &Page) -> (Vec<f64>, Vec<f64>) {
    let img = page.image();
    let (w, h) = img.dimensions();
    let mut xs = vec![0.0; cast::usize(w)];
    let mut ys = vec![0.0; cast::usize(h)];
    for (x, y, px) in img.enumerate_pixels() {
        let image::Rgb([r, g, b]) = *px;
        let v = (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0 / 255.0;
        xs[cast::usize(x)] += v;
        ys[cast::usize(y)] += v;
    }
    for v in &mut xs {
        *v /= f64::from(h);
    }
    for v in &mut ys {
        *v /= f64::from(w);
    }
    (xs, ys)
}

/// Elementwise mean of the per-axis profiles of several same-sized pages.
fn mean_profiles(pages: &[&Page]) -> (Vec<f64>, Vec<f64>) {
    let (w, h) = pages[0].image().dimensions();
    let mut xs = vec![0.0; cast::usize(w)];
    let mut ys = vec![0.0; cast::usize(h)];
    for page in pages {
        let (px, py) = profiles(page);
        for (total, v) in xs.iter_mut().zip(px) {
            *total += v;
        }
        for (total, v) in ys.iter_mut().zip(py) {
            *total += v;
        }
    }
    let n = pages.len() as f64;
    for v in &mut xs {
        *v /= n;
    }
    for v in &mut ys {
        *v /= n;
    }
    (xs, ys)
}

/// Build the smeared whitespace mask: pure white wherever either axis
/// profile clears `white_thresh`, and the product of the two profiles
/// (darkened toward ink) everywhere else.
fn mask(x_profile: &[f64], y_profile: &[f64], white_thresh: f64) -> GrayImage {
    let w = x_profile.len();
    let h = y_profile.len();
    let mut data = vec![0u8; w * h];
    for (y, row) in data.chunks_mut(w).enumerate() {
        if y_profile[y] > white_thresh {
            write_bytes(row, 0xff);
            continue;
        }
        for (x, out) in row.iter_mut().enumerate() {
            *out = if x_profile[x] > white_thresh {
                0xff
            } else {
                let v = (x_profile[x] * y_profile[y] * 255.0).round();
                cast::u8(v).expect("profile product out of byte range")
            };
        }
    }
    let w = cast::u32(w).expect("mask too wide");
    let h = cast::u32(h).expect("mask too tall");
    GrayImage::from_raw(w, h, data).expect("mask buffer has the wrong size")
}

/// Flood-fill every non-white blob of `mask` into a bounding rectangle and
/// return the rectangles in reading order.
fn find_rects(mask: &GrayImage) -> Vec<Rect> {
    let (w, h) = mask.dimensions();
    let mut seen = vec![false; cast::usize(w) * cast::usize(h)];
    let mut rects = vec![];
    for y in 0..h {
        for x in 0..w {
            let at = cast::usize(y) * cast::usize(w) + cast::usize(x);
            if seen[at] {
                continue;
            }
            seen[at] = true;
            if mask.get_pixel(x, y)[0] != 0xff {
                rects.push(fill(mask, (x, y), &mut seen));
            }
        }
    }
    trace!("flood fill found {} components", rects.len());
    rects.sort_by(|a, b| a.reading_order_cmp(b));
    rects
}

/// One flood fill pass with an explicit worklist.  Recursion would be
/// cleaner but overflows the stack on large page scans.  Visits 4-connected
/// neighbors only; white pixels touched on the component's border are
/// marked seen in passing.
fn fill(mask: &GrayImage, start: (u32, u32), seen: &mut [bool]) -> Rect {
    let (w, h) = mask.dimensions();
    let (mut min_x, mut max_x) = (start.0, start.0);
    let (mut min_y, mut max_y) = (start.1, start.1);
    let mut work = vec![start];
    while let Some((x, y)) = work.pop() {
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for &(nx, ny) in &neighbors {
            if nx >= w || ny >= h {
                continue;
            }
            let at = cast::usize(ny) * cast::usize(w) + cast::usize(nx);
            if seen[at] {
                continue;
            }
            seen[at] = true;
            if mask.get_pixel(nx, ny)[0] == 0xff {
                continue;
            }
            work.push((nx, ny));
            min_x = min_x.min(nx);
            max_x = max_x.max(nx);
            min_y = min_y.min(ny);
            max_y = max_y.max(ny);
        }
    }
    Rect::ltrb(min_x, min_y, max_x + 1, max_y + 1)
}

/// Run component detection over `pages`.
///
/// The whitespace profiles are averaged over the pages named by
/// `reference`; an empty slice means every page contributes (some pages of
/// a set are too sparse or too dense to make good references).  All pages
/// must share one raster size.
pub fn detect(pages: &[Page], reference: &[usize], white_thresh: f64) -> Result<Detection> {
    if pages.is_empty() {
        return Err(format_err!("component detection needs at least one page"));
    }
    let (w, h) = pages[0].image().dimensions();
    for (i, page) in pages.iter().enumerate() {
        if page.image().dimensions() != (w, h) {
            return Err(Error::from(GlyphScanError::PageSizeMismatch {
                page: i,
                width: page.width(),
                height: page.height(),
                expected_width: w,
                expected_height: h,
            }));
        }
    }

    let refs: Vec<&Page> = if reference.is_empty() {
        pages.iter().collect()
    } else {
        reference
            .iter()
            .map(|&i| {
                pages.get(i).ok_or_else(|| {
                    Error::from(GlyphScanError::BadReferencePage {
                        index: i,
                        count: pages.len(),
                    })
                })
            })
            .collect::<Result<_>>()?
    };
    debug!(
        "smearing {} reference page(s) at threshold {}",
        refs.len(),
        white_thresh
    );

    let (x_profile, y_profile) = mean_profiles(&refs);
    let mask = mask(&x_profile, &y_profile, white_thresh);
    let rects = find_rects(&mask);
    info!("detected {} glyph rectangles", rects.len());

    Ok(Detection {
        x_profile,
        y_profile,
        mask,
        rects,
    })
}

/// Materialize one glyph per (page, rectangle) pair, rectangle-major within
/// each page.  Fingerprints cover the full discovered rectangle.
pub(crate) fn glyphs(pages: &[Page], detection: &Detection) -> Vec<Glyph> {
    let mut out = Vec::with_capacity(pages.len() * detection.rects.len());
    for (position, page) in pages.iter().enumerate() {
        for rect in &detection.rects {
            out.push(Glyph::new(page, position, rect.to_owned(), rect));
        }
    }
    out
}
