//! Domain-specific error values, declared using `failure`.

use crate::geom::Rect;

/// Errors specific to glyph extraction.  I/O and decoding failures are
/// reported through `common_failures` context wrappers instead.
#[derive(Debug, Fail)]
pub enum GlyphScanError {
    /// The fixed grid geometry does not fit on a page raster.
    #[fail(
        display = "grid {} does not fit on page {} ({}x{})",
        grid, page, width, height
    )]
    GeometryOutOfBounds {
        /// Bounding rectangle of the whole grid.
        grid: Rect,
        /// Index of the offending page.
        page: usize,
        /// Page width in pixels.
        width: u32,
        /// Page height in pixels.
        height: u32,
    },

    /// Component detection needs every page to share one raster size.
    #[fail(
        display = "page {} is {}x{}, but page 0 is {}x{}",
        page, width, height, expected_width, expected_height
    )]
    PageSizeMismatch {
        /// Index of the offending page.
        page: usize,
        /// Actual page width.
        width: u32,
        /// Actual page height.
        height: u32,
        /// Width of the first page.
        expected_width: u32,
        /// Height of the first page.
        expected_height: u32,
    },

    /// A detection reference index pointed past the loaded pages.
    #[fail(
        display = "reference page {} out of range (loaded {} pages)",
        index, count
    )]
    BadReferencePage {
        /// The out-of-range index.
        index: usize,
        /// Number of loaded pages.
        count: usize,
    },

    /// A text-area crop rectangle extends beyond the page raster.
    #[fail(
        display = "crop {} does not fit on page {} ({}x{})",
        crop, page, width, height
    )]
    BadCrop {
        /// The requested crop rectangle.
        crop: Rect,
        /// Index of the offending page.
        page: usize,
        /// Page width in pixels.
        width: u32,
        /// Page height in pixels.
        height: u32,
    },
}
