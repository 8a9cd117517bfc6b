//! The main decoding driver.

use common_failures::prelude::*;

use crate::alphabet::Alphabet;
use crate::assemble::{assemble_grid, assemble_lines, Assembled};
use crate::errors::GlyphScanError;
use crate::glyph::Glyph;
use crate::grid::{self, GridGeometry};
use crate::mapping::Mapping;
use crate::page::Page;
use crate::smear::{self, Detection};

/// A `DecodeContext` represents one document's worth of scanned pages that
/// we want to decode.  Create it with the loaded pages, run one of the two
/// scan passes to extract and register glyphs, then decode against a
/// mapping (possibly several times, as the mapping file grows).
pub struct DecodeContext {
    pages: Vec<Page>,
    alphabet: Alphabet,
    glyphs: Vec<Glyph>,
}

impl DecodeContext {
    /// Create a context over `pages`.
    pub fn new(pages: Vec<Page>) -> DecodeContext {
        DecodeContext {
            pages,
            alphabet: Alphabet::new(),
            glyphs: vec![],
        }
    }

    /// The pages in this context, in processing order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Every extracted glyph, in traversal order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The alphabet of distinct glyphs seen so far.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Extract glyphs from every page on a fixed grid, registering each
    /// fingerprint.  Fails up front if the grid does not fit on a page.
    pub fn scan_grid(&mut self, geometry: &GridGeometry) -> Result<()> {
        let bounds = geometry.bounds();
        for (position, page) in self.pages.iter().enumerate() {
            if bounds.right() > page.width() || bounds.bottom() > page.height() {
                return Err(Error::from(GlyphScanError::GeometryOutOfBounds {
                    grid: bounds,
                    page: position,
                    width: page.width(),
                    height: page.height(),
                }));
            }
        }
        for position in 0..self.pages.len() {
            let page = &self.pages[position];
            trace!("extracting grid glyphs from page {}", page.index());
            let glyphs = grid::glyphs(geometry, page, position);
            self.register(glyphs);
        }
        self.log_totals();
        Ok(())
    }

    /// Detect glyph rectangles by whitespace smearing, then extract and
    /// register one glyph per page and rectangle.  `reference` selects the
    /// pages whose profiles drive detection; empty means all of them.
    pub fn scan_components(
        &mut self,
        reference: &[usize],
        white_thresh: f64,
    ) -> Result<Detection> {
        let detection = smear::detect(&self.pages, reference, white_thresh)?;
        let glyphs = smear::glyphs(&self.pages, &detection);
        self.register(glyphs);
        self.log_totals();
        Ok(detection)
    }

    /// Decode a grid scan against `mapping`.  See
    /// [`assemble_grid`](crate::assemble_grid) for the `prefix` and cleanup
    /// semantics.
    pub fn decode_grid(&self, mapping: &Mapping, prefix: &str) -> Assembled {
        let out = assemble_grid(&self.glyphs, mapping, prefix);
        info!("decoded {} unknown symbol(s)", out.unknown_symbols);
        out
    }

    /// Decode a component scan against `mapping`, line by line.
    pub fn decode_lines(&self, mapping: &Mapping) -> Assembled {
        let out = assemble_lines(&self.glyphs, mapping);
        info!("decoded {} unknown symbol(s)", out.unknown_symbols);
        out
    }

    fn register(&mut self, glyphs: Vec<Glyph>) {
        for glyph in &glyphs {
            self.alphabet.register(glyph.fingerprint());
        }
        self.glyphs.extend(glyphs);
    }

    fn log_totals(&self) {
        info!(
            "total glyph count: {}, unique glyphs: {}",
            self.glyphs.len(),
            self.alphabet.len()
        );
    }
}
