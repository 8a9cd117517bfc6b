//! Fixed-grid glyph extraction.
//!
//! Some document sets lay their glyphs out on a rigid lattice whose
//! geometry is known up front.  Cell boundaries are computed by rounding
//! *absolute* positions, never by accumulating a rounded cell size, so a
//! fractional cell width stays consistent across the whole row: adjacent
//! cells share an edge to within one pixel.

use cast;

use crate::geom::Rect;
use crate::glyph::Glyph;
use crate::page::Page;

/// Fixed grid geometry for a page: where the lattice starts, how big each
/// cell is (possibly fractional), how many cells there are, and which inset
/// of a cell carries the glyph ink.
#[derive(Clone, Debug)]
pub struct GridGeometry {
    /// Pixel offset of cell (0, 0).
    pub offset: (f64, f64),
    /// Cell size in pixels; may be fractional.
    pub cell: (f64, f64),
    /// Grid dimensions as (columns, rows).
    pub dims: (u32, u32),
    /// The sub-rectangle of a cell that is fingerprinted, relative to the
    /// cell's top-left corner.  Trimming the cell border keeps neighboring
    /// ink and grid-line bleed out of the glyph identity.
    pub inset: Rect,
}

impl GridGeometry {
    /// Geometry of the EFTA scanned document set: a 76x65 lattice of
    /// 7.8x15px cells starting at (61, 39), fingerprinted over a 6x11
    /// inset.
    pub fn efta_scan() -> GridGeometry {
        GridGeometry {
            offset: (61.0, 39.0),
            cell: (7.8, 15.0),
            dims: (76, 65),
            inset: Rect::ltwh(1, 2, 6, 11),
        }
    }

    /// The shape every fingerprint produced by this geometry has.
    pub fn fingerprint_shape(&self) -> (u32, u32) {
        (self.inset.width(), self.inset.height())
    }

    /// The pixel rectangle of the single cell at (`col`, `row`).
    pub fn cell_rect(&self, col: u32, row: u32) -> Rect {
        self.span_rect(col, row, 1, 1)
    }

    /// The pixel rectangle covering `span_cols` x `span_rows` cells
    /// starting at (`col`, `row`).
    ///
    /// For a multi-column span the width is the exact distance between the
    /// rounded edges; for a single cell it is the rounded cell width
    /// instead, which can overlap the next cell by one pixel.  Downstream
    /// consumers have always seen single cells at the rounded constant
    /// width, so both behaviors are kept as is.  The height is always the
    /// distance between rounded edges.
    pub fn span_rect(&self, col: u32, row: u32, span_cols: u32, span_rows: u32) -> Rect {
        let x1 = self.x_edge(col);
        let y1 = self.y_edge(row);
        let x2 = self.x_edge(col + span_cols);
        let y2 = self.y_edge(row + span_rows);
        let width = if span_cols > 1 {
            x2 - x1
        } else {
            round_px(self.cell.0)
        };
        Rect::ltwh(x1, y1, width, y2 - y1)
    }

    /// The bounding rectangle of the entire grid.
    pub fn bounds(&self) -> Rect {
        Rect::ltrb(
            self.x_edge(0),
            self.y_edge(0),
            self.x_edge(self.dims.0),
            self.y_edge(self.dims.1),
        )
    }

    fn x_edge(&self, col: u32) -> u32 {
        round_px(self.offset.0 + f64::from(col) * self.cell.0)
    }

    fn y_edge(&self, row: u32) -> u32 {
        round_px(self.offset.1 + f64::from(row) * self.cell.1)
    }
}

fn round_px(v: f64) -> u32 {
    cast::u32(v.round()).expect("grid coordinate out of pixel range")
}

/// Extract every glyph cell of `page` in reading order (row-major: row
/// outer, column inner).  Fingerprints cover the geometry's inset
/// sub-rectangle of each cell.
pub(crate) fn glyphs(geometry: &GridGeometry, page: &Page, position: usize) -> Vec<Glyph> {
    let (cols, rows) = geometry.dims;
    let mut out = Vec::with_capacity(cast::usize(cols) * cast::usize(rows));
    for row in 0..rows {
        for col in 0..cols {
            let cell = geometry.cell_rect(col, row);
            let id_rect = Rect::ltwh(
                cell.left() + geometry.inset.left(),
                cell.top() + geometry.inset.top(),
                geometry.inset.width(),
                geometry.inset.height(),
            );
            out.push(Glyph::new(page, position, cell, &id_rect));
        }
    }
    out
}
