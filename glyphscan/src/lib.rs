//! This crate decodes documents written in a custom glyph cipher, starting
//! from scanned page images.  Each page carries a lattice of small glyphs;
//! every visually distinct glyph is a symbol in an unknown alphabet, and a
//! human-maintained mapping file assigns characters to the glyphs that have
//! been identified so far.
//!
//! ## Example code
//!
//! ```no_run
//! extern crate glyphscan;
//!
//! use glyphscan::{DecodeContext, GridGeometry, Mapping, Page};
//!
//! let geometry = GridGeometry::efta_scan();
//! let pages = glyphscan::load_pages("input/page-XXX.png", 76).unwrap();
//! let mapping =
//!     Mapping::open_coords("mappings.txt", geometry.fingerprint_shape())
//!         .unwrap();
//! let mut ctx = DecodeContext::new(pages);
//! ctx.scan_grid(&geometry).unwrap();
//! let decoded = ctx.decode_grid(&mapping, "");
//! println!("{} unknown symbols", decoded.unknown_symbols);
//! ```
//!
//! ## Pipeline
//!
//! Extraction locates one rectangle per glyph, either from fixed grid
//! geometry ([`GridGeometry`]) or by whitespace smearing and flood fill
//! ([`detect`]).  Every located cell is reduced to a [`Fingerprint`], an
//! exact pixel-intensity sequence; fingerprints deduplicate into an
//! [`Alphabet`] in first-seen order, a [`Mapping`] resolves them to
//! characters, and the assembler linearizes the result in reading order.
//!
//! Recognition is exact equality only.  There is no OCR, no perceptual
//! distance, and no tolerance for noise: a glyph that differs by a single
//! pixel is a new, unmapped symbol.
//!
//! ## Limitations
//!
//! Scans must be axis-aligned; rotated or skewed pages are out of scope, as
//! is any kind of statistical classification.

#![warn(missing_docs)]

extern crate cast;
extern crate common_failures;
#[cfg(test)]
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate quickcheck;
extern crate regex;
extern crate safemem;

mod alphabet;
mod assemble;
mod catalog;
mod ctx;
mod errors;
mod geom;
mod glyph;
mod grid;
mod mapping;
mod page;
mod smear;
#[cfg(test)]
mod test_util;

pub use common_failures::{Error, Result};

pub use self::alphabet::{Alphabet, Resolved, UNKNOWN_CHAR};
pub use self::assemble::{assemble_grid, assemble_lines, wrap, Assembled};
pub use self::catalog::{render_catalog, DEFAULT_PANEL};
pub use self::ctx::DecodeContext;
pub use self::errors::GlyphScanError;
pub use self::geom::{Icing, Rect};
pub use self::glyph::{Fingerprint, Glyph};
pub use self::grid::GridGeometry;
pub use self::mapping::Mapping;
pub use self::page::{load_pages, page_path, Page};
pub use self::smear::{detect, Detection, DEFAULT_WHITE_THRESHOLD};
