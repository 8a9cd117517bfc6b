//! Reassembling decoded glyphs into linear text.

use regex::Regex;

use crate::alphabet::UNKNOWN_CHAR;
use crate::glyph::Glyph;
use crate::mapping::Mapping;

/// The result of a decoding pass: the text, plus how many glyphs had no
/// mapping and were emitted as `?`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assembled {
    /// The decoded text.
    pub text: String,
    /// Number of glyphs that resolved to the unknown marker.
    pub unknown_symbols: usize,
}

/// Decode fixed-grid glyphs into one linear string.
///
/// The glyphs must already be in traversal order (row-major within each
/// page, pages in order); the grid's own row structure encodes the line
/// breaks, so no break heuristics apply here.  `prefix` is decoded text
/// known to precede the scanned region (e.g. the part of a payload that
/// appears on an unscanned cover page).  Trailing whitespace is stripped
/// exactly once, and dangling annotation segments delimited by a double
/// dash on both sides are removed: scans sometimes carry handling notes
/// that are not part of the payload.
pub fn assemble_grid(glyphs: &[Glyph], mapping: &Mapping, prefix: &str) -> Assembled {
    lazy_static! {
        static ref ANNOTATION: Regex = Regex::new(r"\s*--.*--").unwrap();
    }

    let mut text = String::with_capacity(prefix.len() + glyphs.len());
    text.push_str(prefix);
    let mut unknown_symbols = 0;
    for glyph in glyphs {
        match mapping.get(glyph.fingerprint()) {
            Some(c) => text.push(c),
            None => {
                unknown_symbols += 1;
                text.push(UNKNOWN_CHAR);
            }
        }
    }
    let text = ANNOTATION.replace_all(text.trim_end(), "").into_owned();
    Assembled {
        text,
        unknown_symbols,
    }
}

/// Wrap `text` into fixed-width lines, one trailing newline per line,
/// including the final short (possibly empty) line.  The fixed width is the
/// grid column count, so the wrapped output mirrors the scanned layout.
///
/// Panics if `width` is zero.
pub fn wrap(text: &str, width: usize) -> String {
    assert!(width > 0, "wrap width must be positive");
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / width + 2);
    for i in 0..=(chars.len() / width) {
        let end = ((i + 1) * width).min(chars.len());
        out.extend(chars[i * width..end].iter());
        out.push('\n');
    }
    out
}

/// Decode component-mode glyphs line by line.
///
/// A new line starts whenever the current glyph sits below the previous
/// glyph's bounding box, or on a different page.  Completed lines are
/// right-trimmed; the final line is pushed as is.
pub fn assemble_lines(glyphs: &[Glyph], mapping: &Mapping) -> Assembled {
    let mut lines: Vec<String> = vec![];
    let mut cur = String::new();
    let mut unknown_symbols = 0;
    for (i, glyph) in glyphs.iter().enumerate() {
        if i > 0 {
            let prev = &glyphs[i - 1];
            if glyph.page() != prev.page() || glyph.rect().top() > prev.rect().bottom() {
                lines.push(cur.trim_end().to_string());
                cur.clear();
            }
        }
        match mapping.get(glyph.fingerprint()) {
            Some(c) => cur.push(c),
            None => {
                unknown_symbols += 1;
                cur.push(UNKNOWN_CHAR);
            }
        }
    }
    lines.push(cur);
    Assembled {
        text: lines.join("\n"),
        unknown_symbols,
    }
}
