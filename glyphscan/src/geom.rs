//! Geometry-related types.

use std::cmp::{min, Ordering};
use std::fmt;

/// A rectangle in page pixel space.
///
/// Used both for fixed grid cells and for bounding boxes discovered by
/// component detection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Rect {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Create a rectangle by specifying the left, top, width and height
    /// values.  Panics if the rectangle's right or bottom coordinates
    /// overflow.
    pub fn ltwh(l: u32, t: u32, w: u32, h: u32) -> Rect {
        l.checked_add(w).expect("rectangle right is larger than u32");
        t.checked_add(h).expect("rectangle bottom is larger than u32");
        Rect {
            left: l,
            top: t,
            width: w,
            height: h,
        }
    }

    /// Create a rectangle from left and top (inclusive) and right and
    /// bottom (exclusive) coordinates.  Panics if the rectangle has
    /// negative height or width.
    pub fn ltrb(l: u32, t: u32, r: u32, b: u32) -> Rect {
        Rect {
            left: l,
            top: t,
            width: r.checked_sub(l).expect("rectangle has negative width"),
            height: b.checked_sub(t).expect("rectangle has negative height"),
        }
    }

    /// The left-most edge of the rectangle (inclusive).
    pub fn left(&self) -> u32 {
        self.left
    }

    /// The top-most edge of the rectangle (inclusive).
    pub fn top(&self) -> u32 {
        self.top
    }

    /// The right-most edge of the rectangle (exclusive).
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// The bottom-most edge of the rectangle (exclusive).
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// The width of the rectangle.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the rectangle.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Does this rectangle have area zero?
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Is the specified point in this rectangle?
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.left <= x && x < self.right() && self.top <= y && y < self.bottom()
    }

    /// Compare two rectangles in reading order: a rectangle lying strictly
    /// above another sorts first, and rectangles whose vertical extents
    /// overlap are ordered left to right.
    ///
    /// This is not a total order for arbitrary inputs: when vertical bands
    /// overlap only pairwise, two rectangles may compare `Equal` through an
    /// intermediate one.  Glyph layouts keep each text line in its own
    /// band, which is the case this comparator is defined for.
    pub fn reading_order_cmp(&self, other: &Rect) -> Ordering {
        if other.top() >= self.bottom() {
            Ordering::Less
        } else if self.top() >= other.bottom() {
            Ordering::Greater
        } else {
            self.left.cmp(&other.left)
        }
    }

    /// Expand this rectangle by the given margins, clipping the result to a
    /// `bounds_w` x `bounds_h` page raster.  Used to carve a thumbnail with
    /// a little context around a glyph.
    pub fn pad(&self, icing: Icing, bounds_w: u32, bounds_h: u32) -> Rect {
        let l = self.left.saturating_sub(icing.left);
        let t = self.top.saturating_sub(icing.top);
        let r = min(self.right().saturating_add(icing.right), bounds_w);
        let b = min(self.bottom().saturating_add(icing.bottom), bounds_h);
        Rect::ltrb(l, t, r, b)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}+{}x{}", self.left, self.top, self.width, self.height)
    }
}

/// Per-edge margins added around a glyph rectangle when rendering its
/// thumbnail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Icing {
    /// Margin added to the left of the rectangle.
    pub left: u32,
    /// Margin added above the rectangle.
    pub top: u32,
    /// Margin added to the right of the rectangle.
    pub right: u32,
    /// Margin added below the rectangle.
    pub bottom: u32,
}

impl Default for Icing {
    /// Enough context to recognize a glyph by eye without pulling in its
    /// neighbors.
    fn default() -> Icing {
        Icing {
            left: 1,
            top: 2,
            right: 2,
            bottom: 6,
        }
    }
}
