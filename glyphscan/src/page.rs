//! Scanned page images.

use common_failures::prelude::*;
use image::imageops;
use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::errors::GlyphScanError;
use crate::geom::Rect;

/// A single scanned page: an immutable raster plus its page index.  All
/// glyph cells for the page are carved out of this raster.
pub struct Page {
    index: usize,
    image: RgbImage,
}

impl Page {
    /// Load a page image from disk.  A missing or unreadable file is a
    /// fatal error; there is no partial-batch recovery.
    pub fn open<P: AsRef<Path>>(path: P, index: usize) -> Result<Page> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|_| format!("could not read page image {}", path.display()))?
            .to_rgb8();
        Ok(Page { index, image })
    }

    /// Wrap an in-memory raster as a page.  Mostly useful for tests.
    pub fn from_image(index: usize, image: RgbImage) -> Page {
        Page { index, image }
    }

    /// The page index this raster was loaded from.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The underlying raster.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy the pixels under `rect` out into a new raster.  Panics if the
    /// rectangle extends beyond the page.
    pub fn crop(&self, rect: &Rect) -> RgbImage {
        imageops::crop_imm(
            &self.image,
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height(),
        )
        .to_image()
    }

    /// Restrict this page to a text-area crop, dropping everything outside
    /// it.  Component detection works on cropped pages so that headers and
    /// margins do not pollute the whitespace profiles.
    pub fn cropped(self, rect: &Rect) -> Result<Page> {
        if rect.right() > self.width() || rect.bottom() > self.height() {
            return Err(Error::from(GlyphScanError::BadCrop {
                crop: rect.to_owned(),
                page: self.index,
                width: self.width(),
                height: self.height(),
            }));
        }
        let image = self.crop(rect);
        Ok(Page {
            index: self.index,
            image,
        })
    }
}

/// Substitute a zero-padded page index into a templated filename.  The
/// marker `XXX` is replaced by the three-digit page number, matching the
/// naming of the scanned document sets this tool was written for.
pub fn page_path(template: &str, index: usize) -> PathBuf {
    PathBuf::from(template.replace("XXX", &format!("{:03}", index)))
}

/// Load `count` page images named by `template`, in page order.  Aborts on
/// the first missing or undecodable file.
pub fn load_pages(template: &str, count: usize) -> Result<Vec<Page>> {
    let mut pages = Vec::with_capacity(count);
    for index in 0..count {
        let path = page_path(template, index);
        info!("Loading: {}", path.display());
        pages.push(Page::open(&path, index)?);
    }
    Ok(pages)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::solid_image;
    use image::Rgb;

    #[test]
    fn page_path_zero_fills_the_index() {
        assert_eq!(
            page_path("input/EFTA-XXX.png", 7),
            PathBuf::from("input/EFTA-007.png")
        );
        assert_eq!(
            page_path("input/EFTA-XXX.png", 123),
            PathBuf::from("input/EFTA-123.png")
        );
    }

    #[test]
    fn crop_copies_the_right_pixels() {
        let mut img = solid_image(4, 4, 255);
        img.put_pixel(2, 1, Rgb([7, 7, 7]));
        let page = Page::from_image(0, img);
        let sub = page.crop(&Rect::ltwh(2, 1, 2, 2));
        assert_eq!(sub.dimensions(), (2, 2));
        assert_eq!(sub.get_pixel(0, 0), &Rgb([7, 7, 7]));
        assert_eq!(sub.get_pixel(1, 1), &Rgb([255, 255, 255]));
    }

    #[test]
    fn cropped_rejects_out_of_bounds_regions() {
        let page = Page::from_image(3, solid_image(4, 4, 255));
        assert!(page.cropped(&Rect::ltwh(1, 1, 4, 2)).is_err());
    }

    #[test]
    fn missing_page_file_is_fatal() {
        assert!(Page::open("no-such-page.png", 0).is_err());
    }
}
