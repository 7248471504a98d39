//! Vertical compositing: stack every page into one tall image.
//!
//! The canvas is as wide as the widest page and as tall as all pages
//! together. Pages are placed top to bottom in document order; a page
//! narrower than the canvas is centred horizontally (floor division, so an
//! odd leftover pixel goes to the right margin) and the margins keep the
//! background colour.
//!
//! Layout is computed and validated before a single pixel is allocated, so a
//! malformed page aborts the whole composition instead of shifting every
//! later page.

use crate::error::CompositionError;
use crate::page::PageSequence;
use image::{imageops, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Where one page lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// 0-based page index.
    pub page_index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Canvas size plus one placement per page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
}

/// Compute the canvas size and page offsets for `pages`.
pub fn layout(pages: &PageSequence) -> Result<Layout, CompositionError> {
    if pages.is_empty() {
        return Err(CompositionError::EmptySequence);
    }

    let mut width: u32 = 0;
    let mut height: u64 = 0;
    for page in pages {
        let (w, h) = (page.width(), page.height());
        if w == 0 || h == 0 {
            return Err(CompositionError::InvalidPageDimensions {
                page: page.page_num(),
                width: w,
                height: h,
            });
        }
        width = width.max(w);
        height += u64::from(h);
    }

    let too_large = CompositionError::CanvasTooLarge {
        width: u64::from(width),
        height,
    };
    let height = u32::try_from(height).map_err(|_| too_large)?;
    // The RGB buffer length must fit in usize as well.
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3))
        .ok_or(CompositionError::CanvasTooLarge {
            width: u64::from(width),
            height: u64::from(height),
        })?;

    let mut y = 0;
    let placements = pages
        .iter()
        .map(|page| {
            let p = Placement {
                page_index: page.index(),
                x: (width - page.width()) / 2,
                y,
                width: page.width(),
                height: page.height(),
            };
            y += page.height();
            p
        })
        .collect();

    Ok(Layout {
        width,
        height,
        placements,
    })
}

/// The stacked result of [`compose`].
#[derive(Debug, Clone)]
pub struct CombinedImage {
    image: RgbImage,
    placements: Vec<Placement>,
}

impl CombinedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Per-page offsets, in page order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Encode the finished canvas as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, CompositionError> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(CompositionError::Encode)?;
        debug!("Encoded combined image → {} bytes PNG", buf.len());
        Ok(buf)
    }
}

/// Stack `pages` onto a `background`-filled canvas.
pub fn compose(pages: &PageSequence, background: [u8; 3]) -> Result<CombinedImage, CompositionError> {
    compose_with(pages, background, |_| {})
}

/// Like [`compose`], calling `on_page` with the 1-based page number after
/// each page is blitted.
pub fn compose_with(
    pages: &PageSequence,
    background: [u8; 3],
    mut on_page: impl FnMut(usize),
) -> Result<CombinedImage, CompositionError> {
    let Layout {
        width,
        height,
        placements,
    } = layout(pages)?;
    debug!(
        "Compositing {} pages onto {}x{} canvas",
        placements.len(),
        width,
        height
    );

    let mut canvas = RgbImage::from_pixel(width, height, Rgb(background));
    for (page, placement) in pages.iter().zip(&placements) {
        let rgb = page.image().to_rgb8();
        imageops::replace(
            &mut canvas,
            &rgb,
            i64::from(placement.x),
            i64::from(placement.y),
        );
        on_page(page.page_num());
    }

    Ok(CombinedImage {
        image: canvas,
        placements,
    })
}
