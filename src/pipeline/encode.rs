//! Image encoding: `DynamicImage` → PNG bytes.
//!
//! PNG is lossless, so rendered text stays crisp, and the `image` crate's
//! encoder is deterministic: the same pixels always give the same bytes.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// MIME type of everything this module produces.
pub const PNG_MIME: &str = "image/png";

/// Encode an image as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}
