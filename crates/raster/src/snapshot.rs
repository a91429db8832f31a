//! PNG snapshot of a rendered [`Pixmap`].
//!
//! Feature-gated behind `png` (default on) so WASM builds can depend on this
//! crate without pulling in `image`. The compositing itself lives in
//! [`crate::pixel`].

use backdrop_core::{BackdropError, Rgba};
use std::path::Path;

use crate::pixel::Pixmap;
use backdrop_core::Surface;

/// Writes `pixmap` composited over `background` as a PNG.
///
/// Returns `BackdropError::InvalidDimensions` for a zero-sized pixmap, or
/// `BackdropError::Io` on write failure.
pub fn write_png(pixmap: &Pixmap, background: Rgba, path: &Path) -> Result<(), BackdropError> {
    if pixmap.width() == 0 || pixmap.height() == 0 {
        return Err(BackdropError::InvalidDimensions);
    }
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.to_rgba8(background))
        .ok_or_else(|| BackdropError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| BackdropError::Io(e.to_string()))
}
