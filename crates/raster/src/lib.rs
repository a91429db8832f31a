#![deny(unsafe_code)]
//! CPU rendering of backdrop frames.
//!
//! [`pixel::Pixmap`] is a software [`Surface`](backdrop_core::Surface) for
//! headless hosts; [`snapshot`] writes one out as PNG.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use backdrop_core::Rgba;

pub use pixel::Pixmap;

/// Page background the backdrop is composited over.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::new(10, 10, 20, 1.0);
