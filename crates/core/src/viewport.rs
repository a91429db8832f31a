//! Keeps the surface and the particle field in step with the viewport.
//!
//! Every resize is a full rebuild: the surface is resized and all particles
//! are re-seeded. Resizes are not debounced.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::prng::RandomSource;
use crate::surface::Surface;

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Owns the random source used to re-seed the field on every resize.
#[derive(Debug)]
pub struct ViewportBinding<R> {
    rng: R,
    rebuilds: u64,
}

impl<R: RandomSource> ViewportBinding<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, rebuilds: 0 }
    }

    /// Startup: sizes the surface to the viewport and seeds the first field.
    pub fn bind<S: Surface + ?Sized>(
        &mut self,
        viewport: Viewport,
        surface: &mut S,
        config: FieldConfig,
    ) -> ParticleField {
        let mut field = ParticleField::new(config);
        self.on_resize(viewport, surface, &mut field);
        field
    }

    /// Resize notification: resize the surface, then rebuild the field.
    ///
    /// The divisor is picked from the viewport width, so crossing the
    /// breakpoint changes density as well as area.
    pub fn on_resize<S: Surface + ?Sized>(
        &mut self,
        viewport: Viewport,
        surface: &mut S,
        field: &mut ParticleField,
    ) {
        surface.resize(viewport.width, viewport.height);
        let divisor = field.config().density.divisor_for(viewport.width);
        field.repopulate(surface.width(), surface.height(), divisor, &mut self.rng);
        self.rebuilds += 1;
        debug!(
            "viewport {}x{} -> {} particles (rebuild #{})",
            viewport.width,
            viewport.height,
            field.len(),
            self.rebuilds
        );
    }

    /// Field rebuilds performed, including the one at startup.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
