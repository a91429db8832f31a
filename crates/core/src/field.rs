//! The owned collection of live particles.
//!
//! A [`ParticleField`] is rebuilt from scratch whenever the surface changes
//! size; it is never patched incrementally.

use std::num::NonZeroU64;

use log::{debug, warn};

use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::particle::Particle;
use crate::prng::RandomSource;

/// Upper bound on particles in one field.
///
/// Linking is quadratic, so this is already far past what a frame can draw;
/// a 4K viewport at the wide divisor needs under 700.
pub const MAX_PARTICLES: usize = 10_000;

/// Particles plus the dimensions and divisor they were seeded for.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: u32,
    height: u32,
    divisor: NonZeroU64,
    config: FieldConfig,
}

impl ParticleField {
    /// An empty 0x0 field. Nothing is drawn until it is populated.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            particles: Vec::new(),
            width: 0,
            height: 0,
            divisor: config.density.wide_divisor,
            config,
        }
    }

    /// A field seeded with `floor(width * height / divisor)` random particles.
    pub fn populate<R: RandomSource + ?Sized>(
        width: u32,
        height: u32,
        divisor: NonZeroU64,
        config: FieldConfig,
        rng: &mut R,
    ) -> Self {
        let mut field = Self::new(config);
        field.repopulate(width, height, divisor, rng);
        field
    }

    /// A field holding exactly `particles`, for hosts that place them directly.
    pub fn with_particles(
        width: u32,
        height: u32,
        config: FieldConfig,
        particles: Vec<Particle>,
    ) -> Self {
        Self {
            particles,
            width,
            height,
            divisor: config.density.divisor_for(width),
            config,
        }
    }

    /// Particle count for a surface: `floor(width * height / divisor)`.
    pub fn target_count(width: u32, height: u32, divisor: NonZeroU64) -> usize {
        let area = u64::from(width) * u64::from(height);
        usize::try_from(area / divisor.get()).unwrap_or(usize::MAX)
    }

    /// [`target_count`](Self::target_count), rejecting counts above
    /// [`MAX_PARTICLES`].
    pub fn checked_count(width: u32, height: u32, divisor: NonZeroU64) -> Result<usize, BackdropError> {
        match Self::target_count(width, height, divisor) {
            count if count <= MAX_PARTICLES => Ok(count),
            _ => Err(BackdropError::InvalidDimensions),
        }
    }

    /// Discards every particle and seeds a fresh set for the new dimensions.
    ///
    /// The count is capped at [`MAX_PARTICLES`]; callers that must not be
    /// capped check [`checked_count`](Self::checked_count) first.
    pub fn repopulate<R: RandomSource + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        divisor: NonZeroU64,
        rng: &mut R,
    ) {
        let target = Self::target_count(width, height, divisor);
        let count = target.min(MAX_PARTICLES);
        if count < target {
            warn!("{width}x{height} field wants {target} particles; capped at {count}");
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let style = self.config.style;

        self.particles.clear();
        self.particles.reserve(count);
        self.particles
            .extend((0..count).map(|_| Particle::new(w, h, &style, rng)));
        self.width = width;
        self.height = height;
        self.divisor = divisor;

        debug!("repopulated {width}x{height} field with {count} particles (divisor {divisor})");
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn divisor(&self) -> NonZeroU64 {
        self.divisor
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}
