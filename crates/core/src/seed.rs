//! Reproducible description of a backdrop run.
//!
//! A [`Seed`] captures viewport size, PRNG seed, frame count, and config
//! params. The same `Seed` always yields the same particles and frames.

use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::field::ParticleField;
use crate::frame_loop::{ManualScheduler, SimulationLoop};
use crate::prng::Xorshift64;
use crate::simulation::FrameStats;
use crate::surface::Surface;
use crate::viewport::{Viewport, ViewportBinding};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    #[serde(default)]
    pub frames: u64,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// A seed with default params (`{}`) and zero frames.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            frames: 0,
            params: empty_params(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Parses and validates `params`.
    pub fn config(&self) -> Result<FieldConfig, BackdropError> {
        FieldConfig::from_json(&self.params)
    }

    /// Binds `surface` to the viewport and renders `frames` frames headlessly.
    ///
    /// Returns the field as it stands after the last frame, plus per-frame
    /// stats. The surface holds the last frame's drawing. A viewport needing
    /// more than [`MAX_PARTICLES`](crate::field::MAX_PARTICLES) particles is
    /// `InvalidDimensions`.
    pub fn run<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<(ParticleField, Vec<FrameStats>), BackdropError> {
        let config = self.config()?;
        ParticleField::checked_count(
            self.width,
            self.height,
            config.density.divisor_for(self.width),
        )?;
        let mut binding = ViewportBinding::new(Xorshift64::new(self.seed));
        let mut field = binding.bind(self.viewport(), surface, config);
        let mut frame_loop = SimulationLoop::new(ManualScheduler::new());
        frame_loop.start()?;
        let stats = frame_loop.run_frames(&mut field, surface, self.frames);
        frame_loop.cancel();
        Ok((field, stats))
    }
}
