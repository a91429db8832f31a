#![deny(unsafe_code)]
//! Core of the particle backdrop: a field of drifting points joined by faint
//! proximity lines, redrawn every display frame.
//!
//! Provides [`Particle`], [`ParticleField`], the [`Surface`] drawing trait,
//! the per-frame [`render_frame`] step, the stoppable [`SimulationLoop`],
//! [`ViewportBinding`] for resize re-seeding, the injectable
//! [`RandomSource`] / [`Xorshift64`], and the small page widgets in [`page`].

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod page;
pub mod params;
pub mod particle;
pub mod prng;
pub mod seed;
pub mod simulation;
pub mod surface;
pub mod viewport;

pub use color::Rgba;
pub use config::{DensityPolicy, EdgePolicy, FieldConfig, LinkStyle, ParticleStyle};
pub use error::BackdropError;
pub use field::{ParticleField, MAX_PARTICLES};
pub use frame_loop::{CancelToken, FrameScheduler, LoopState, ManualScheduler, SimulationLoop};
pub use particle::Particle;
pub use prng::{RandomSource, Xorshift64};
pub use seed::Seed;
pub use simulation::{render_frame, FrameStats};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use viewport::{Viewport, ViewportBinding};
