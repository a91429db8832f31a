//! A single drifting point of the backdrop.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::config::{EdgePolicy, ParticleStyle};
use crate::prng::RandomSource;
use crate::surface::Surface;

/// Position, constant velocity, radius, and color.
///
/// Velocity changes only by sign flips under [`EdgePolicy::Bounce`]; radius
/// and color never change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    color: Rgba,
}

impl Particle {
    /// Samples a particle uniformly inside a `width` x `height` surface.
    ///
    /// Draw order from `rng` is x, y, radius, vx, vy, so a fixed seed places
    /// every particle identically.
    pub fn new<R: RandomSource + ?Sized>(
        width: f64,
        height: f64,
        style: &ParticleStyle,
        rng: &mut R,
    ) -> Self {
        let x = rng.next_f64() * width;
        let y = rng.next_f64() * height;
        let radius = rng.next_range(style.radius[0], style.radius[1]);
        let vx = rng.next_range(style.speed[0], style.speed[1]);
        let vy = rng.next_range(style.speed[0], style.speed[1]);
        Self {
            position: DVec2::new(x, y),
            velocity: DVec2::new(vx, vy),
            radius,
            color: style.color,
        }
    }

    /// A particle with explicit state.
    pub fn from_parts(position: DVec2, velocity: DVec2, radius: f64, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            radius,
            color,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// One explicit Euler step, then the edge policy.
    ///
    /// The step is per call, not per second: perceived speed follows the
    /// display refresh rate.
    pub fn update(&mut self, width: f64, height: f64, policy: EdgePolicy) {
        self.position += self.velocity;
        match policy {
            EdgePolicy::Wrap => {
                // Four one-sided checks, not a modulo.
                let p = &mut self.position;
                if p.x > width {
                    p.x = 0.0;
                }
                if p.x < 0.0 {
                    p.x = width;
                }
                if p.y > height {
                    p.y = 0.0;
                }
                if p.y < 0.0 {
                    p.y = height;
                }
            }
            EdgePolicy::Bounce => {
                if self.position.x < 0.0 || self.position.x > width {
                    self.velocity.x = -self.velocity.x;
                }
                if self.position.y < 0.0 || self.position.y > height {
                    self.velocity.y = -self.velocity.y;
                }
            }
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.position, self.radius, self.color);
    }
}
