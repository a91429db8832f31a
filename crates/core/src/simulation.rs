//! One rendering step of the backdrop.
//!
//! [`render_frame`] is the body of every animation tick: clear, move and
//! draw each particle, then link every near pair. Pair evaluation is
//! O(n²) per frame; the density divisor keeps `n` small enough for that.

use serde::Serialize;

use crate::field::ParticleField;
use crate::surface::Surface;

/// Counters for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Particles updated and drawn.
    pub particles: usize,
    /// Distance checks performed: `n * (n - 1) / 2`.
    pub pairs_checked: usize,
    /// Pairs close enough to be joined by a line.
    pub links_drawn: usize,
}

/// Clears `surface`, advances and draws every particle, then strokes links.
///
/// All particles are moved before any link is measured, so links connect
/// this frame's positions. Self-pairs are skipped.
pub fn render_frame<S: Surface + ?Sized>(field: &mut ParticleField, surface: &mut S) -> FrameStats {
    let (width, height) = (f64::from(field.width()), f64::from(field.height()));
    let config = *field.config();

    surface.clear_rect(
        0.0,
        0.0,
        f64::from(surface.width()),
        f64::from(surface.height()),
    );

    for particle in field.particles_mut() {
        particle.update(width, height, config.edge_policy);
        particle.draw(surface);
    }

    let link = config.link_style;
    let particles = field.particles();
    let mut stats = FrameStats {
        particles: particles.len(),
        ..FrameStats::default()
    };

    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            stats.pairs_checked += 1;
            let distance = a.position().distance(b.position());
            if let Some(opacity) = link.opacity_at(distance) {
                surface.stroke_line(
                    a.position(),
                    b.position(),
                    link.color.with_alpha(opacity),
                    link.line_width,
                );
                stats.links_drawn += 1;
            }
        }
    }

    stats
}
