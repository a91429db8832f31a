//! Error types for the backdrop core.
//!
//! The per-frame path never fails. These errors come from configuration,
//! loop control, and snapshot I/O.

use thiserror::Error;

/// Errors produced by backdrop operations.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// The viewport implies more than `MAX_PARTICLES` particles, or a raster
    /// target had a zero dimension.
    #[error("invalid dimensions: too many particles for the viewport, or an empty raster")]
    InvalidDimensions,

    /// A density divisor of zero would make the particle count undefined.
    #[error("invalid density divisor: {0} (must be non-zero)")]
    InvalidDivisor(u64),

    /// Link threshold, falloff, or opacity out of range.
    #[error("invalid link style: {0}")]
    InvalidLinkStyle(String),

    /// A sampling range had `min > max`.
    #[error("invalid range for '{name}': min {min} > max {max}")]
    InvalidRange { name: String, min: f64, max: f64 },

    /// An edge policy or link style name was not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// `start()` was called on a loop that is already running.
    #[error("simulation loop is already running")]
    LoopAlreadyRunning,

    /// The typewriter was given nothing to type.
    #[error("typewriter needs at least one phrase")]
    NoPhrases,

    /// Writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}
