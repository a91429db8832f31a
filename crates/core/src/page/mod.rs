//! Page widgets that run alongside the backdrop.
//!
//! Each is a small state machine; the browser binding owns timers and DOM
//! writes.

pub mod contact;
pub mod navbar;
pub mod typewriter;

pub use contact::{ContactForm, FormPhase, FormStep, FormView};
pub use navbar::navbar_scrolled;
pub use typewriter::{Typewriter, TypewriterFrame, TypewriterTimings};
