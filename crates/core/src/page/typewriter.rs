//! Looping type-then-delete text effect.
//!
//! Pure state machine: each [`Typewriter::tick`] yields the text to show and
//! how long to wait before the next tick. The host owns the timer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;

/// Phrases shown in the hero section by default.
pub const DEFAULT_PHRASES: [&str; 3] = [
    "AI and ML Engineer",
    "Full Stack Developer",
    "Digital Marketer",
];

/// Delays between ticks, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterTimings {
    pub type_ms: u64,
    pub delete_ms: u64,
    /// Hold after a phrase is fully typed.
    pub hold_full_ms: u64,
    /// Hold after a phrase is fully deleted.
    pub hold_empty_ms: u64,
}

impl Default for TypewriterTimings {
    fn default() -> Self {
        Self {
            type_ms: 80,
            delete_ms: 40,
            hold_full_ms: 2500,
            hold_empty_ms: 500,
        }
    }
}

/// What to display now, and when to tick again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterFrame {
    pub text: String,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<String>,
    timings: TypewriterTimings,
    phrase: usize,
    /// Visible length in chars.
    shown: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new<I, S>(phrases: I, timings: TypewriterTimings) -> Result<Self, BackdropError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(BackdropError::NoPhrases);
        }
        Ok(Self {
            phrases,
            timings,
            phrase: 0,
            shown: 0,
            deleting: false,
        })
    }

    /// First phrase, nothing shown, typing.
    pub fn reset(&mut self) {
        self.phrase = 0;
        self.shown = 0;
        self.deleting = false;
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase]
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn tick(&mut self) -> TypewriterFrame {
        let len = self.phrases[self.phrase].chars().count();
        let mut delay_ms;

        if self.deleting {
            self.shown = self.shown.saturating_sub(1);
            delay_ms = self.timings.delete_ms;
        } else {
            self.shown += 1;
            delay_ms = self.timings.type_ms;
        }
        let text: String = self.phrases[self.phrase].chars().take(self.shown).collect();

        if !self.deleting && self.shown >= len {
            self.deleting = true;
            delay_ms = self.timings.hold_full_ms;
        } else if self.deleting && self.shown == 0 {
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            delay_ms = self.timings.hold_empty_ms;
        }

        TypewriterFrame {
            text,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
            timings: TypewriterTimings::default(),
            phrase: 0,
            shown: 0,
            deleting: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn run(tw: &mut Typewriter, ticks: usize) -> Vec<(String, Duration)> {
        (0..ticks)
            .map(|_| {
                let f = tw.tick();
                (f.text, f.delay)
            })
            .collect()
    }

    #[test]
    fn empty_phrase_list_is_rejected() {
        let none: [&str; 0] = [];
        assert!(matches!(
            Typewriter::new(none, TypewriterTimings::default()),
            Err(BackdropError::NoPhrases)
        ));
    }

    #[test]
    fn types_holds_deletes_and_advances() {
        let mut tw = Typewriter::new(["ab", "c"], TypewriterTimings::default()).unwrap();
        let frames = run(&mut tw, 8);
        assert_eq!(
            frames,
            vec![
                ("a".to_string(), ms(80)),
                ("ab".to_string(), ms(2500)),
                ("a".to_string(), ms(40)),
                ("".to_string(), ms(500)),
                ("c".to_string(), ms(2500)),
                ("".to_string(), ms(500)),
                ("a".to_string(), ms(80)),
                ("ab".to_string(), ms(2500)),
            ]
        );
    }

    #[test]
    fn counts_chars_not_bytes() {
        let mut tw = Typewriter::new(["héllo"], TypewriterTimings::default()).unwrap();
        let texts: Vec<String> = run(&mut tw, 5).into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, ["h", "hé", "hél", "héll", "héllo"]);
        assert!(tw.is_deleting());
    }

    #[test]
    fn default_cycles_through_all_phrases() {
        let mut tw = Typewriter::default();
        let mut seen = Vec::new();
        for _ in 0..200 {
            let f = tw.tick();
            if f.delay == ms(2500) {
                seen.push(f.text);
            }
        }
        assert_eq!(&seen[..3], &DEFAULT_PHRASES.map(String::from)[..]);
        assert_eq!(seen[3], DEFAULT_PHRASES[0]);
    }

    #[test]
    fn empty_phrase_does_not_stall() {
        let mut tw = Typewriter::new(["", "x"], TypewriterTimings::default()).unwrap();
        let frames = run(&mut tw, 3);
        assert_eq!(frames[0], ("".to_string(), ms(2500)));
        assert_eq!(frames[1], ("".to_string(), ms(500)));
        assert_eq!(frames[2], ("x".to_string(), ms(2500)));
    }

    #[test]
    fn reset_restarts_first_phrase() {
        let mut tw = Typewriter::default();
        run(&mut tw, 40);
        tw.reset();
        assert_eq!(tw.current_phrase(), DEFAULT_PHRASES[0]);
        assert_eq!(tw.tick().text, "A");
    }
}
