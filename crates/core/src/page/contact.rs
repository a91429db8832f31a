//! Simulated contact form submission.
//!
//! There is no network request. Submitting shows a "sending" state, then a
//! success message, then resets the form: `Idle -> Sending -> Sent -> Idle`.

use std::time::Duration;

use crate::color::Rgba;

/// Time spent in [`FormPhase::Sending`].
pub const SEND_DELAY: Duration = Duration::from_millis(1500);
/// Time the success message stays up.
pub const RESET_DELAY: Duration = Duration::from_millis(3000);

pub const SENDING_LABEL: &str = "Sending...";
pub const SENT_LABEL: &str = "Msg Sent!";
pub const SENT_STATUS: &str = "Thanks for reaching out! This is a demo form.";
/// Emerald success color (`#10b981`).
pub const SUCCESS_COLOR: Rgba = Rgba::new(16, 185, 129, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Sending,
    Sent,
}

/// What the button and status line should look like.
///
/// `None` colors mean "revert to the stylesheet".
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub button_label: String,
    pub button_opacity: f64,
    pub button_background: Option<Rgba>,
    pub status: String,
    pub status_color: Option<Rgba>,
    /// Clear the form's inputs.
    pub reset_fields: bool,
}

/// A view to apply, and the timer to arm afterwards, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FormStep {
    pub view: FormView,
    pub next_timer: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    phase: FormPhase,
    original_label: String,
}

impl ContactForm {
    /// `original_label` is the button text restored after the reset.
    pub fn new(original_label: impl Into<String>) -> Self {
        Self {
            phase: FormPhase::Idle,
            original_label: original_label.into(),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Starts a submission. Ignored unless idle.
    pub fn submit(&mut self) -> Option<FormStep> {
        if self.phase != FormPhase::Idle {
            return None;
        }
        self.phase = FormPhase::Sending;
        Some(FormStep {
            view: FormView {
                button_label: SENDING_LABEL.to_owned(),
                button_opacity: 0.7,
                button_background: None,
                status: String::new(),
                status_color: None,
                reset_fields: false,
            },
            next_timer: Some(SEND_DELAY),
        })
    }

    /// The armed timer fired. Ignored when idle.
    pub fn timer_fired(&mut self) -> Option<FormStep> {
        match self.phase {
            FormPhase::Idle => None,
            FormPhase::Sending => {
                self.phase = FormPhase::Sent;
                Some(FormStep {
                    view: FormView {
                        button_label: SENT_LABEL.to_owned(),
                        button_opacity: 0.7,
                        button_background: Some(SUCCESS_COLOR),
                        status: SENT_STATUS.to_owned(),
                        status_color: Some(SUCCESS_COLOR),
                        reset_fields: false,
                    },
                    next_timer: Some(RESET_DELAY),
                })
            }
            FormPhase::Sent => {
                self.phase = FormPhase::Idle;
                Some(FormStep {
                    view: FormView {
                        button_label: self.original_label.clone(),
                        button_opacity: 1.0,
                        button_background: None,
                        status: String::new(),
                        status_color: None,
                        reset_fields: true,
                    },
                    next_timer: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut form = ContactForm::new("Send Message");

        let sending = form.submit().unwrap();
        assert_eq!(form.phase(), FormPhase::Sending);
        assert_eq!(sending.view.button_label, "Sending...");
        assert_eq!(sending.view.button_opacity, 0.7);
        assert_eq!(sending.next_timer, Some(Duration::from_millis(1500)));

        let sent = form.timer_fired().unwrap();
        assert_eq!(form.phase(), FormPhase::Sent);
        assert_eq!(sent.view.button_label, "Msg Sent!");
        assert_eq!(sent.view.button_background, Some(Rgba::from_css("#10b981").unwrap()));
        assert_eq!(sent.view.status, SENT_STATUS);
        assert_eq!(sent.next_timer, Some(Duration::from_millis(3000)));

        let reset = form.timer_fired().unwrap();
        assert_eq!(form.phase(), FormPhase::Idle);
        assert_eq!(reset.view.button_label, "Send Message");
        assert_eq!(reset.view.button_opacity, 1.0);
        assert!(reset.view.button_background.is_none());
        assert!(reset.view.status.is_empty());
        assert!(reset.view.reset_fields);
        assert!(reset.next_timer.is_none());
    }

    #[test]
    fn submit_while_busy_is_ignored() {
        let mut form = ContactForm::new("Send");
        form.submit().unwrap();
        assert!(form.submit().is_none());
        form.timer_fired().unwrap();
        assert!(form.submit().is_none());
        assert_eq!(form.phase(), FormPhase::Sent);
    }

    #[test]
    fn stray_timer_when_idle_is_ignored() {
        let mut form = ContactForm::new("Send");
        assert!(form.timer_fired().is_none());
        assert_eq!(form.phase(), FormPhase::Idle);
    }

    #[test]
    fn can_submit_again_after_reset() {
        let mut form = ContactForm::new("Send");
        form.submit();
        form.timer_fired();
        form.timer_fired();
        assert!(form.submit().is_some());
    }
}
