//! Navigation bar style toggle.

/// Scroll offset in pixels past which the navbar takes its "scrolled" style.
pub const SCROLL_THRESHOLD: f64 = 50.0;

/// Whether the navbar should carry the `scrolled` class at `scroll_y`.
pub fn navbar_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLL_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_strictly_past_threshold() {
        assert!(!navbar_scrolled(0.0));
        assert!(!navbar_scrolled(50.0));
        assert!(navbar_scrolled(50.5));
        assert!(navbar_scrolled(4000.0));
    }

    #[test]
    fn overscroll_is_not_scrolled() {
        // elastic overscroll reports negative offsets on some browsers
        assert!(!navbar_scrolled(-30.0));
    }
}
