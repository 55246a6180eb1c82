//! Selection Transition - time-sampled chip appearance
//!
//! Selecting a chip fades its colors to the selected palette while it pops
//! to 115% scale over 200ms, then settles back to 100% over 100ms.
//! Deselecting fades the colors back with no pop.
//!
//! Nothing ticks in the background: the renderer samples the transition
//! with the frame's timestamp. Restarting mid-flight begins from whatever
//! the current frame shows, and once the durations elapse the sample is
//! exactly the latest target, so rapid toggling always ends in the right
//! state.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use spark_tags::animate::{Appearance, SelectionTransition};
//! use spark_tags::Rgba;
//!
//! let idle = Appearance::new(Rgba::BLUE, Rgba::WHITE);
//! let picked = Appearance::new(Rgba::GRAY, Rgba::BLACK);
//!
//! let now = Instant::now();
//! let mut transition = SelectionTransition::settled(idle);
//! transition.start(picked, true, now);
//!
//! assert!(transition.is_running(now + Duration::from_millis(100)));
//! assert_eq!(transition.sample(now + Duration::from_secs(1)), picked);
//! ```

use std::time::{Duration, Instant};

use crate::types::Rgba;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Color fade (and scale-up when selecting).
pub const SELECT_DURATION: Duration = Duration::from_millis(200);

/// Scale settle after a selection pop.
pub const SETTLE_DURATION: Duration = Duration::from_millis(100);

/// Peak scale of the selection pop.
pub const SELECTED_SCALE: f32 = 1.15;

// =============================================================================
// APPEARANCE
// =============================================================================

/// One frame of chip styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub background: Rgba,
    pub foreground: Rgba,
    pub scale: f32,
}

impl Appearance {
    /// Colors at rest (scale 1.0).
    pub const fn new(background: Rgba, foreground: Rgba) -> Self {
        Self {
            background,
            foreground,
            scale: 1.0,
        }
    }
}

// =============================================================================
// TRANSITION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionTransition {
    from: Appearance,
    to: Appearance,
    selecting: bool,
    started: Option<Instant>,
}

impl SelectionTransition {
    /// A transition that is already at rest on `appearance`.
    pub fn settled(appearance: Appearance) -> Self {
        Self {
            from: appearance,
            to: appearance,
            selecting: false,
            started: None,
        }
    }

    /// Animate toward `target`. `selecting` adds the scale pop.
    pub fn start(&mut self, target: Appearance, selecting: bool, now: Instant) {
        self.from = self.sample(now);
        self.to = target;
        self.selecting = selecting;
        self.started = Some(now);
    }

    /// Jump to `target` without animating (style changes).
    pub fn snap(&mut self, target: Appearance) {
        *self = Self::settled(target);
    }

    /// Where the transition ends up.
    pub fn target(&self) -> Appearance {
        self.to
    }

    fn total_duration(&self) -> Duration {
        if self.selecting {
            SELECT_DURATION + SETTLE_DURATION
        } else {
            SELECT_DURATION
        }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|start| now.saturating_duration_since(start) < self.total_duration())
    }

    /// Appearance at `now`.
    pub fn sample(&self, now: Instant) -> Appearance {
        let Some(start) = self.started else {
            return self.to;
        };
        let elapsed = now.saturating_duration_since(start);

        if elapsed < SELECT_DURATION {
            let t = elapsed.as_secs_f32() / SELECT_DURATION.as_secs_f32();
            let peak = if self.selecting { SELECTED_SCALE } else { self.to.scale };
            return Appearance {
                background: Rgba::lerp(self.from.background, self.to.background, t),
                foreground: Rgba::lerp(self.from.foreground, self.to.foreground, t),
                scale: lerp(self.from.scale, peak, t),
            };
        }

        if self.selecting && elapsed < SELECT_DURATION + SETTLE_DURATION {
            let t = (elapsed - SELECT_DURATION).as_secs_f32() / SETTLE_DURATION.as_secs_f32();
            return Appearance {
                scale: lerp(SELECTED_SCALE, self.to.scale, t),
                ..self.to
            };
        }

        self.to
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Appearance = Appearance::new(Rgba::rgb(0, 0, 200), Rgba::WHITE);
    const PICKED: Appearance = Appearance::new(Rgba::rgb(100, 100, 100), Rgba::BLACK);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_settled_samples_target() {
        let t = SelectionTransition::settled(IDLE);
        let now = Instant::now();
        assert_eq!(t.sample(now), IDLE);
        assert!(!t.is_running(now));
    }

    #[test]
    fn test_select_pops_then_settles() {
        let now = Instant::now();
        let mut t = SelectionTransition::settled(IDLE);
        t.start(PICKED, true, now);

        let mid = t.sample(now + ms(100));
        assert!(mid.scale > 1.0 && mid.scale < SELECTED_SCALE);
        assert_eq!(mid.background, Rgba::lerp(IDLE.background, PICKED.background, 0.5));

        let peak = t.sample(now + ms(200));
        assert_eq!(peak.background, PICKED.background);
        assert!((peak.scale - SELECTED_SCALE).abs() < 1e-4);

        assert!(t.is_running(now + ms(250)));
        assert_eq!(t.sample(now + ms(300)), PICKED);
        assert!(!t.is_running(now + ms(300)));
    }

    #[test]
    fn test_deselect_has_no_pop() {
        let now = Instant::now();
        let mut t = SelectionTransition::settled(PICKED);
        t.start(IDLE, false, now);
        assert_eq!(t.sample(now + ms(100)).scale, 1.0);
        assert_eq!(t.sample(now + ms(200)), IDLE);
        assert!(!t.is_running(now + ms(200)));
    }

    #[test]
    fn test_retoggle_mid_flight_ends_on_latest() {
        let now = Instant::now();
        let mut t = SelectionTransition::settled(IDLE);
        t.start(PICKED, true, now);
        t.start(IDLE, false, now + ms(50));
        t.start(PICKED, true, now + ms(80));
        t.start(IDLE, false, now + ms(90));

        assert_eq!(t.target(), IDLE);
        assert_eq!(t.sample(now + ms(1000)), IDLE);
    }

    #[test]
    fn test_restart_begins_from_current_frame() {
        let now = Instant::now();
        let mut t = SelectionTransition::settled(IDLE);
        t.start(PICKED, true, now);
        let frame = t.sample(now + ms(100));
        t.start(IDLE, false, now + ms(100));
        assert_eq!(t.sample(now + ms(100)), frame);
    }

    #[test]
    fn test_snap() {
        let now = Instant::now();
        let mut t = SelectionTransition::settled(IDLE);
        t.start(PICKED, true, now);
        t.snap(IDLE);
        assert_eq!(t.sample(now), IDLE);
    }
}
