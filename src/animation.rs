//! Cosmetic canvas transitions. Pure functions of elapsed time; the canvas
//! keeps the start times and asks for repaints while any of them runs.

use crate::element::ElementId;
use crate::scene::Theme;

pub const THEME_PULSE_SECS: f64 = 0.5;
pub const THEME_PULSE_MIN_SCALE: f32 = 0.98;
pub const APPEAR_SECS: f64 = 0.3;
pub const APPEAR_MIN_SCALE: f32 = 0.9;

/// Cubic ease-out on `t` in `[0, 1]`
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

fn progress(started_at: f64, duration: f64, now: f64) -> f32 {
    ((now - started_at) / duration).clamp(0.0, 1.0) as f32
}

/// Background scale after a theme change: 0.98 back up to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePulse {
    theme: Theme,
    started_at: Option<f64>,
}

impl ThemePulse {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            started_at: None,
        }
    }

    /// Start the pulse if `theme` differs from the last one seen.
    pub fn observe(&mut self, theme: Theme, now: f64) {
        if theme != self.theme {
            self.theme = theme;
            self.started_at = Some(now);
        }
    }

    pub fn scale(&self, now: f64) -> f32 {
        match self.started_at {
            Some(start) => {
                let t = ease_out(progress(start, THEME_PULSE_SECS, now));
                THEME_PULSE_MIN_SCALE + (1.0 - THEME_PULSE_MIN_SCALE) * t
            }
            None => 1.0,
        }
    }

    pub fn is_running(&self, now: f64) -> bool {
        self.started_at
            .is_some_and(|start| now - start < THEME_PULSE_SECS)
    }
}

/// Fade and scale-in of the most recently added element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppearAnimation {
    pub element_id: ElementId,
    pub started_at: f64,
}

impl AppearAnimation {
    pub fn new(element_id: ElementId, now: f64) -> Self {
        Self {
            element_id,
            started_at: now,
        }
    }

    /// `(opacity, scale)` at `now`
    pub fn sample(&self, now: f64) -> (f32, f32) {
        let t = ease_out(progress(self.started_at, APPEAR_SECS, now));
        (t, APPEAR_MIN_SCALE + (1.0 - APPEAR_MIN_SCALE) * t)
    }

    pub fn is_running(&self, now: f64) -> bool {
        now - self.started_at < APPEAR_SECS
    }
}
