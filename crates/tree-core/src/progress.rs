//! The shared chaos → formed progress scalar and the mode that steers it.

use crate::constants::PROGRESS_RATE_PER_SEC;
use crate::error::ConfigError;

/// User-selected tree state. Owned by the display surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    Chaos,
    #[default]
    Formed,
}

impl Mode {
    /// Progress value this mode pulls toward.
    #[inline]
    pub fn target(self) -> f32 {
        match self {
            Mode::Chaos => 0.0,
            Mode::Formed => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Chaos => Mode::Formed,
            Mode::Formed => Mode::Chaos,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Chaos => "CHAOS",
            Mode::Formed => "FORMED",
        }
    }

    /// Caption for the control that leaves this mode.
    pub fn toggle_action(self) -> &'static str {
        match self {
            Mode::Chaos => "Reform Tree",
            Mode::Formed => "Release Chaos",
        }
    }
}

/// One frame-rate independent easing step toward `target`.
///
/// `alpha = 1 - exp(-rate * dt)` stays in [0, 1) for any dt >= 0, so the
/// result never overshoots. Non-finite or negative `dt` is treated as zero.
#[inline]
pub fn step(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let alpha = 1.0 - (-rate * dt).exp();
    let next = current + (target - current) * alpha;
    if next.is_finite() {
        next.clamp(0.0, 1.0)
    } else {
        current.clamp(0.0, 1.0)
    }
}

/// Last finite `(progress, time)` pair an animator was given.
///
/// Non-finite inputs fall back to the held value; finite progress is clamped
/// to [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LastGood {
    progress: f32,
    time: f32,
}

impl LastGood {
    pub fn accept(&mut self, progress: f32, time: f32) -> (f32, f32) {
        if progress.is_finite() {
            self.progress = progress.clamp(0.0, 1.0);
        }
        if time.is_finite() {
            self.time = time;
        }
        (self.progress, self.time)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[derive(Clone, Debug)]
pub struct ProgressController {
    value: f32,
    rate: f32,
}

impl Default for ProgressController {
    fn default() -> Self {
        Self {
            value: 0.0,
            rate: PROGRESS_RATE_PER_SEC,
        }
    }
}

impl ProgressController {
    pub fn new(initial: f32, rate: f32) -> Result<Self, ConfigError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ConfigError::InvalidRate(rate));
        }
        if !(0.0..=1.0).contains(&initial) {
            return Err(ConfigError::InvalidProgress(initial));
        }
        Ok(Self {
            value: initial,
            rate,
        })
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Ease toward the mode's target and return the new value.
    pub fn advance(&mut self, mode: Mode, dt: f32) -> f32 {
        self.value = step(self.value, mode.target(), self.rate, dt);
        self.value
    }
}
