use crate::constants::MAX_FRAME_DELTA_SEC;
use instant::Instant;

/// Time values handed to the scene each frame, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub delta: f32,
    pub elapsed: f32,
}

/// Wall clock for the frame loop. Deltas are capped so a stalled window
/// (drag, minimise) resumes smoothly instead of snapping.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            max_delta: MAX_FRAME_DELTA_SEC,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = (now - self.last).as_secs_f32().clamp(0.0, self.max_delta);
        self.last = now;
        FrameTime {
            delta,
            elapsed: (now - self.start).as_secs_f32(),
        }
    }
}
