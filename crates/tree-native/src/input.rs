use glam::Vec2;

// Radians of orbit per pixel of drag.
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005;
// Zoom factor per wheel line (scroll up zooms in).
pub const ZOOM_PER_LINE: f32 = 0.9;
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Map window pixel coordinates to normalized device coordinates
/// (x right, y up, both in [-1, 1]). `None` for an empty window.
#[inline]
pub fn cursor_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc = Vec2::new(
        (2.0 * x / width as f64 - 1.0) as f32,
        (1.0 - 2.0 * y / height as f64) as f32,
    );
    if ndc.is_finite() {
        Some(ndc)
    } else {
        None
    }
}

/// Convert wheel lines into a multiplicative zoom factor.
#[inline]
pub fn zoom_factor(lines: f32) -> f32 {
    ZOOM_PER_LINE.powf(lines)
}

#[derive(Clone, Debug, Default)]
pub struct PointerState {
    /// Latest pointer position in NDC; `None` when the cursor left the window.
    pub ndc: Option<Vec2>,
    pub last_px: Option<Vec2>,
    pub dragging: bool,
}

impl PointerState {
    /// Record a cursor move; returns the pixel delta while a drag is active.
    pub fn move_to(&mut self, x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
        let px = Vec2::new(x as f32, y as f32);
        let delta = match (self.dragging, self.last_px) {
            (true, Some(prev)) => Some(px - prev),
            _ => None,
        };
        self.last_px = Some(px);
        self.ndc = cursor_to_ndc(x, y, width, height);
        delta
    }

    pub fn leave(&mut self) {
        self.ndc = None;
        self.last_px = None;
        self.dragging = false;
    }
}
