//! Camera types shared with the display surface.
//!
//! These avoid platform-specific APIs; the frontend feeds them window size
//! and user input and reads back matrices.

use crate::constants::*;
use crate::progress::Mode;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Orbit around the tree: auto-rotates while formed, user drag/zoom otherwise.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle around +Y, radians.
    pub azimuth: f32,
    /// Angle from +Y, radians, kept away from the poles.
    pub polar: f32,
    pub fovy_radians: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate_per_sec: f32,
}

const POLAR_MIN: f32 = 0.1;
const POLAR_MAX: f32 = std::f32::consts::PI - 0.1;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(Vec3::from(CAMERA_EYE), Vec3::from(CAMERA_TARGET))
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        Self {
            target,
            distance: distance.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE),
            azimuth,
            polar: polar.clamp(POLAR_MIN, POLAR_MAX),
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            min_distance: CAMERA_MIN_DISTANCE,
            max_distance: CAMERA_MAX_DISTANCE,
            auto_rotate_per_sec: CAMERA_AUTO_ROTATE_PER_SEC,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    /// Spin slowly while the tree is formed.
    pub fn advance(&mut self, mode: Mode, dt: f32) {
        if mode == Mode::Formed && dt.is_finite() && dt > 0.0 {
            self.azimuth = (self.azimuth + self.auto_rotate_per_sec * dt) % std::f32::consts::TAU;
        }
    }

    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        if d_azimuth.is_finite() {
            self.azimuth -= d_azimuth;
        }
        if d_polar.is_finite() {
            self.polar = (self.polar - d_polar).clamp(POLAR_MIN, POLAR_MAX);
        }
    }

    /// Multiply the distance by `factor`, staying within the zoom limits.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        }
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            fovy_radians: self.fovy_radians,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}
