// Host-side tests for the orbit camera.

use glam::Vec3;
use tree_core::constants::*;
use tree_core::{Mode, OrbitCamera};

#[test]
fn orbit_camera_starts_at_the_default_eye() {
    let orbit = OrbitCamera::default();
    assert_eq!(orbit.target, Vec3::from(CAMERA_TARGET));
    assert!(orbit.eye().abs_diff_eq(Vec3::from(CAMERA_EYE), 1e-4));
    let cam = orbit.camera(1.5);
    assert!((cam.fovy_radians - CAMERA_FOVY_DEG.to_radians()).abs() < 1e-6);
    assert_eq!(cam.aspect, 1.5);
    // degenerate aspect falls back to square
    assert_eq!(orbit.camera(f32::NAN).aspect, 1.0);
    assert_eq!(orbit.camera(0.0).aspect, 1.0);
}

#[test]
fn orbit_camera_auto_rotates_only_when_formed() {
    let mut orbit = OrbitCamera::default();
    let start = orbit.azimuth;
    orbit.advance(Mode::Chaos, 1.0);
    assert_eq!(orbit.azimuth, start);
    orbit.advance(Mode::Formed, 1.0);
    assert!((orbit.azimuth - start - CAMERA_AUTO_ROTATE_PER_SEC).abs() < 1e-5);
    // distance is preserved while orbiting
    assert!((orbit.eye().length() - Vec3::from(CAMERA_EYE).length()).abs() < 1e-3);
}

#[test]
fn orbit_camera_zoom_and_polar_are_clamped() {
    let mut orbit = OrbitCamera::default();
    for _ in 0..100 {
        orbit.zoom(0.5);
    }
    assert_eq!(orbit.distance, CAMERA_MIN_DISTANCE);
    for _ in 0..100 {
        orbit.zoom(2.0);
    }
    assert_eq!(orbit.distance, CAMERA_MAX_DISTANCE);
    orbit.zoom(f32::NAN);
    assert_eq!(orbit.distance, CAMERA_MAX_DISTANCE);

    orbit.orbit(0.0, 100.0);
    assert!(orbit.polar > 0.0);
    orbit.orbit(0.0, -100.0);
    assert!(orbit.polar < std::f32::consts::PI);
    assert!(orbit.eye().is_finite());
}
