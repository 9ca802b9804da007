use glam::Vec3;

// Shared scene tuning constants used by the core and the native frontend.

// Tree shape
pub const TREE_HEIGHT: f32 = 8.0;
pub const TREE_RADIUS: f32 = 3.0;
pub const FOLIAGE_SPIRAL_FACTOR: f32 = 2.0; // extra angle (radians) per unit of height
pub const ORNAMENT_SURFACE_FACTOR: f32 = 0.95; // ornaments sit just inside the cone surface
pub const ORNAMENT_APEX_RESERVE: f32 = 0.5; // keep the top slice free for the tip

// Chaos shells (inner radius, radial spread)
pub const FOLIAGE_SHELL: [f32; 2] = [10.0, 5.0];
pub const ORNAMENT_SHELL: [f32; 2] = [12.0, 8.0];

// Element counts
pub const FOLIAGE_COUNT: usize = 15_000;
pub const ORNAMENT_COUNT: usize = 300;

// Progress easing
pub const PROGRESS_RATE_PER_SEC: f32 = 2.5;

// Foliage motion and look
pub const SWAY_AMPLITUDE: f32 = 0.05;
pub const SWAY_HEIGHT_FREQ: f32 = 2.0;
pub const POINT_BASE_SIZE: f32 = 0.04; // world units at pulse = 1
pub const POINT_PULSE_AMPLITUDE: f32 = 0.5;
pub const POINT_PULSE_FREQ: f32 = 2.0;
pub const POINT_MASK_RADIUS: f32 = 0.5; // in point-local uv units
pub const POINT_MASK_INNER: f32 = 0.2; // fully opaque inside this radius

// Ornament easing, weights and scales
pub const WEIGHT_EASING_FACTOR: f32 = 0.5; // localProgress = p^(1 + w * factor)
pub const GIFT_WEIGHT: f32 = 3.0;
pub const BALL_WEIGHT: f32 = 1.0;
pub const LIGHT_WEIGHT: f32 = 0.2;
pub const GIFT_SCALE: f32 = 0.4;
pub const BALL_SCALE: f32 = 0.15;
pub const LIGHT_BASE_SCALE: f32 = 0.05;
pub const LIGHT_TWINKLE_AMPLITUDE: f32 = 0.02;
pub const LIGHT_TWINKLE_FREQ: f32 = 3.0;
pub const SPIN_RATE_X: f32 = 0.5; // sign alternates with index parity
pub const SPIN_RATE_Y: f32 = 0.3;

// Pointer interaction
pub const POINTER_WORLD_SCALE: f32 = 5.0; // NDC -> world units
pub const POINTER_WORLD_LIFT: f32 = 3.0; // world-space y offset of the pointer plane centre
pub const REPULSION_RADIUS: f32 = 2.5;
pub const REPULSION_STRENGTH: f32 = 0.5;

// Whole-scene float
pub const FLOAT_AMPLITUDE: f32 = 0.1;
pub const FLOAT_FREQ: f32 = 1.0;

// Palette (sRGB)
pub const GOLD: [f32; 3] = [0.831, 0.686, 0.216]; // #D4AF37
pub const EMERALD: [f32; 3] = [0.016, 0.224, 0.153]; // #043927
pub const BACKGROUND: [f32; 3] = [0.004, 0.039, 0.031]; // #010a08

// Foliage colour ramp (shader-space values, used as-is)
pub const FOLIAGE_BASE_COLOR: [f32; 3] = [0.015, 0.22, 0.15];
pub const FOLIAGE_ACCENT_COLOR: [f32; 3] = [0.83, 0.68, 0.21];

// Ornament palette, assigned by index
pub const ORNAMENT_PALETTE: [[f32; 3]; 5] = [
    GOLD,
    [0.545, 0.0, 0.0],     // deep red
    [0.753, 0.753, 0.753], // silver
    EMERALD,
    [0.969, 0.906, 0.808], // champagne
];

// Decorative pot under the trunk: a tapered cylinder, dark with a faint gold glow
pub const POT_CENTER: [f32; 3] = [0.0, -0.5, 0.0];
pub const POT_RADIUS_TOP: f32 = 1.0;
pub const POT_RADIUS_BOTTOM: f32 = 0.8;
pub const POT_HEIGHT: f32 = 1.0;
pub const POT_SEGMENTS: u16 = 32;
pub const POT_COLOR: [f32; 3] = [0.067, 0.067, 0.067]; // #111
pub const POT_EMISSIVE_INTENSITY: f32 = 0.05;

// Camera
pub const CAMERA_EYE: [f32; 3] = [0.0, 4.0, 12.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];
pub const CAMERA_FOVY_DEG: f32 = 45.0;
pub const CAMERA_MIN_DISTANCE: f32 = 5.0;
pub const CAMERA_MAX_DISTANCE: f32 = 25.0;
pub const CAMERA_AUTO_ROTATE_PER_SEC: f32 = 0.052;

// Frame clock
pub const MAX_FRAME_DELTA_SEC: f32 = 0.1;

#[inline]
pub fn gold_vec3() -> Vec3 {
    Vec3::from(GOLD)
}

/// Convert one sRGB-encoded channel to linear light.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
pub fn srgb_to_linear_vec3(rgb: [f32; 3]) -> Vec3 {
    Vec3::new(
        srgb_to_linear(rgb[0]),
        srgb_to_linear(rgb[1]),
        srgb_to_linear(rgb[2]),
    )
}
