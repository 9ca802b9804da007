//! Foliage: the large point cloud that blends from the chaos shell into the
//! filled cone.
//!
//! Per-point work is split the way the renderer consumes it. The animator
//! writes one [`FoliageInstance`] per point (blended position, world-space
//! size, colour) and the point shader draws it as a camera-facing quad with
//! a soft circular mask under additive blending. [`point_mask_alpha`] is the
//! CPU mirror of that mask.

use crate::constants::*;
use crate::layout::Placement;
use crate::progress::LastGood;
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FoliageInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoliageParams {
    pub sway_amplitude: f32,
    pub sway_height_freq: f32,
    pub base_size: f32,
    pub pulse_amplitude: f32,
    pub pulse_freq: f32,
    /// Height used to normalise the colour ramp (the tree height).
    pub color_height: f32,
    pub base_color: Vec3,
    pub accent_color: Vec3,
}

impl Default for FoliageParams {
    fn default() -> Self {
        Self {
            sway_amplitude: SWAY_AMPLITUDE,
            sway_height_freq: SWAY_HEIGHT_FREQ,
            base_size: POINT_BASE_SIZE,
            pulse_amplitude: POINT_PULSE_AMPLITUDE,
            pulse_freq: POINT_PULSE_FREQ,
            color_height: TREE_HEIGHT,
            base_color: Vec3::from(FOLIAGE_BASE_COLOR),
            accent_color: Vec3::from(FOLIAGE_ACCENT_COLOR),
        }
    }
}

/// Blended position plus a wind sway that only shows once the tree forms.
#[inline]
pub fn point_position(p: &Placement, progress: f32, time: f32, params: &FoliageParams) -> Vec3 {
    let mut pos = p.chaos.lerp(p.target, progress);
    let sway = (time + pos.y * params.sway_height_freq).sin() * params.sway_amplitude * progress;
    pos.x += sway;
    pos.z += sway;
    pos
}

/// World-space point size, shimmering over time and with height.
#[inline]
pub fn point_size(position: Vec3, time: f32, params: &FoliageParams) -> f32 {
    params.base_size * (1.0 + params.pulse_amplitude * (time * params.pulse_freq + position.y).sin())
}

/// Deep green toward gold as the tree forms; lower points keep more green.
#[inline]
pub fn point_color(position: Vec3, progress: f32, params: &FoliageParams) -> Vec3 {
    let height_bias = if params.color_height > 0.0 {
        (1.0 - position.y / params.color_height).clamp(0.0, 1.0)
    } else {
        0.0
    };
    params
        .base_color
        .lerp(params.accent_color, progress * height_bias)
}

/// Alpha of the soft dot at distance `d` from the point centre (quad uv units).
#[inline]
pub fn point_mask_alpha(d: f32) -> f32 {
    if !(d <= POINT_MASK_RADIUS) {
        return 0.0;
    }
    1.0 - smoothstep(POINT_MASK_INNER, POINT_MASK_RADIUS, d)
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Owns the foliage placements and the per-frame instance buffer.
pub struct FoliageField {
    placements: Vec<Placement>,
    params: FoliageParams,
    instances: Vec<FoliageInstance>,
    last_good: LastGood,
}

impl FoliageField {
    pub fn new(placements: Vec<Placement>, params: FoliageParams) -> Self {
        let instances = vec![FoliageInstance::default(); placements.len()];
        Self {
            placements,
            params,
            instances,
            last_good: LastGood::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn params(&self) -> &FoliageParams {
        &self.params
    }

    /// Rewrite every instance for this frame. Non-finite `progress` or `time`
    /// is replaced by the last finite value passed in.
    pub fn update(&mut self, progress: f32, time: f32) {
        let (progress, time) = self.last_good.accept(progress, time);
        let params = &self.params;
        for (inst, p) in self.instances.iter_mut().zip(&self.placements) {
            let pos = point_position(p, progress, time, params);
            let size = point_size(pos, time, params);
            let color = point_color(pos, progress, params);
            *inst = FoliageInstance {
                position: pos.to_array(),
                size,
                color: color.extend(1.0).to_array(),
            };
        }
    }

    pub fn instances(&self) -> &[FoliageInstance] {
        &self.instances
    }
}
