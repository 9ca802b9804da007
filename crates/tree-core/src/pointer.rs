//! Pointer → world mapping and the repulsion it exerts on ornaments.

use crate::constants::*;
use glam::{Vec2, Vec3};

/// Repulsion tuning. The pointer plane is z = 0, centred at `(0, lift)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepulsionParams {
    pub world_scale: f32,
    pub world_lift: f32,
    pub radius: f32,
    pub strength: f32,
}

impl Default for RepulsionParams {
    fn default() -> Self {
        Self {
            world_scale: POINTER_WORLD_SCALE,
            world_lift: POINTER_WORLD_LIFT,
            radius: REPULSION_RADIUS,
            strength: REPULSION_STRENGTH,
        }
    }
}

/// Clamp a pointer position to the NDC square; `None` if either axis is not finite.
pub fn sanitize_ndc(ndc: Vec2) -> Option<Vec2> {
    if ndc.is_finite() {
        Some(ndc.clamp(Vec2::splat(-1.0), Vec2::ONE))
    } else {
        None
    }
}

/// World-space point the pointer pushes from.
#[inline]
pub fn pointer_world(ndc: Vec2, params: &RepulsionParams) -> Vec3 {
    Vec3::new(
        ndc.x * params.world_scale,
        ndc.y * params.world_scale + params.world_lift,
        0.0,
    )
}

/// Displacement to add to an ornament at `position` with the given `weight`.
///
/// Linear falloff from `strength / weight` at the pointer to zero at `radius`.
/// An ornament sitting exactly on the pointer is pushed straight up.
pub fn repulsion(position: Vec3, pointer: Vec3, weight: f32, params: &RepulsionParams) -> Vec3 {
    let offset = position - pointer;
    let dist = offset.length();
    if !(dist < params.radius) || weight <= 0.0 {
        return Vec3::ZERO;
    }
    let force = (1.0 - dist / params.radius) * params.strength / weight;
    let dir = offset.try_normalize().unwrap_or(Vec3::Y);
    dir * force
}
