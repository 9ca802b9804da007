//! Ornaments: typed, weighted instances hung on the tree surface.
//!
//! Heavier ornaments ease with a steeper curve (`p^(1 + w/2)`), so gifts trail
//! behind balls, which trail behind lights. Every frame each ornament is
//! blended, pushed away from the pointer, spun and scaled, then packed into
//! its category's instance buffer.

use crate::constants::*;
use crate::error::ConfigError;
use crate::layout::Placement;
use crate::pointer::{self, RepulsionParams};
use crate::progress::LastGood;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Ball,
    Gift,
    Light,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Ball, Category::Gift, Category::Light];

    /// Every 10th ornament is a gift, every 3rd of the rest a light.
    #[inline]
    pub fn for_index(index: usize) -> Self {
        if index % 10 == 0 {
            Category::Gift
        } else if index % 3 == 0 {
            Category::Light
        } else {
            Category::Ball
        }
    }

    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Category::Ball => 0,
            Category::Gift => 1,
            Category::Light => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Ball => "ball",
            Category::Gift => "gift",
            Category::Light => "light",
        }
    }

    /// Lights glow; they are drawn without shading.
    pub fn is_emissive(self) -> bool {
        matches!(self, Category::Light)
    }
}

/// Per-category weight and resting scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStyle {
    pub weight: f32,
    pub scale: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrnamentParams {
    pub ball: CategoryStyle,
    pub gift: CategoryStyle,
    pub light: CategoryStyle,
    pub light_twinkle_amplitude: f32,
    pub light_twinkle_freq: f32,
    pub easing_factor: f32,
    pub spin_rate: Vec2,
    pub palette: Vec<[f32; 3]>,
    /// Colour every light is drawn with, whatever its palette entry.
    pub light_color: [f32; 3],
    pub repulsion: RepulsionParams,
}

impl Default for OrnamentParams {
    fn default() -> Self {
        Self {
            ball: CategoryStyle {
                weight: BALL_WEIGHT,
                scale: BALL_SCALE,
            },
            gift: CategoryStyle {
                weight: GIFT_WEIGHT,
                scale: GIFT_SCALE,
            },
            light: CategoryStyle {
                weight: LIGHT_WEIGHT,
                scale: LIGHT_BASE_SCALE,
            },
            light_twinkle_amplitude: LIGHT_TWINKLE_AMPLITUDE,
            light_twinkle_freq: LIGHT_TWINKLE_FREQ,
            easing_factor: WEIGHT_EASING_FACTOR,
            spin_rate: Vec2::new(SPIN_RATE_X, SPIN_RATE_Y),
            palette: ORNAMENT_PALETTE.to_vec(),
            light_color: GOLD,
            repulsion: RepulsionParams::default(),
        }
    }
}

impl OrnamentParams {
    pub fn style(&self, category: Category) -> CategoryStyle {
        match category {
            Category::Ball => self.ball,
            Category::Gift => self.gift,
            Category::Light => self.light,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let weight = self.style(category).weight;
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ConfigError::NonPositiveWeight { category, weight });
            }
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }
}

/// Immutable ornament record.
#[derive(Clone, Debug, PartialEq)]
pub struct Ornament {
    pub index: usize,
    pub category: Category,
    pub chaos: Vec3,
    pub target: Vec3,
    /// sRGB palette colour.
    pub color: [f32; 3],
    pub weight: f32,
}

impl Ornament {
    /// Eased progress for this ornament's weight.
    #[inline]
    pub fn local_progress(&self, progress: f32, easing_factor: f32) -> f32 {
        local_progress(progress, self.weight, easing_factor)
    }

    /// Position before pointer repulsion.
    #[inline]
    pub fn blended_position(&self, progress: f32, easing_factor: f32) -> Vec3 {
        self.chaos
            .lerp(self.target, self.local_progress(progress, easing_factor))
    }
}

/// `progress^(1 + weight * easing_factor)`; 0 and 1 are fixed points.
#[inline]
pub fn local_progress(progress: f32, weight: f32, easing_factor: f32) -> f32 {
    progress
        .clamp(0.0, 1.0)
        .powf(1.0 + weight * easing_factor)
}

/// Build the ornament table: category by index, weight by category,
/// palette colour by index.
pub fn build_ornaments(placements: &[Placement], params: &OrnamentParams) -> Vec<Ornament> {
    placements
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let category = Category::for_index(index);
            let color = params.palette[index % params.palette.len()];
            Ornament {
                index,
                category,
                chaos: p.chaos,
                target: p.target,
                color,
                weight: params.style(category).weight,
            }
        })
        .collect()
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OrnamentInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl Default for OrnamentInstance {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl OrnamentInstance {
    pub fn translation(&self) -> Vec3 {
        Mat4::from_cols_array_2d(&self.model).w_axis.truncate()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub ball: usize,
    pub gift: usize,
    pub light: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Ball => self.ball,
            Category::Gift => self.gift,
            Category::Light => self.light,
        }
    }

    pub fn total(&self) -> usize {
        self.ball + self.gift + self.light
    }

    pub fn of(ornaments: &[Ornament]) -> Self {
        let mut counts = Self::default();
        for o in ornaments {
            match o.category {
                Category::Ball => counts.ball += 1,
                Category::Gift => counts.gift += 1,
                Category::Light => counts.light += 1,
            }
        }
        counts
    }
}

/// Owns the ornament table and the three per-category instance buffers.
pub struct OrnamentField {
    ornaments: Vec<Ornament>,
    params: OrnamentParams,
    /// (category slot, packed index) per ornament, fixed at construction.
    packing: Vec<(usize, usize)>,
    buffers: [Vec<OrnamentInstance>; 3],
    light_color: Vec3,
    last_good: LastGood,
}

impl OrnamentField {
    pub fn new(ornaments: Vec<Ornament>, params: OrnamentParams) -> Result<Self, ConfigError> {
        params.validate()?;
        if let Some(o) = ornaments.iter().find(|o| !(o.weight.is_finite() && o.weight > 0.0)) {
            return Err(ConfigError::NonPositiveWeight {
                category: o.category,
                weight: o.weight,
            });
        }
        let mut next = [0usize; 3];
        let packing = ornaments
            .iter()
            .map(|o| {
                let slot = o.category.slot();
                let packed = next[slot];
                next[slot] += 1;
                (slot, packed)
            })
            .collect();
        let buffers = next.map(|n| vec![OrnamentInstance::default(); n]);
        let light_color = srgb_to_linear_vec3(params.light_color);
        Ok(Self {
            ornaments,
            params,
            packing,
            buffers,
            light_color,
            last_good: LastGood::default(),
        })
    }

    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    pub fn params(&self) -> &OrnamentParams {
        &self.params
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            ball: self.buffers[Category::Ball.slot()].len(),
            gift: self.buffers[Category::Gift.slot()].len(),
            light: self.buffers[Category::Light.slot()].len(),
        }
    }

    pub fn instances(&self, category: Category) -> &[OrnamentInstance] {
        &self.buffers[category.slot()]
    }

    /// Rewrite every instance buffer for this frame. `pointer` is in NDC;
    /// `None` (or a non-finite value) disables repulsion. Non-finite `progress`
    /// or `time` is replaced by the last finite value passed in.
    pub fn update(&mut self, progress: f32, time: f32, pointer: Option<Vec2>) {
        let (progress, time) = self.last_good.accept(progress, time);
        let params = &self.params;
        let pointer_world = pointer
            .and_then(pointer::sanitize_ndc)
            .map(|ndc| pointer::pointer_world(ndc, &params.repulsion));

        for (o, &(slot, packed)) in self.ornaments.iter().zip(&self.packing) {
            let mut position = o.blended_position(progress, params.easing_factor);
            if let Some(pw) = pointer_world {
                position += pointer::repulsion(position, pw, o.weight, &params.repulsion);
            }

            let spin = if o.index % 2 == 0 { 1.0 } else { -1.0 };
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                time * params.spin_rate.x * spin,
                time * params.spin_rate.y,
                0.0,
            );

            let style = params.style(o.category);
            let scale = match o.category {
                Category::Light => {
                    style.scale
                        + (time * params.light_twinkle_freq + o.index as f32).sin()
                            * params.light_twinkle_amplitude
                }
                Category::Ball | Category::Gift => style.scale,
            };

            let color = match o.category {
                Category::Light => self.light_color,
                Category::Ball | Category::Gift => srgb_to_linear_vec3(o.color),
            };

            let model = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rotation, position);
            self.buffers[slot][packed] = OrnamentInstance {
                model: model.to_cols_array_2d(),
                color: color.extend(1.0).to_array(),
            };
        }
    }
}
