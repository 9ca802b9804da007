//! Per-frame driver tying progress, foliage and ornaments together.

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::constants::*;
use crate::error::ConfigError;
use crate::foliage::{FoliageField, FoliageInstance};
use crate::layout;
use crate::ornaments::{build_ornaments, Category, CategoryCounts, OrnamentField, OrnamentInstance};
use crate::progress::{Mode, ProgressController};
use glam::{Mat4, Vec2, Vec3};
use rand::Rng;

/// What the display surface hands the scene each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since start, monotonically increasing.
    pub elapsed: f32,
    /// Pointer in normalized device coordinates; `None` when outside the view.
    pub pointer: Option<Vec2>,
    pub mode: Mode,
}

/// Uniform block shared by the foliage and ornament shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    pub camera_pos: [f32; 4],
    /// x: elapsed time, y: progress, z: vertical float offset, w: unused.
    pub params: [f32; 4],
}

/// Fails when `actual` instances would not exactly fill a buffer sized for
/// `capacity`.
pub fn check_instance_count(
    buffer: &'static str,
    capacity: usize,
    actual: usize,
) -> Result<(), ConfigError> {
    if capacity == actual {
        Ok(())
    } else {
        Err(ConfigError::InstanceCountMismatch {
            buffer,
            capacity,
            actual,
        })
    }
}

/// The pot the tree stands in. Static, so the renderer uploads it once; the
/// mesh itself is built at its final size.
pub fn pot_instance() -> OrnamentInstance {
    let color = srgb_to_linear_vec3(POT_COLOR) + srgb_to_linear_vec3(GOLD) * POT_EMISSIVE_INTENSITY;
    OrnamentInstance {
        model: Mat4::from_translation(Vec3::from(POT_CENTER)).to_cols_array_2d(),
        color: color.extend(1.0).to_array(),
    }
}

pub struct Scene {
    foliage: FoliageField,
    ornaments: OrnamentField,
    progress: ProgressController,
    time: f32,
    last_mode: Mode,
}

impl Scene {
    pub fn new<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let progress = ProgressController::new(config.initial_progress, config.progress_rate)?;

        let foliage_layout =
            layout::generate_foliage(config.foliage_count, &config.foliage_shape, rng);
        let ornament_layout = layout::generate_ornament_placements(
            config.ornament_count,
            &config.ornament_shape,
            rng,
        );
        let ornament_table = build_ornaments(&ornament_layout, &config.ornaments);

        let foliage = FoliageField::new(foliage_layout, config.foliage);
        let ornaments = OrnamentField::new(ornament_table, config.ornaments)?;
        let counts = ornaments.counts();
        log::info!(
            "[scene] foliage={} ornaments={} (balls={} gifts={} lights={}) progress={:.2}",
            foliage.len(),
            counts.total(),
            counts.ball,
            counts.gift,
            counts.light,
            progress.value()
        );

        Ok(Self {
            foliage,
            ornaments,
            progress,
            time: 0.0,
            last_mode: config.initial_mode,
        })
    }

    /// Advance one frame and rewrite every output buffer. Returns the new progress.
    pub fn frame(&mut self, input: &FrameInput) -> f32 {
        if input.mode != self.last_mode {
            log::debug!(
                "[scene] mode {} -> {} at progress {:.3}",
                self.last_mode.label(),
                input.mode.label(),
                self.progress.value()
            );
            self.last_mode = input.mode;
        }
        if input.elapsed.is_finite() {
            self.time = input.elapsed;
        } else {
            log::warn!("[scene] non-finite elapsed time; holding t={:.3}", self.time);
        }

        let progress = self.progress.advance(input.mode, input.delta);
        self.foliage.update(progress, self.time);
        self.ornaments.update(progress, self.time, input.pointer);
        progress
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn mode(&self) -> Mode {
        self.last_mode
    }

    pub fn foliage(&self) -> &[FoliageInstance] {
        self.foliage.instances()
    }

    pub fn foliage_field(&self) -> &FoliageField {
        &self.foliage
    }

    pub fn ornaments(&self, category: Category) -> &[OrnamentInstance] {
        self.ornaments.instances(category)
    }

    pub fn ornament_field(&self) -> &OrnamentField {
        &self.ornaments
    }

    pub fn counts(&self) -> CategoryCounts {
        self.ornaments.counts()
    }

    /// Instance counts derived from the layouts and the category rule, not
    /// from the output buffers. GPU buffers are sized from these.
    pub fn expected_counts(&self) -> (usize, CategoryCounts) {
        (
            self.foliage.placements().len(),
            CategoryCounts::of(self.ornaments.ornaments()),
        )
    }

    /// Compare every output buffer against [`Scene::expected_counts`].
    pub fn check_instance_counts(&self) -> Result<(), ConfigError> {
        let (foliage, counts) = self.expected_counts();
        check_instance_count("foliage", foliage, self.foliage().len())?;
        for category in Category::ALL {
            check_instance_count(
                category.label(),
                counts.get(category),
                self.ornaments(category).len(),
            )?;
        }
        Ok(())
    }

    /// Gentle bob applied to the whole tree.
    pub fn float_offset(&self) -> f32 {
        (self.time * FLOAT_FREQ).sin() * FLOAT_AMPLITUDE
    }

    pub fn uniforms(&self, camera: &Camera) -> SceneUniforms {
        let view = camera.view_matrix();
        SceneUniforms {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_right: view.row(0).truncate().extend(0.0).to_array(),
            camera_up: view.row(1).truncate().extend(0.0).to_array(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            params: [self.time, self.progress(), self.float_offset(), 0.0],
        }
    }
}
