use crate::constants::*;
use crate::error::ConfigError;
use crate::foliage::FoliageParams;
use crate::layout::{FoliageShape, OrnamentShape};
use crate::ornaments::OrnamentParams;
use crate::progress::Mode;

/// Everything needed to build a [`crate::Scene`]. Defaults come from
/// `constants.rs`; validated once by `Scene::new`.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub foliage_count: usize,
    pub ornament_count: usize,
    pub foliage_shape: FoliageShape,
    pub ornament_shape: OrnamentShape,
    pub foliage: FoliageParams,
    pub ornaments: OrnamentParams,
    pub progress_rate: f32,
    pub initial_progress: f32,
    /// Mode the display surface starts in.
    pub initial_mode: Mode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            foliage_count: FOLIAGE_COUNT,
            ornament_count: ORNAMENT_COUNT,
            foliage_shape: FoliageShape::default(),
            ornament_shape: OrnamentShape::default(),
            foliage: FoliageParams::default(),
            ornaments: OrnamentParams::default(),
            progress_rate: PROGRESS_RATE_PER_SEC,
            initial_progress: 0.0,
            initial_mode: Mode::Formed,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.foliage_shape.validate()?;
        self.ornament_shape.validate()?;
        self.ornaments.validate()?;
        if !(self.progress_rate.is_finite() && self.progress_rate > 0.0) {
            return Err(ConfigError::InvalidRate(self.progress_rate));
        }
        if !(0.0..=1.0).contains(&self.initial_progress) {
            return Err(ConfigError::InvalidProgress(self.initial_progress));
        }
        Ok(())
    }
}
