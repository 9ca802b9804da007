pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod foliage;
pub mod layout;
pub mod ornaments;
pub mod pointer;
pub mod progress;
pub mod scene;

pub static FOLIAGE_WGSL: &str = include_str!("../shaders/foliage.wgsl");
pub static ORNAMENT_WGSL: &str = include_str!("../shaders/ornament.wgsl");

pub use camera::{Camera, OrbitCamera};
pub use clock::{FrameClock, FrameTime};
pub use config::SceneConfig;
pub use error::ConfigError;
pub use foliage::FoliageInstance;
pub use ornaments::{Category, CategoryCounts, OrnamentInstance};
pub use progress::Mode;
pub use scene::{check_instance_count, pot_instance, FrameInput, Scene, SceneUniforms};
