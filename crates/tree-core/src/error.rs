//! Initialization-time configuration errors.
//!
//! Nothing in the per-frame path returns an error: degenerate frame inputs are
//! sanitized instead. Everything that can be wrong with a scene is caught once,
//! when it is built.

use crate::ornaments::Category;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("category {category:?} has weight {weight}; weights must be finite and > 0")]
    NonPositiveWeight { category: Category, weight: f32 },

    #[error("invalid shape parameter `{name}` = {value}")]
    InvalidShape { name: &'static str, value: f32 },

    #[error("progress rate must be finite and > 0, got {0}")]
    InvalidRate(f32),

    #[error("initial progress must lie in [0, 1], got {0}")]
    InvalidProgress(f32),

    #[error("ornament palette is empty")]
    EmptyPalette,

    #[error("{buffer} instance buffer holds {capacity} but {actual} instances were produced")]
    InstanceCountMismatch {
        buffer: &'static str,
        capacity: usize,
        actual: usize,
    },
}
