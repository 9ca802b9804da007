//! Layout generation: where every element sits in the chaos cloud and in the
//! formed tree.
//!
//! All sampling goes through an injected [`rand::Rng`], so a seeded
//! `StdRng` reproduces a layout exactly.

use crate::constants::*;
use crate::error::ConfigError;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Spherical shell `[r_min, r_min + r_spread]` around the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellParams {
    pub r_min: f32,
    pub r_spread: f32,
}

impl ShellParams {
    pub fn r_max(&self) -> f32 {
        self.r_min + self.r_spread
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("shell.r_min", self.r_min)?;
        non_negative("shell.r_spread", self.r_spread)
    }
}

/// Upright cone with its base disk on y = 0 and apex at y = height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeParams {
    pub height: f32,
    pub radius: f32,
}

impl ConeParams {
    /// Radius of the cone's cross-section at height `y`; zero outside the cone.
    pub fn radius_at(&self, y: f32) -> f32 {
        if !(0.0..self.height).contains(&y) {
            return 0.0;
        }
        self.radius * (1.0 - y / self.height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("cone.height", self.height)?;
        positive("cone.radius", self.radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoliageShape {
    pub shell: ShellParams,
    pub cone: ConeParams,
    /// Extra angle per unit of height, giving the filled cone a spiral grain.
    pub spiral: f32,
}

impl Default for FoliageShape {
    fn default() -> Self {
        Self {
            shell: ShellParams {
                r_min: FOLIAGE_SHELL[0],
                r_spread: FOLIAGE_SHELL[1],
            },
            cone: ConeParams {
                height: TREE_HEIGHT,
                radius: TREE_RADIUS,
            },
            spiral: FOLIAGE_SPIRAL_FACTOR,
        }
    }
}

impl FoliageShape {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shell.validate()?;
        self.cone.validate()?;
        finite("foliage.spiral", self.spiral)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrnamentShape {
    pub shell: ShellParams,
    pub cone: ConeParams,
    /// Fraction of the cone radius at which ornaments hang (close to 1).
    pub surface_factor: f32,
    /// Height kept free below the apex.
    pub apex_reserve: f32,
}

impl Default for OrnamentShape {
    fn default() -> Self {
        Self {
            shell: ShellParams {
                r_min: ORNAMENT_SHELL[0],
                r_spread: ORNAMENT_SHELL[1],
            },
            cone: ConeParams {
                height: TREE_HEIGHT,
                radius: TREE_RADIUS,
            },
            surface_factor: ORNAMENT_SURFACE_FACTOR,
            apex_reserve: ORNAMENT_APEX_RESERVE,
        }
    }
}

impl OrnamentShape {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shell.validate()?;
        self.cone.validate()?;
        positive("ornament.surface_factor", self.surface_factor)?;
        non_negative("ornament.apex_reserve", self.apex_reserve)?;
        // the usable band below the apex must not be empty
        if self.apex_reserve >= self.cone.height {
            return Err(ConfigError::InvalidShape {
                name: "ornament.apex_reserve",
                value: self.apex_reserve,
            });
        }
        Ok(())
    }
}

/// An element's two fixed positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub chaos: Vec3,
    pub target: Vec3,
}

/// Uniform direction (no pole clustering) scaled to a radius in the shell.
pub fn sample_shell<R: Rng + ?Sized>(rng: &mut R, shell: &ShellParams) -> Vec3 {
    let r = shell.r_min + rng.gen::<f32>() * shell.r_spread;
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Area-uniform point inside the cone, angle twisted by `spiral * h`.
pub fn sample_cone_volume<R: Rng + ?Sized>(rng: &mut R, cone: &ConeParams, spiral: f32) -> Vec3 {
    let h = rng.gen::<f32>() * cone.height;
    let radius_at_height = cone.radius_at(h);
    let angle = rng.gen::<f32>() * TAU + spiral * h;
    let dist = rng.gen::<f32>().sqrt() * radius_at_height;
    Vec3::new(angle.cos() * dist, h, angle.sin() * dist)
}

/// Point on (just inside) the cone's lateral surface, below the apex reserve.
pub fn sample_cone_surface<R: Rng + ?Sized>(
    rng: &mut R,
    cone: &ConeParams,
    surface_factor: f32,
    apex_reserve: f32,
) -> Vec3 {
    let h = rng.gen::<f32>() * (cone.height - apex_reserve).max(0.0);
    let dist = cone.radius_at(h) * surface_factor;
    let angle = rng.gen::<f32>() * TAU;
    Vec3::new(angle.cos() * dist, h, angle.sin() * dist)
}

pub fn generate_foliage<R: Rng + ?Sized>(
    count: usize,
    shape: &FoliageShape,
    rng: &mut R,
) -> Vec<Placement> {
    (0..count)
        .map(|_| {
            let chaos = sample_shell(rng, &shape.shell);
            let target = sample_cone_volume(rng, &shape.cone, shape.spiral);
            Placement { chaos, target }
        })
        .collect()
}

pub fn generate_ornament_placements<R: Rng + ?Sized>(
    count: usize,
    shape: &OrnamentShape,
    rng: &mut R,
) -> Vec<Placement> {
    (0..count)
        .map(|_| {
            let target = sample_cone_surface(
                rng,
                &shape.cone,
                shape.surface_factor,
                shape.apex_reserve,
            );
            let chaos = sample_shell(rng, &shape.shell);
            Placement { chaos, target }
        })
        .collect()
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidShape { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidShape { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidShape { name, value })
    }
}
