//! Tuning configuration
//!
//! All gameplay constants live here with serde defaults, so a TOML file only
//! needs to mention what it changes:
//!
//! ```toml
//! [projectiles]
//! velocity_multiplier = 40.0
//!
//! [explosion]
//! strength = 25.0
//! ```

use crate::error::Result;
use crate::level::ProjectileKind;
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rigid-body world settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Fixed internal step in seconds
    pub fixed_timestep: f32,
    pub max_substeps: u32,
    /// Upper bound for one frame's wall-clock delta in seconds
    pub max_frame_delta: f32,
    pub solver_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.82,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 3,
            max_frame_delta: 1.0 / 30.0,
            solver_iterations: 10,
        }
    }
}

/// Structure blocks and fall detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub block_mass: f32,
    pub friction: f32,
    /// Center drop (world units) beyond which a block counts as fallen
    pub drop_threshold: f32,
    /// Minimum world-space y of the local up axis for an upright block
    pub tilt_up_threshold: f32,
    /// Smallest extent used when framing a structure
    pub min_framing_extent: f32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            block_mass: 1.0,
            friction: 0.5,
            drop_threshold: 0.375,
            tilt_up_threshold: 0.5,
            min_framing_extent: 5.0,
        }
    }
}

/// Size, mass and color of one projectile archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub radius: f32,
    pub mass: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Launch speed at power 1.0
    pub velocity_multiplier: f32,
    /// Gap between the camera and the spawned projectile's surface
    pub spawn_clearance: f32,
    /// Projectiles below this height are removed
    pub floor_escape_y: f32,
    /// Squared speed under which a sleeping projectile counts as resting
    pub rest_speed_sq: f32,
    pub standard: ProjectileSpec,
    pub heavy: ProjectileSpec,
    pub explosive: ProjectileSpec,
    pub cluster: ProjectileSpec,
    pub submunition: ProjectileSpec,
    pub explosive_lifespan_ms: f64,
    /// Impact speed along the contact normal that sets off an explosive
    pub explosive_min_impact_speed: f32,
    pub cluster_split_delay_ms: f64,
    pub submunition_count: usize,
    pub submunition_spread_impulse: f32,
    pub submunition_lifespan_ms: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            velocity_multiplier: 30.0,
            spawn_clearance: 0.5,
            floor_escape_y: -10.0,
            rest_speed_sq: 0.01,
            standard: ProjectileSpec {
                radius: 0.25,
                mass: 1.0,
                color: Color::from_hex(0x333333),
            },
            heavy: ProjectileSpec {
                radius: 0.35,
                mass: 4.0,
                color: Color::from_hex(0x222266),
            },
            explosive: ProjectileSpec {
                radius: 0.3,
                mass: 1.5,
                color: Color::from_hex(0xcc2200),
            },
            cluster: ProjectileSpec {
                radius: 0.3,
                mass: 1.2,
                color: Color::from_hex(0x228822),
            },
            submunition: ProjectileSpec {
                radius: 0.12,
                mass: 0.3,
                color: Color::from_hex(0x44aa44),
            },
            explosive_lifespan_ms: 3000.0,
            explosive_min_impact_speed: 1.0,
            cluster_split_delay_ms: 1000.0,
            submunition_count: 5,
            submunition_spread_impulse: 1.5,
            submunition_lifespan_ms: 4000.0,
        }
    }
}

impl ProjectileConfig {
    pub fn spec(&self, kind: ProjectileKind) -> &ProjectileSpec {
        match kind {
            ProjectileKind::Standard => &self.standard,
            ProjectileKind::Heavy => &self.heavy,
            ProjectileKind::Explosive => &self.explosive,
            ProjectileKind::Cluster => &self.cluster,
        }
    }
}

/// Explosion impulse and its particle burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub radius: f32,
    pub strength: f32,
    pub particle_count: usize,
    pub particle_speed: f32,
    /// Relative speed jitter, 0.25 means ±25%
    pub particle_speed_jitter: f32,
    pub particle_lifespan_ms: f64,
    /// Vertical acceleration applied to particles (negative is down)
    pub particle_gravity: f32,
    /// Per-frame velocity multiplier
    pub particle_damping: f32,
    pub particle_size: f32,
    pub particle_color: Color,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            strength: 20.0,
            particle_count: 80,
            particle_speed: 6.0,
            particle_speed_jitter: 0.25,
            particle_lifespan_ms: 800.0,
            particle_gravity: -9.8,
            particle_damping: 0.96,
            particle_size: 0.25,
            particle_color: Color::EMBER,
        }
    }
}

/// Press-and-hold power curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    pub max_charge_duration_ms: f64,
    pub max_power: f32,
    pub min_power: f32,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            max_charge_duration_ms: 1500.0,
            max_power: 1.0,
            min_power: 0.1,
        }
    }
}

/// Top-level tuning file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub physics: PhysicsConfig,
    pub structure: StructureConfig,
    pub projectiles: ProjectileConfig,
    pub explosion: ExplosionConfig,
    pub charge: ChargeConfig,
}

impl TuningConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("[config] Loaded tuning from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = TuningConfig::default();
        assert!((config.physics.fixed_timestep - 1.0 / 60.0).abs() < 1e-9);
        assert!(config.physics.solver_iterations >= 10);
        assert!((config.structure.drop_threshold - 0.375).abs() < 1e-9);
        assert!((config.structure.tilt_up_threshold - 0.5).abs() < 1e-9);
        assert_eq!(config.projectiles.submunition_count, 5);
        assert_eq!(config.explosion.particle_count, 80);
        assert!(config.explosion.particle_damping < 1.0);
        assert!(config.charge.min_power > 0.0);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_str = r#"
[projectiles]
velocity_multiplier = 40.0

[explosion]
strength = 25
"#;
        let config = TuningConfig::from_toml_str(toml_str).unwrap();
        assert!((config.projectiles.velocity_multiplier - 40.0).abs() < 1e-6);
        assert!((config.explosion.strength - 25.0).abs() < 1e-6);
        assert_eq!(config.projectiles.submunition_count, 5);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn per_kind_spec_lookup() {
        let config = ProjectileConfig::default();
        assert!(config.spec(ProjectileKind::Heavy).mass > config.spec(ProjectileKind::Standard).mass);
        assert!(config.submunition.radius < config.cluster.radius);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(TuningConfig::from_toml_str("[physics\n").is_err());
    }
}
