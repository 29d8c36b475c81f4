//! Topple Core - Foundational types for the topple demolition game
//!
//! This crate provides the types that every other topple crate depends on:
//! - `EntityId` - per-session identifiers for physics entities
//! - `Transform`, `Color` and the glam math re-exports
//! - `BlockShape` / `ShapeDescriptor` - the single shape table
//! - `LevelConfiguration` - read-only level input
//! - `TuningConfig` - every tunable gameplay constant
//! - `VisualScene` - the retained visual twin of the simulation
//! - `random` - direction and jitter sampling
//! - Error types and Result alias

mod config;
mod error;
mod id;
mod level;
pub mod random;
mod shape;
mod types;
mod visual;

pub use config::{
    ChargeConfig, ExplosionConfig, PhysicsConfig, ProjectileConfig, ProjectileSpec,
    StructureConfig, TuningConfig,
};
pub use error::{Result, ToppleError};
pub use id::{EntityId, IdAllocator};
pub use level::{BlockDefinition, LevelConfiguration, LevelIssue, Position, ProjectileKind};
pub use shape::{BlockShape, ColliderSpec, MeshSpec, ShapeDescriptor};
pub use types::{Color, Transform};
pub use visual::{VisualHandle, VisualNode, VisualScene};

pub use glam::{Quat, Vec3};
