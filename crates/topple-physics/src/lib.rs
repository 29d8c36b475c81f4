//! Topple Physics - Rapier 3D simulation for the demolition game
//!
//! Provides the rigid-body half of the game:
//! - `PhysicsWorld`: wraps the Rapier pipeline, ground plane and fixed-step advance
//! - `EntityBody`: a body, its collider and its visual node, created and released together
//! - `StructureManager`: level blocks, fall detection and golden-block lookup
//! - `compute_framing`: default camera placement for a structure
//! - `ProjectileManager`: projectile lifecycles (explosive fuses, cluster splits, removal)
//! - `apply_explosion`: radial impulse with linear falloff

pub mod entity;
pub mod explosion;
pub mod framing;
pub mod projectile;
pub mod structure;
pub mod world;

pub use entity::EntityBody;
pub use explosion::{apply_explosion, radial_impulse};
pub use framing::{compute_framing, Framing};
pub use projectile::{LifecycleReport, Projectile, ProjectileManager, ProjectileState};
pub use structure::{fall_check, Block, BlockFallen, StructureManager};
pub use world::PhysicsWorld;

pub use rapier3d;
