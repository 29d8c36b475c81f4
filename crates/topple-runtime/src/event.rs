//! Game events produced by the frame loop

use glam::Vec3;
use serde::Serialize;
use topple_core::{EntityId, ProjectileKind};

/// Something the embedding layer (UI, audio, scripted agent) may react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A block crossed the fall threshold; emitted at most once per block
    BlockFallen { block_id: String, golden: bool },
    ProjectileLaunched {
        id: EntityId,
        kind: ProjectileKind,
        power: f32,
    },
    Exploded { position: Vec3 },
    /// A cluster projectile released its submunitions
    ClusterSplit { parent: EntityId, count: usize },
    LevelLoaded { level_id: String, blocks: usize },
}

impl GameEvent {
    pub fn is_golden_fall(&self) -> bool {
        matches!(self, GameEvent::BlockFallen { golden: true, .. })
    }
}
