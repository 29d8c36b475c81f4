//! Structure manager: a level's blocks as physics entities, plus fall detection

use crate::entity::{shared_shape, EntityBody};
use crate::world::PhysicsWorld;
use rapier3d::prelude::*;
use topple_core::{
    BlockDefinition, BlockShape, Color, EntityId, IdAllocator, LevelConfiguration,
    ShapeDescriptor, StructureConfig, Transform, Vec3, VisualNode, VisualScene,
};

/// One structure block at runtime
#[derive(Debug, Clone)]
pub struct Block {
    pub id: EntityId,
    /// Authored block identifier
    pub name: String,
    pub shape: BlockShape,
    pub golden: bool,
    /// Center height at load time, the baseline for the drop test
    pub initial_y: f32,
    fallen: bool,
    pub entity: EntityBody,
}

impl Block {
    pub fn has_fallen(&self) -> bool {
        self.fallen
    }
}

/// Emitted once per block, the first time it counts as fallen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFallen {
    pub block_id: String,
    pub golden: bool,
}

/// Whether a block in `transform` has toppled.
///
/// A block has fallen when its center dropped more than `drop_threshold`
/// below `initial_y`, or (unless the shape is tilt-exempt) when its local up
/// axis points less than `tilt_up_threshold` upwards.
pub fn fall_check(
    initial_y: f32,
    transform: &Transform,
    descriptor: &ShapeDescriptor,
    config: &StructureConfig,
) -> bool {
    if initial_y - transform.position.y > config.drop_threshold {
        return true;
    }
    !descriptor.tilt_exempt && transform.up().y < config.tilt_up_threshold
}

pub struct StructureManager {
    blocks: Vec<Block>,
    config: StructureConfig,
}

impl StructureManager {
    pub fn new(config: StructureConfig) -> Self {
        Self {
            blocks: Vec::new(),
            config,
        }
    }

    /// Replace the current structure with the level's blocks.
    ///
    /// The previous blocks are fully torn down first, so the next physics
    /// step never sees a stale body. Returns the number of blocks created.
    pub fn load(
        &mut self,
        level: &LevelConfiguration,
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        ids: &mut IdAllocator,
    ) -> usize {
        self.clear(physics, scene);

        for definition in &level.structure {
            let block = self.spawn_block(definition, physics, scene, ids.next_id());
            self.blocks.push(block);
        }

        match level.golden_count() {
            1 => {}
            0 => log::warn!("[structure] Level '{}' has no golden block", level.level_id),
            n => log::warn!("[structure] Level '{}' has {n} golden blocks", level.level_id),
        }
        log::info!(
            "[structure] Loaded {} block(s) for level '{}'",
            self.blocks.len(),
            level.level_id
        );
        self.blocks.len()
    }

    fn spawn_block(
        &self,
        definition: &BlockDefinition,
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        id: EntityId,
    ) -> Block {
        let descriptor = definition.shape.descriptor();
        let center = definition.center();

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y, center.z])
            .build();
        let collider = ColliderBuilder::new(shared_shape(&descriptor.collider))
            .mass(self.config.block_mass)
            .friction(self.config.friction)
            .build();

        let default_color = if definition.is_golden {
            Color::GOLD
        } else {
            Color::STONE
        };
        let color = definition
            .color
            .as_deref()
            .and_then(Color::parse_hex)
            .unwrap_or(default_color);

        let node = VisualNode {
            mesh: descriptor.mesh,
            color,
            transform: Transform::from_position(center),
        };
        let entity = EntityBody::spawn(physics, scene, body, collider, node);

        Block {
            id,
            name: definition.id.clone(),
            shape: definition.shape,
            golden: definition.is_golden,
            initial_y: center.y,
            fallen: false,
            entity,
        }
    }

    /// Remove every block's body and visual node
    pub fn clear(&mut self, physics: &mut PhysicsWorld, scene: &mut VisualScene) {
        for block in self.blocks.drain(..) {
            block.entity.release(physics, scene);
        }
    }

    pub fn sync_visuals(&self, physics: &PhysicsWorld, scene: &mut VisualScene) {
        for block in &self.blocks {
            block.entity.sync_visual(physics, scene);
        }
    }

    /// Mark newly toppled blocks. Each block is reported at most once.
    pub fn detect_falls(&mut self, physics: &PhysicsWorld) -> Vec<BlockFallen> {
        let mut fallen = Vec::new();
        for block in self.blocks.iter_mut().filter(|b| !b.fallen) {
            let Some(transform) = block.entity.transform(physics) else {
                continue;
            };
            if fall_check(
                block.initial_y,
                &transform,
                block.shape.descriptor(),
                &self.config,
            ) {
                block.fallen = true;
                log::debug!(
                    "[structure] Block '{}' fell (golden: {})",
                    block.name,
                    block.golden
                );
                fallen.push(BlockFallen {
                    block_id: block.name.clone(),
                    golden: block.golden,
                });
            }
        }
        fallen
    }

    /// Current position of the first golden block, if the level has one
    pub fn golden_position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        self.blocks
            .iter()
            .find(|b| b.golden)
            .and_then(|b| b.entity.transform(physics))
            .map(|t| t.position)
    }

    pub fn block_by_collider(&self, collider: ColliderHandle) -> Option<&Block> {
        self.blocks.iter().find(|b| b.entity.collider == collider)
    }

    pub fn block_by_name(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn fallen_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.fallen).count()
    }
}
