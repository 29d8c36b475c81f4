//! Camera framing for a level's structure

use topple_core::{LevelConfiguration, Vec3};

/// Where the camera sits and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub position: Vec3,
    pub target: Vec3,
}

/// Use the level's explicit camera if it has one, otherwise frame the
/// structure's bounding box.
///
/// The box accounts for each shape's footprint. The camera looks at the box
/// center from `0.75 × extent` above and `1.5 × extent` in front (+Z), where
/// extent is the largest box dimension but never less than `min_extent`.
pub fn compute_framing(level: &LevelConfiguration, min_extent: f32) -> Framing {
    if let Some((position, target)) = level.camera_override() {
        return Framing { position, target };
    }

    let mut blocks = level.structure.iter().map(|b| {
        let half = b.shape.descriptor().half_extents;
        (b.center() - half, b.center() + half)
    });

    let (min, max) = match blocks.next() {
        Some(first) => blocks.fold(first, |(min, max), (lo, hi)| (min.min(lo), max.max(hi))),
        None => (Vec3::ZERO, Vec3::ZERO),
    };

    let center = (min + max) * 0.5;
    let extent = (max - min).max_element().max(min_extent);

    Framing {
        position: center + Vec3::new(0.0, extent * 0.75, extent * 1.5),
        target: center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topple_core::{BlockDefinition, BlockShape, Position};

    fn block(id: &str, x: f32, y: f32, z: f32, shape: BlockShape) -> BlockDefinition {
        BlockDefinition {
            id: id.into(),
            position: Position { x, y, z },
            shape,
            is_golden: false,
            color: None,
        }
    }

    fn level(structure: Vec<BlockDefinition>) -> LevelConfiguration {
        LevelConfiguration {
            level_id: "test".into(),
            name: "Test".into(),
            structure,
            initial_projectiles: 3,
            initial_projectile_counts: None,
            camera_position: None,
            camera_target: None,
            game_message: None,
        }
    }

    #[test]
    fn explicit_camera_wins() {
        let mut lvl = level(vec![block("a", 0.0, 0.5, 0.0, BlockShape::Cube)]);
        lvl.camera_position = Some(Position { x: 1.0, y: 2.0, z: 3.0 });
        lvl.camera_target = Some(Position { x: 0.0, y: 1.0, z: 0.0 });
        let framing = compute_framing(&lvl, 5.0);
        assert_eq!(framing.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(framing.target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn single_block_uses_extent_floor() {
        let framing = compute_framing(&level(vec![block("a", 0.0, 0.5, 0.0, BlockShape::Cube)]), 5.0);
        assert_eq!(framing.target, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(framing.position, Vec3::new(0.0, 0.5 + 3.75, 7.5));
    }

    #[test]
    fn wide_structure_accounts_for_footprints() {
        // Two 3x1x1 beams 10 units apart span x in [-6.5, 6.5]
        let framing = compute_framing(
            &level(vec![
                block("l", -5.0, 0.5, 0.0, BlockShape::Cube3x1x1),
                block("r", 5.0, 0.5, 0.0, BlockShape::Cube3x1x1),
            ]),
            5.0,
        );
        assert_eq!(framing.target, Vec3::new(0.0, 0.5, 0.0));
        assert!((framing.position.y - (0.5 + 13.0 * 0.75)).abs() < 1e-5);
        assert!((framing.position.z - 13.0 * 1.5).abs() < 1e-5);
    }

    #[test]
    fn empty_structure_frames_origin() {
        let framing = compute_framing(&level(vec![]), 5.0);
        assert_eq!(framing.target, Vec3::ZERO);
        assert_eq!(framing.position, Vec3::new(0.0, 3.75, 7.5));
    }
}
