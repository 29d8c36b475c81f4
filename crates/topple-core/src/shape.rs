//! Block shapes and the shape-descriptor table
//!
//! Every consumer of a block's shape (collision volume construction, visual
//! geometry, framing footprint, fall detection) reads the same
//! [`ShapeDescriptor`] from [`BlockShape::descriptor`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape tag of a structure block. All shapes are one unit tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockShape {
    #[default]
    Cube,
    Cylinder,
    Sphere,
    #[serde(rename = "cube_2x1x1")]
    Cube2x1x1,
    #[serde(rename = "cube_3x1x1")]
    Cube3x1x1,
}

/// Engine-agnostic collision volume, converted by the physics crate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderSpec {
    Cuboid { half_extents: Vec3 },
    /// Y-axis aligned cylinder
    Cylinder { half_height: f32, radius: f32 },
    Ball { radius: f32 },
}

/// Visual geometry handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshSpec {
    Box { size: Vec3 },
    Cylinder {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Sphere { radius: f32, segments: u32 },
}

/// Everything the game needs to know about one shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub shape: BlockShape,
    /// Axis-aligned footprint half-extents, used for framing
    pub half_extents: Vec3,
    pub collider: ColliderSpec,
    pub mesh: MeshSpec,
    /// Rolling shapes skip the tilt test during fall detection
    pub tilt_exempt: bool,
}

const UNIT_RADIUS: f32 = 0.5;

static DESCRIPTORS: [ShapeDescriptor; 5] = [
    ShapeDescriptor {
        shape: BlockShape::Cube,
        half_extents: Vec3::new(0.5, 0.5, 0.5),
        collider: ColliderSpec::Cuboid {
            half_extents: Vec3::new(0.5, 0.5, 0.5),
        },
        mesh: MeshSpec::Box {
            size: Vec3::new(1.0, 1.0, 1.0),
        },
        tilt_exempt: false,
    },
    ShapeDescriptor {
        shape: BlockShape::Cylinder,
        half_extents: Vec3::new(UNIT_RADIUS, 0.5, UNIT_RADIUS),
        collider: ColliderSpec::Cylinder {
            half_height: 0.5,
            radius: UNIT_RADIUS,
        },
        mesh: MeshSpec::Cylinder {
            radius: UNIT_RADIUS,
            height: 1.0,
            segments: 32,
        },
        tilt_exempt: false,
    },
    ShapeDescriptor {
        shape: BlockShape::Sphere,
        half_extents: Vec3::new(UNIT_RADIUS, UNIT_RADIUS, UNIT_RADIUS),
        collider: ColliderSpec::Ball {
            radius: UNIT_RADIUS,
        },
        mesh: MeshSpec::Sphere {
            radius: UNIT_RADIUS,
            segments: 32,
        },
        tilt_exempt: true,
    },
    ShapeDescriptor {
        shape: BlockShape::Cube2x1x1,
        half_extents: Vec3::new(1.0, 0.5, 0.5),
        collider: ColliderSpec::Cuboid {
            half_extents: Vec3::new(1.0, 0.5, 0.5),
        },
        mesh: MeshSpec::Box {
            size: Vec3::new(2.0, 1.0, 1.0),
        },
        tilt_exempt: false,
    },
    ShapeDescriptor {
        shape: BlockShape::Cube3x1x1,
        half_extents: Vec3::new(1.5, 0.5, 0.5),
        collider: ColliderSpec::Cuboid {
            half_extents: Vec3::new(1.5, 0.5, 0.5),
        },
        mesh: MeshSpec::Box {
            size: Vec3::new(3.0, 1.0, 1.0),
        },
        tilt_exempt: false,
    },
];

impl BlockShape {
    pub const ALL: [BlockShape; 5] = [
        BlockShape::Cube,
        BlockShape::Cylinder,
        BlockShape::Sphere,
        BlockShape::Cube2x1x1,
        BlockShape::Cube3x1x1,
    ];

    pub fn descriptor(self) -> &'static ShapeDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockShape::Cube => "cube",
            BlockShape::Cylinder => "cylinder",
            BlockShape::Sphere => "sphere",
            BlockShape::Cube2x1x1 => "cube_2x1x1",
            BlockShape::Cube3x1x1 => "cube_3x1x1",
        }
    }
}

impl fmt::Display for BlockShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_tag() {
        for shape in BlockShape::ALL {
            assert_eq!(shape.descriptor().shape, shape);
        }
    }

    #[test]
    fn all_shapes_are_unit_height() {
        for shape in BlockShape::ALL {
            assert!((shape.descriptor().half_extents.y - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn only_sphere_is_tilt_exempt() {
        let exempt: Vec<_> = BlockShape::ALL
            .into_iter()
            .filter(|s| s.descriptor().tilt_exempt)
            .collect();
        assert_eq!(exempt, vec![BlockShape::Sphere]);
    }

    #[test]
    fn long_cubes_footprint() {
        assert!((BlockShape::Cube2x1x1.descriptor().half_extents.x - 1.0).abs() < 1e-6);
        assert!((BlockShape::Cube3x1x1.descriptor().half_extents.x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn tags_round_trip_through_json() {
        let shape: BlockShape = serde_json::from_str("\"cube_3x1x1\"").unwrap();
        assert_eq!(shape, BlockShape::Cube3x1x1);
        assert_eq!(serde_json::to_string(&BlockShape::Sphere).unwrap(), "\"sphere\"");
    }
}
