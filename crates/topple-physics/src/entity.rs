//! Paired body + visual entities, and glam/Rapier conversions

use crate::world::PhysicsWorld;
use rapier3d::na;
use rapier3d::prelude::*;
use topple_core::{ColliderSpec, Quat, Transform, Vec3, VisualHandle, VisualNode, VisualScene};

/// One rigid body together with its collider and its visual twin.
///
/// The three handles are created together by [`EntityBody::spawn`] and
/// destroyed together by [`EntityBody::release`]; nothing else removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityBody {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub visual: VisualHandle,
}

impl EntityBody {
    pub fn spawn(
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        body: RigidBody,
        collider: Collider,
        mut node: VisualNode,
    ) -> Self {
        node.transform = Transform {
            position: to_glam(body.translation()),
            rotation: quat_to_glam(body.rotation()),
        };
        let (body, collider) = physics.insert_body(body, collider);
        let visual = scene.insert(node);
        Self {
            body,
            collider,
            visual,
        }
    }

    /// Remove the body (with its collider) and the visual node in one step
    pub fn release(self, physics: &mut PhysicsWorld, scene: &mut VisualScene) {
        physics.remove_body(self.body);
        scene.remove(self.visual);
    }

    pub fn transform(&self, physics: &PhysicsWorld) -> Option<Transform> {
        physics.get_rigid_body(self.body).map(|body| Transform {
            position: to_glam(body.translation()),
            rotation: quat_to_glam(body.rotation()),
        })
    }

    /// Copy the body transform onto the visual node
    pub fn sync_visual(&self, physics: &PhysicsWorld, scene: &mut VisualScene) {
        if let Some(transform) = self.transform(physics) {
            scene.set_transform(self.visual, transform);
        }
    }
}

/// Build the Rapier shape for an engine-agnostic collider description
pub fn shared_shape(spec: &ColliderSpec) -> SharedShape {
    match *spec {
        ColliderSpec::Cuboid { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ColliderSpec::Cylinder {
            half_height,
            radius,
        } => SharedShape::cylinder(half_height, radius),
        ColliderSpec::Ball { radius } => SharedShape::ball(radius),
    }
}

pub fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn quat_to_glam(rotation: &Rotation<Real>) -> Quat {
    let c = rotation.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

pub fn quat_to_na(rotation: Quat) -> Rotation<Real> {
    na::UnitQuaternion::from_quaternion(na::Quaternion::new(
        rotation.w, rotation.x, rotation.y, rotation.z,
    ))
}
