//! Radial explosion impulse

use crate::entity::{to_glam, to_na};
use crate::world::PhysicsWorld;
use rapier3d::prelude::*;
use topple_core::Vec3;

/// Impulse received by a body centered at `point` from an explosion at
/// `center`.
///
/// The impulse points away from the center and its magnitude falls off
/// linearly from `strength` at the center to zero at `radius`. Bodies at or
/// beyond the radius get `None`. A body sitting exactly on the center is
/// pushed straight up.
pub fn radial_impulse(center: Vec3, point: Vec3, radius: f32, strength: f32) -> Option<Vec3> {
    let offset = point - center;
    let distance = offset.length();
    if radius <= 0.0 || distance >= radius {
        return None;
    }
    let direction = offset.try_normalize().unwrap_or(Vec3::Y);
    Some(direction * strength * (1.0 - distance / radius))
}

/// Push every dynamic body within `radius` of `center` away from it and wake
/// it up. Returns the number of bodies affected.
pub fn apply_explosion(physics: &mut PhysicsWorld, center: Vec3, radius: f32, strength: f32) -> usize {
    // Collect first, mutate after: the body set cannot change while iterated
    let impulses: Vec<(RigidBodyHandle, Vec3)> = physics
        .rigid_body_set
        .iter()
        .filter(|(_, body)| body.is_dynamic())
        .filter_map(|(handle, body)| {
            radial_impulse(center, to_glam(body.translation()), radius, strength)
                .map(|impulse| (handle, impulse))
        })
        .collect();

    for (handle, impulse) in &impulses {
        if let Some(body) = physics.get_rigid_body_mut(*handle) {
            body.apply_impulse(to_na(*impulse), true);
        }
    }

    log::debug!(
        "[explosion] At ({:.2}, {:.2}, {:.2}) affected {} bodies",
        center.x,
        center.y,
        center.z,
        impulses.len()
    );
    impulses.len()
}
