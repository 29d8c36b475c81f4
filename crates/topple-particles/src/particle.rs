//! Per-particle state and GPU instance data

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// CPU-side particle state (not sent to GPU)
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// One explicit Euler step. Damping is a per-call factor and is not
    /// scaled by `dt`.
    pub fn integrate(&mut self, dt: f32, gravity: f32, damping: f32) {
        self.position += self.velocity * dt;
        self.velocity.y += gravity * dt;
        self.velocity *= damping;
    }
}

/// GPU instance data, matching a `ParticleInstance` vertex struct.
/// 48 bytes, 16-byte aligned (3 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position + size packed into vec4
    pub pos_size: [f32; 4], // xyz = position, w = size
    /// Color with alpha
    pub color: [f32; 4], // rgba
    /// Age fraction and burst lifespan; zw reserved
    pub age_life: [f32; 4], // x = age fraction, y = lifespan seconds
}

impl ParticleInstance {
    pub fn new(p: &Particle, size: f32, color: [f32; 4], age_fraction: f32, lifespan_s: f32) -> Self {
        Self {
            pos_size: [p.position.x, p.position.y, p.position.z, size],
            color,
            age_life: [age_fraction, lifespan_s, 0.0, 0.0],
        }
    }
}
