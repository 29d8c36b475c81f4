//! Topple Particles - explosion particle bursts
//!
//! Provides the purely visual half of an explosion:
//! - `ParticleBurst` - a fixed-size point cloud with Euler integration and fade curves
//! - `ParticleSystem` - owns active bursts, drops expired ones, packs GPU instances
//! - `ParticleInstance` - 48-byte instance data for instanced draw calls

pub mod burst;
pub mod curves;
pub mod particle;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use topple_core::ExplosionConfig;

pub use burst::ParticleBurst;
pub use particle::{Particle, ParticleInstance};

/// Owns every active burst. Bursts are independent of the physics world.
pub struct ParticleSystem {
    config: ExplosionConfig,
    bursts: Vec<ParticleBurst>,
    rng: Pcg32,
    /// Pre-allocated instance buffer for packing live particles
    instance_buffer: Vec<ParticleInstance>,
}

impl ParticleSystem {
    pub fn new(config: ExplosionConfig, seed: u64) -> Self {
        Self {
            config,
            bursts: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            instance_buffer: Vec::new(),
        }
    }

    pub fn spawn_burst(&mut self, center: Vec3, now_ms: f64) {
        let burst = ParticleBurst::new(center, now_ms, &self.config, &mut self.rng);
        log::debug!(
            "[particles] Burst of {} at ({:.2}, {:.2}, {:.2})",
            burst.len(),
            center.x,
            center.y,
            center.z
        );
        self.bursts.push(burst);
    }

    /// Advance all bursts, then release the expired ones.
    pub fn update(&mut self, dt: f32) {
        for burst in &mut self.bursts {
            burst.update(dt);
        }
        let before = self.bursts.len();
        self.bursts.retain(|b| !b.is_expired());
        let expired = before - self.bursts.len();
        if expired > 0 {
            log::trace!("[particles] Released {expired} expired burst(s)");
        }
    }

    /// Pack live particles into the instance buffer for GPU upload.
    /// Call this after `update()`.
    pub fn pack_instances(&mut self) {
        self.instance_buffer.clear();
        for burst in &self.bursts {
            burst.pack_into(&mut self.instance_buffer);
        }
    }

    /// Get the packed instance data
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instance_buffer
    }

    /// Packed instance data as raw bytes
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instance_buffer)
    }

    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    /// Number of live bursts
    pub fn active_count(&self) -> usize {
        self.bursts.len()
    }

    /// Total live particles across all bursts
    pub fn total_alive(&self) -> usize {
        self.bursts.iter().map(ParticleBurst::len).sum()
    }

    /// Drop all bursts and instance data for a level reset.
    pub fn clear(&mut self) {
        self.bursts.clear();
        self.instance_buffer.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(ExplosionConfig::default(), 0xDEAD_BEEF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_expire_and_release() {
        let mut system = ParticleSystem::default();
        system.spawn_burst(Vec3::ZERO, 0.0);
        system.update(0.5);
        system.spawn_burst(Vec3::ONE, 500.0);
        assert_eq!(system.active_count(), 2);
        assert_eq!(system.total_alive(), 160);

        // first burst passes 800 ms, second is at 350 ms
        system.update(0.35);
        assert_eq!(system.active_count(), 1);
        assert_eq!(system.bursts()[0].created_ms(), 500.0);
    }

    #[test]
    fn pack_matches_live_particles() {
        let mut system = ParticleSystem::default();
        system.spawn_burst(Vec3::ZERO, 0.0);
        system.update(1.0 / 60.0);
        system.pack_instances();
        assert_eq!(system.instances().len(), 80);
        assert_eq!(system.instance_bytes().len(), 80 * 48);

        system.clear();
        assert_eq!(system.active_count(), 0);
        assert!(system.instances().is_empty());
    }
}
