//! A single explosion's particle cloud

use crate::curves::{fade_linear, fade_quadratic};
use crate::particle::{Particle, ParticleInstance};
use glam::Vec3;
use rand::Rng;
use topple_core::random::{jittered, random_direction};
use topple_core::{Color, ExplosionConfig};

/// Fixed-size point cloud that fades out over a fixed lifespan.
///
/// Bursts never touch the rigid-body world; they are advanced by direct
/// Euler integration against constant gravity and per-frame damping.
#[derive(Debug, Clone)]
pub struct ParticleBurst {
    particles: Vec<Particle>,
    created_ms: f64,
    age_ms: f64,
    lifespan_ms: f64,
    base_size: f32,
    color: Color,
    gravity: f32,
    damping: f32,
}

impl ParticleBurst {
    pub fn new(center: Vec3, now_ms: f64, config: &ExplosionConfig, rng: &mut impl Rng) -> Self {
        let particles = (0..config.particle_count)
            .map(|_| {
                let speed = jittered(&mut *rng, config.particle_speed, config.particle_speed_jitter);
                Particle::new(center, random_direction(&mut *rng) * speed)
            })
            .collect();

        Self {
            particles,
            created_ms: now_ms,
            age_ms: 0.0,
            lifespan_ms: config.particle_lifespan_ms,
            base_size: config.particle_size,
            color: config.particle_color,
            gravity: config.particle_gravity,
            damping: config.particle_damping,
        }
    }

    /// Advance every particle by `dt` seconds and age the burst.
    pub fn update(&mut self, dt: f32) {
        self.age_ms += f64::from(dt) * 1000.0;
        for p in &mut self.particles {
            p.integrate(dt, self.gravity, self.damping);
        }
    }

    pub fn created_ms(&self) -> f64 {
        self.created_ms
    }

    pub fn age_ms(&self) -> f64 {
        self.age_ms
    }

    /// Age over lifespan; exceeds 1.0 once expired
    pub fn age_fraction(&self) -> f32 {
        if self.lifespan_ms <= 0.0 {
            return 1.0;
        }
        (self.age_ms / self.lifespan_ms) as f32
    }

    pub fn opacity(&self) -> f32 {
        fade_linear(self.age_fraction())
    }

    pub fn size(&self) -> f32 {
        self.base_size * fade_quadratic(self.age_fraction())
    }

    pub fn is_expired(&self) -> bool {
        self.age_ms > self.lifespan_ms
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Append one instance per particle with the burst's current fade applied
    pub fn pack_into(&self, out: &mut Vec<ParticleInstance>) {
        let t = self.age_fraction().min(1.0);
        let size = self.size();
        let color = self.color.with_alpha(self.color.a * self.opacity()).to_array();
        let lifespan_s = (self.lifespan_ms / 1000.0) as f32;
        out.extend(
            self.particles
                .iter()
                .map(|p| ParticleInstance::new(p, size, color, t, lifespan_s)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn burst() -> ParticleBurst {
        let mut rng = Pcg32::seed_from_u64(7);
        ParticleBurst::new(Vec3::new(0.0, 2.0, 0.0), 100.0, &ExplosionConfig::default(), &mut rng)
    }

    #[test]
    fn spawns_configured_count_at_center() {
        let b = burst();
        assert_eq!(b.len(), 80);
        assert_eq!(b.created_ms(), 100.0);
        for p in b.particles() {
            assert_eq!(p.position, Vec3::new(0.0, 2.0, 0.0));
            let speed = p.velocity.length();
            assert!((4.5 - 1e-3..=7.5 + 1e-3).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn fades_with_age() {
        let mut b = burst();
        assert_relative_eq!(b.opacity(), 1.0);
        assert_relative_eq!(b.size(), 0.25);

        // 400 ms of an 800 ms lifespan
        for _ in 0..4 {
            b.update(0.1);
        }
        assert_relative_eq!(b.age_fraction(), 0.5, epsilon = 1e-4);
        assert_relative_eq!(b.opacity(), 0.5, epsilon = 1e-4);
        assert_relative_eq!(b.size(), 0.25 * 0.75, epsilon = 1e-4);
        assert!(!b.is_expired());
    }

    #[test]
    fn expires_after_lifespan() {
        let mut b = burst();
        b.update(0.75);
        assert!(!b.is_expired());
        b.update(0.1);
        assert!(b.is_expired());
        assert_eq!(b.opacity(), 0.0);
        assert_eq!(b.size(), 0.0);
    }

    #[test]
    fn particles_fall() {
        let mut b = burst();
        let before: f32 = b.particles().iter().map(|p| p.velocity.y).sum();
        b.update(0.1);
        let after: f32 = b.particles().iter().map(|p| p.velocity.y).sum();
        assert!(after < before);
    }

    #[test]
    fn packed_alpha_tracks_opacity() {
        let mut b = burst();
        b.update(0.2);
        let mut out = Vec::new();
        b.pack_into(&mut out);
        assert_eq!(out.len(), 80);
        assert_relative_eq!(out[0].color[3], 0.75, epsilon = 1e-4);
    }
}
