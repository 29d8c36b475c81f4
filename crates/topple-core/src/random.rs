//! Sampling helpers shared by submunition spread and particle bursts

use glam::Vec3;
use rand::Rng;

/// Returns a random unit direction vector (uniformly on sphere surface)
pub fn random_direction(rng: &mut impl Rng) -> Vec3 {
    // Marsaglia method for uniform sphere sampling
    loop {
        let x: f32 = rng.random_range(-1.0..1.0);
        let y: f32 = rng.random_range(-1.0..1.0);
        let s = x * x + y * y;
        if s < 1.0 {
            let factor = 2.0 * (1.0 - s).sqrt();
            return Vec3::new(x * factor, y * factor, 1.0 - 2.0 * s);
        }
    }
}

/// `base` scaled by a uniform factor in `[1 - fraction, 1 + fraction]`
pub fn jittered(rng: &mut impl Rng, base: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return base;
    }
    base * rng.random_range((1.0 - fraction)..=(1.0 + fraction))
}
