//! Value-over-lifetime curves for a fading burst

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Opacity falls linearly with age and never goes negative
pub fn fade_linear(t: f32) -> f32 {
    lerp_f32(1.0, 0.0, t).max(0.0)
}

/// Size multiplier falls with the square of age, so the burst holds its
/// size early and shrinks quickly near the end
pub fn fade_quadratic(t: f32) -> f32 {
    (1.0 - t * t).max(0.0)
}
