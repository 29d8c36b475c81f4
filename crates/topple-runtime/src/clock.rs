//! Game clock with a clamped frame delta

use std::time::Instant;

/// Tracks session time and the clamped delta of the current frame
pub struct GameClock {
    /// Total elapsed game time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds, after clamping
    pub delta_time: f64,
    /// Upper bound for a single frame's delta
    pub max_delta: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta: 1.0 / 30.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    /// Create a new game clock clamping frames to 1/30 s
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_delta(max_delta: f64) -> Self {
        Self {
            max_delta,
            ..Self::default()
        }
    }

    /// Advance the clock from wall time. Call once per frame.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return 0.0;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed)
    }

    /// Advance by an explicit delta (headless runs and tests).
    /// Returns the clamped delta.
    pub fn advance(&mut self, dt: f64) -> f64 {
        // Clamp so a stall (tab switch, debugger) can't explode the simulation
        self.delta_time = dt.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.delta_time
    }

    /// Session time in milliseconds, the unit projectile timers use
    pub fn elapsed_ms(&self) -> f64 {
        self.total_time * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_defaults() {
        let clock = GameClock::new();
        assert!((clock.max_delta - 1.0 / 30.0).abs() < 1e-10);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn first_tick_zero_delta() {
        let mut clock = GameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn advance_clamps() {
        let mut clock = GameClock::new();
        let dt = clock.advance(0.5);
        assert!((dt - 1.0 / 30.0).abs() < 1e-10);
        clock.advance(0.01);
        assert!((clock.elapsed_ms() - (1000.0 / 30.0 + 10.0)).abs() < 1e-6);
    }

    #[test]
    fn negative_delta_ignored() {
        let mut clock = GameClock::with_max_delta(0.1);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.total_time, 0.0);
    }
}
