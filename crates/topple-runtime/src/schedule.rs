//! Cooperative loop handle

/// Start/stop switch for a loop that is polled once per scheduled tick.
///
/// Stopping is idempotent, and a stopped ticker never reports another tick,
/// so callbacks guarded by [`Ticker::poll`] cannot fire after `stop`.
#[derive(Debug, Clone)]
pub struct Ticker {
    name: &'static str,
    running: bool,
    ticks: u64,
}

impl Ticker {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            running: false,
            ticks: 0,
        }
    }

    /// Returns false if the loop was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.ticks = 0;
        log::trace!("[{}] loop started", self.name);
        true
    }

    /// Returns false if the loop was not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        log::trace!("[{}] loop stopped after {} tick(s)", self.name, self.ticks);
        true
    }

    /// Claim one tick; false once stopped.
    pub fn poll(&mut self) -> bool {
        if self.running {
            self.ticks += 1;
        }
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks since the last start
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let mut ticker = Ticker::new("test");
        assert!(!ticker.stop());
        assert!(ticker.start());
        assert!(!ticker.start());
        assert!(ticker.stop());
        assert!(!ticker.stop());
        assert!(!ticker.is_running());
    }

    #[test]
    fn no_ticks_after_stop() {
        let mut ticker = Ticker::new("test");
        assert!(!ticker.poll());
        ticker.start();
        assert!(ticker.poll());
        assert!(ticker.poll());
        assert_eq!(ticker.ticks(), 2);
        ticker.stop();
        assert!(!ticker.poll());
        assert_eq!(ticker.ticks(), 2);
    }
}
