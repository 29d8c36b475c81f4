//! Press-and-hold launch power
//!
//! Charging runs on its own [`Ticker`], independent of the frame loop, so it
//! keeps reporting progress while gameplay is paused. Whether a charge may
//! start at all is decided by the caller through [`ChargeGates`].

use crate::schedule::Ticker;
use topple_core::ChargeConfig;

/// Power for a hold of `elapsed_ms`.
///
/// Rises linearly to `max_power` over `max_duration_ms`, then wraps and rises
/// again. An exact multiple of the window reads as `max_power`, not zero.
pub fn charge_power(elapsed_ms: f64, max_duration_ms: f64, max_power: f32) -> f32 {
    let max_power = f64::from(max_power);
    if max_duration_ms <= 0.0 || max_power <= 0.0 {
        return max_power as f32;
    }
    let raw = elapsed_ms.max(0.0) / max_duration_ms;
    let wrapped = raw % max_power;
    if wrapped == 0.0 && raw > 0.0 {
        max_power as f32
    } else {
        wrapped as f32
    }
}

/// Caller-supplied predicates, evaluated fresh on every `begin`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeGates {
    pub can_attempt: bool,
    /// Auto-play suppresses manual charging entirely
    pub auto_play: bool,
}

impl ChargeGates {
    pub fn allows_manual(&self) -> bool {
        self.can_attempt && !self.auto_play
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChargeEvent {
    Started,
    Progress(f32),
    Completed(f32),
}

pub struct ChargeController {
    config: ChargeConfig,
    ticker: Ticker,
    started_ms: f64,
    events: Vec<ChargeEvent>,
}

impl ChargeController {
    pub fn new(config: ChargeConfig) -> Self {
        Self {
            config,
            ticker: Ticker::new("charge"),
            started_ms: 0.0,
            events: Vec::new(),
        }
    }

    /// Start charging. Returns false when gated or already charging.
    pub fn begin(&mut self, now_ms: f64, gates: ChargeGates) -> bool {
        if !gates.allows_manual() || self.ticker.is_running() {
            return false;
        }
        self.started_ms = now_ms;
        self.ticker.start();
        self.events.push(ChargeEvent::Started);
        log::debug!("[charge] Started at {now_ms:.0} ms");
        true
    }

    /// One scheduled poll; reports the current power while charging.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        if !self.ticker.poll() {
            return None;
        }
        let power = self.current_power(now_ms);
        self.events.push(ChargeEvent::Progress(power));
        Some(power)
    }

    /// Finish charging and return the launch power, floored at the minimum.
    pub fn release(&mut self, now_ms: f64) -> Option<f32> {
        if !self.ticker.stop() {
            return None;
        }
        let power = self.current_power(now_ms).max(self.config.min_power);
        self.events.push(ChargeEvent::Completed(power));
        log::debug!("[charge] Completed with power {power:.2}");
        Some(power)
    }

    /// A cancel finalizes exactly like a release.
    pub fn cancel(&mut self, now_ms: f64) -> Option<f32> {
        self.release(now_ms)
    }

    /// Tear down without completing. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.ticker.stop() {
            log::debug!("[charge] Stopped without launch");
        }
    }

    pub fn is_charging(&self) -> bool {
        self.ticker.is_running()
    }

    fn current_power(&self, now_ms: f64) -> f32 {
        charge_power(
            now_ms - self.started_ms,
            self.config.max_charge_duration_ms,
            self.config.max_power,
        )
    }

    pub fn drain_events(&mut self) -> Vec<ChargeEvent> {
        std::mem::take(&mut self.events)
    }
}
