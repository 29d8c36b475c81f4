//! Topple Runtime - Game loop infrastructure
//!
//! Provides the building blocks that sit around the simulation:
//! - `GameClock` - clamped frame delta and session time
//! - `GameEvent` / `EventBus` - typed event queue drained by the embedding layer
//! - `Ticker` - idempotent start/stop handle for a cooperative loop
//! - `ChargeController` - press-and-hold launch power with a sawtooth curve
//! - `GameSession` - score, ammunition and win/lose state

mod charge;
mod clock;
mod event;
mod event_bus;
mod schedule;
mod session;

pub use charge::{charge_power, ChargeController, ChargeEvent, ChargeGates};
pub use clock::GameClock;
pub use event::GameEvent;
pub use event_bus::{EventBus, Fall};
pub use schedule::Ticker;
pub use session::{GameSession, SessionOutcome, BLOCK_POINTS, GOLDEN_POINTS};
