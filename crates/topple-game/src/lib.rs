//! Topple Game - the per-level frame loop
//!
//! Composes the physics, particle and runtime crates into one session:
//! - `Game` - owns every entity and runs the ordered per-frame pipeline
//! - `Camera` - launch origin and aim direction
//! - `AutoPlayer` - scripted agent that aims at the golden block and fires

mod autoplay;
mod camera;
mod game;

pub use autoplay::AutoPlayer;
pub use camera::Camera;
pub use game::{FrameGates, FrameReport, Game};
