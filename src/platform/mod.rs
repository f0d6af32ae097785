//! Platform abstraction layer
//!
//! Handles the boundary between raw platform events and the simulation:
//! - Input events (held keys and edge-triggered presses per tick)

pub mod input;

pub use input::{InputSource, Key, KeyboardState};
