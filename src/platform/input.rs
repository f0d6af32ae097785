//! Keyboard input with per-tick edge detection
//!
//! Raw press/release events arrive whenever the platform delivers them.
//! `KeyboardState::begin_tick` latches them so "just pressed" is true for
//! exactly one simulation tick, regardless of OS key-repeat.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Abstract game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    P1Left,
    P1Right,
    P1Jump,
    P1Kick,
    P1Fire,
    P2Left,
    P2Right,
    P2Jump,
    P2Kick,
    P2Fire,
    /// Start / restart the match
    Start,
}

impl Key {
    /// Map a browser-style key name to a game key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" | "A" => Some(Key::P1Left),
            "d" | "D" => Some(Key::P1Right),
            "w" | "W" => Some(Key::P1Jump),
            "s" | "S" => Some(Key::P1Kick),
            "q" | "Q" => Some(Key::P1Fire),
            "ArrowLeft" => Some(Key::P2Left),
            "ArrowRight" => Some(Key::P2Right),
            "ArrowUp" => Some(Key::P2Jump),
            "ArrowDown" => Some(Key::P2Kick),
            "Enter" | "/" => Some(Key::P2Fire),
            " " | "Space" => Some(Key::Start),
            _ => None,
        }
    }
}

/// Query interface the simulation reads input through
pub trait InputSource {
    /// Key is currently down
    fn is_held(&self, key: Key) -> bool;

    /// Key went down since the previous tick
    fn was_pressed(&self, key: Key) -> bool;
}

/// Keyboard state fed by raw platform events
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    /// Presses received since the last `begin_tick`
    pending: HashSet<Key>,
    /// Presses visible to the current tick
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw key-down event; repeats of a held key are ignored
    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pending.insert(key);
        }
    }

    /// Raw key-up event
    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Latch pending presses for the tick about to run
    pub fn begin_tick(&mut self) {
        self.pressed = std::mem::take(&mut self.pending);
    }

    /// Drop everything (focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pending.clear();
        self.pressed.clear();
    }
}

impl InputSource for KeyboardState {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}
