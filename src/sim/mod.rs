//! Game simulation
//!
//! Everything that decides what happens lives here; nothing in this module
//! touches the terminal, the audio device or the filesystem. Physics runs one
//! fixed increment per tick, and all randomness comes from the seeded RNG the
//! [`Simulation`] owns.

mod bird;
mod field;
mod pipe;
mod simulation;

pub use bird::Bird;
pub use field::PipeField;
pub use pipe::Pipe;
pub use simulation::{DeathCause, GameEvent, Phase, Simulation};

/// Axis-aligned rectangle in playfield units, `(x, y)` at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Strict overlap: rectangles that only share an edge do not intersect,
    /// and empty rectangles intersect nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}
