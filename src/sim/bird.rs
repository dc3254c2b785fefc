use super::Rect;
use crate::config::Tuning;
use std::time::Duration;

/// The player's avatar. It never moves horizontally; the world scrolls past.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    x: f32,
    pub y: f32,
    pub velocity: f32,
    frame: usize,
    frame_timer: Duration,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.bird_x,
            y: tuning.height / 2.0,
            velocity: 0.0,
            frame: 0,
            frame_timer: Duration::ZERO,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Animation frame index, in `0..tuning.flap_frames`.
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn flap(&mut self, tuning: &Tuning) {
        self.velocity = tuning.flap_velocity;
    }

    /// One physics step. Gravity is a fixed per-call increment; `dt` only
    /// drives the wing animation.
    pub fn integrate(&mut self, dt: Duration, tuning: &Tuning) {
        self.velocity += tuning.gravity;
        self.y += self.velocity;

        self.frame_timer += dt;
        if self.frame_timer > tuning.frame_interval {
            self.frame = (self.frame + 1) % tuning.flap_frames.max(1);
            self.frame_timer = Duration::ZERO;
        }
    }

    /// Collision box. Ignores tilt and animation.
    pub fn bounds(&self, tuning: &Tuning) -> Rect {
        Rect::centered(self.x, self.y, tuning.bird_size, tuning.bird_size)
    }

    /// Visual tilt in degrees, positive is nose-up.
    pub fn tilt_degrees(&self) -> f32 {
        (-self.velocity * 3.0).clamp(-25.0, 90.0)
    }
}
