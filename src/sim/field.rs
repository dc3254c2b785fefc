use super::{Pipe, Rect};
use crate::config::Tuning;
use rand::Rng;
use std::time::Duration;

/// Pipes currently in play, oldest (leftmost) first.
#[derive(Debug, Clone, Default)]
pub struct PipeField {
    pipes: Vec<Pipe>,
    spawn_timer: Duration,
}

impl PipeField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Append a pipe just past the right edge.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) {
        self.pipes
            .push(Pipe::new(tuning.width + tuning.spawn_offset, rng, tuning));
    }

    /// Advance the spawn timer by `dt`, spawning when the interval elapses.
    /// Spawns at most one pipe per call and restarts the timer from zero, so
    /// pipes are always a full interval apart, even after a stall.
    pub fn update_spawner<R: Rng>(&mut self, dt: Duration, rng: &mut R, tuning: &Tuning) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer < tuning.spawn_interval {
            return false;
        }
        self.spawn_timer = Duration::ZERO;
        self.spawn(rng, tuning);
        true
    }

    /// Scroll every pipe and drop the ones that left the screen.
    pub fn advance_all(&mut self, tuning: &Tuning) {
        for pipe in &mut self.pipes {
            pipe.advance(tuning);
        }
        self.pipes.retain(|p| !p.is_offscreen(tuning));
    }

    /// Number of pipes whose trailing edge crossed `bird_x` since the last call.
    pub fn check_scoring(&mut self, bird_x: f32, tuning: &Tuning) -> u32 {
        let mut passed = 0;
        for pipe in &mut self.pipes {
            if pipe.mark_passed(bird_x, tuning) {
                passed += 1;
            }
        }
        passed
    }

    pub fn collides_with(&self, bounds: &Rect, tuning: &Tuning) -> bool {
        self.pipes.iter().any(|p| p.collides_with(bounds, tuning))
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }
}
