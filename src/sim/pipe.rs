use super::Rect;
use crate::config::Tuning;
use rand::Rng;

/// A pair of pipes sharing one x position, with a gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f32,
    gap_top: f32,
    passed: bool,
}

impl Pipe {
    /// New pipe at `x` with a gap placed uniformly at random.
    pub fn new<R: Rng>(x: f32, rng: &mut R, tuning: &Tuning) -> Self {
        let (min_top, max_top) = tuning.gap_top_range();
        Self::with_gap(x, rng.random_range(min_top..=max_top) as f32)
    }

    pub fn with_gap(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
        }
    }

    pub fn gap_top(&self) -> f32 {
        self.gap_top
    }

    pub fn advance(&mut self, tuning: &Tuning) {
        self.x -= tuning.scroll_speed;
    }

    pub fn top_rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.x, 0.0, tuning.pipe_width, self.gap_top)
    }

    pub fn bottom_rect(&self, tuning: &Tuning) -> Rect {
        let gap_bottom = self.gap_top + tuning.pipe_gap;
        Rect::new(
            self.x,
            gap_bottom,
            tuning.pipe_width,
            tuning.ground_y() - gap_bottom,
        )
    }

    pub fn collides_with(&self, bounds: &Rect, tuning: &Tuning) -> bool {
        bounds.intersects(&self.top_rect(tuning)) || bounds.intersects(&self.bottom_rect(tuning))
    }

    /// Returns true on the one call where the trailing edge first lies left
    /// of `bird_x`, and false before and after.
    pub fn mark_passed(&mut self, bird_x: f32, tuning: &Tuning) -> bool {
        if self.passed || self.x + tuning.pipe_width >= bird_x {
            return false;
        }
        self.passed = true;
        true
    }

    pub fn is_offscreen(&self, tuning: &Tuning) -> bool {
        self.x + tuning.pipe_width < -tuning.despawn_margin
    }
}
