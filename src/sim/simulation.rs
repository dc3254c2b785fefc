use super::{Bird, PipeField};
use crate::config::Tuning;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::time::Duration;

/// What ended an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Hit the ceiling or the ground.
    Boundary,
    /// Hit a pipe.
    Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver(DeathCause),
}

/// Things the outside world may want to react to (sound, persistence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flapped,
    Scored,
    Died {
        cause: DeathCause,
        score: u32,
        /// Set when this episode beat the previous best.
        new_best: Option<u32>,
    },
    Restarted,
}

/// The whole game state: bird, pipes, score and phase.
#[derive(Debug, Clone)]
pub struct Simulation {
    tuning: Tuning,
    bird: Bird,
    field: PipeField,
    score: u32,
    best_score: u32,
    phase: Phase,
    ground_scroll: f32,
    rng: Pcg32,
}

impl Simulation {
    pub fn new(tuning: Tuning, best_score: u32, seed: u64) -> Self {
        Self {
            bird: Bird::new(&tuning),
            field: PipeField::new(),
            score: 0,
            best_score,
            phase: Phase::Playing,
            ground_scroll: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn field(&self) -> &PipeField {
        &self.field
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn ground_scroll(&self) -> f32 {
        self.ground_scroll
    }

    /// The single player button: flap while playing, restart after a crash.
    pub fn press(&mut self) -> Option<GameEvent> {
        match self.phase {
            Phase::Playing => {
                self.bird.flap(&self.tuning);
                Some(GameEvent::Flapped)
            }
            Phase::GameOver(_) => {
                self.reset();
                Some(GameEvent::Restarted)
            }
        }
    }

    /// Start a fresh episode. The best score survives.
    pub fn reset(&mut self) {
        self.bird = Bird::new(&self.tuning);
        self.field = PipeField::new();
        self.score = 0;
        self.phase = Phase::Playing;
        self.ground_scroll = 0.0;
    }

    /// Advance one frame. Does nothing once the game is over.
    pub fn step(&mut self, dt: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_game_over() {
            return events;
        }
        let tuning = &self.tuning;
        // Already pressed against the ceiling: integration alone could pull
        // the bird back below it when velocity is zero.
        let at_ceiling = self.bird.y <= 0.0;

        self.field.update_spawner(dt, &mut self.rng, tuning);
        self.bird.integrate(dt, tuning);
        self.field.advance_all(tuning);

        let passed = self.field.check_scoring(self.bird.x(), tuning);
        for _ in 0..passed {
            self.score += 1;
            events.push(GameEvent::Scored);
        }

        if let Some(cause) = self.check_collision(at_ceiling) {
            events.push(self.game_over(cause));
        } else {
            self.ground_scroll += self.tuning.scroll_speed;
        }
        events
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn check_collision(&self, at_ceiling: bool) -> Option<DeathCause> {
        let tuning = &self.tuning;
        if at_ceiling || self.bird.y <= 0.0 || self.bird.y >= tuning.ground_y() {
            return Some(DeathCause::Boundary);
        }
        if self
            .field
            .collides_with(&self.bird.bounds(tuning), tuning)
        {
            return Some(DeathCause::Obstacle);
        }
        None
    }

    fn game_over(&mut self, cause: DeathCause) -> GameEvent {
        self.phase = Phase::GameOver(cause);
        let new_best = (self.score > self.best_score).then_some(self.score);
        self.best_score = self.best_score.max(self.score);
        log::info!(
            "Game over ({:?}): score {}, best {}, {} pipes on screen",
            cause,
            self.score,
            self.best_score,
            self.field.len()
        );
        GameEvent::Died {
            cause,
            score: self.score,
            new_best,
        }
    }
}
