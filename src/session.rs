use crate::audio::{Audio, Cue};
use crate::config::Tuning;
use crate::sim::{DeathCause, GameEvent, Simulation};
use crate::store::{BEST_SCORE_KEY, ScoreStore};
use std::time::Duration;

/// A running game wired to its collaborators: the simulation decides, the
/// session plays sounds and saves new best scores.
pub struct Session {
    sim: Simulation,
    store: Box<dyn ScoreStore>,
    audio: Audio,
}

impl Session {
    pub fn new(tuning: Tuning, store: Box<dyn ScoreStore>, audio: Audio, seed: u64) -> Self {
        let best = store.load_int(BEST_SCORE_KEY);
        log::info!("Starting with best score {best}, seed {seed}");
        Self {
            sim: Simulation::new(tuning, best, seed),
            store,
            audio,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn press(&mut self) {
        if let Some(event) = self.sim.press() {
            self.dispatch(event);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        for event in self.sim.step(dt) {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        let cue = match event {
            GameEvent::Flapped => Cue::Wing,
            GameEvent::Scored => Cue::Point,
            GameEvent::Died { cause, new_best, .. } => {
                if let Some(best) = new_best {
                    self.store.save_int(BEST_SCORE_KEY, best);
                }
                match cause {
                    DeathCause::Boundary => Cue::Die,
                    DeathCause::Obstacle => Cue::Hit,
                }
            }
            GameEvent::Restarted => {
                log::info!("Restarted");
                Cue::Swoosh
            }
        };
        self.audio.play(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    const FRAME: Duration = Duration::from_millis(16);

    /// Store that shares its contents with the test through a cell.
    struct Shared(Rc<RefCell<MemoryStore>>);

    impl ScoreStore for Shared {
        fn load_int(&self, key: &str) -> u32 {
            self.0.borrow().load_int(key)
        }

        fn save_int(&mut self, key: &str, value: u32) {
            self.0.borrow_mut().save_int(key, value);
        }
    }

    fn session_with_best(best: u32) -> (Session, Rc<RefCell<MemoryStore>>) {
        let mut store = MemoryStore::new();
        store.save_int(BEST_SCORE_KEY, best);
        let shared = Rc::new(RefCell::new(store));
        let session = Session::new(
            Tuning::default(),
            Box::new(Shared(shared.clone())),
            Audio::muted(),
            11,
        );
        (session, shared)
    }

    /// End an episode holding `score` points by flying into the ceiling.
    fn crash_with_score(session: &mut Session, score: u32) {
        if session.sim().is_game_over() {
            session.press();
        }
        session.sim.set_score(score);
        for _ in 0..100 {
            if session.sim().is_game_over() {
                break;
            }
            session.press();
            session.tick(FRAME);
        }
        assert!(session.sim().is_game_over());
    }

    #[test]
    fn test_loads_best_on_start() {
        let (session, _) = session_with_best(9);
        assert_eq!(session.sim().best_score(), 9);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let (mut session, store) = session_with_best(5);
        crash_with_score(&mut session, 3);
        assert_eq!(session.sim().best_score(), 5);
        assert_eq!(store.borrow().load_int(BEST_SCORE_KEY), 5);
    }

    #[test]
    fn test_higher_score_is_persisted() {
        let (mut session, store) = session_with_best(5);
        crash_with_score(&mut session, 7);
        assert_eq!(session.sim().best_score(), 7);
        assert_eq!(store.borrow().load_int(BEST_SCORE_KEY), 7);
    }

    #[test]
    fn test_press_restarts_after_crash() {
        let (mut session, _) = session_with_best(0);
        while !session.sim().is_game_over() {
            session.tick(FRAME);
        }
        session.press();
        assert!(!session.sim().is_game_over());
        assert_eq!(session.sim().score(), 0);
    }

    #[test]
    fn test_file_backed_session() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new(
            Tuning::default(),
            Box::new(FileStore::new(dir.path())),
            Audio::muted(),
            3,
        );
        crash_with_score(&mut session, 2);
        let store = FileStore::new(dir.path());
        assert_eq!(store.load_int(BEST_SCORE_KEY), 2);

        let session = Session::new(Tuning::default(), Box::new(store), Audio::muted(), 3);
        assert_eq!(session.sim().best_score(), 2);
    }
}
