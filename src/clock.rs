use std::time::{Duration, Instant};

/// Frame pacing. `tick` sleeps out whatever is left of the frame budget and
/// returns the time the simulation should advance by.
pub struct Clock {
    frame_dur: Duration,
    fixed_step: bool,
    last: Instant,
}

impl Clock {
    pub fn new(fps: u32, fixed_step: bool) -> Self {
        Self {
            frame_dur: Duration::from_secs(1) / fps.max(1),
            fixed_step,
            last: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_dur
    }

    pub fn tick(&mut self) -> Duration {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame_dur {
            std::thread::sleep(self.frame_dur - elapsed);
        }
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        if self.fixed_step { self.frame_dur } else { dt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        assert_eq!(Clock::new(60, false).frame_duration(), Duration::from_nanos(16_666_666));
        assert_eq!(Clock::new(0, false).frame_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_tick_waits_out_the_frame() {
        let mut clock = Clock::new(100, false);
        let start = Instant::now();
        let dt = clock.tick();
        assert!(dt >= Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(9));
    }

    #[test]
    fn test_fixed_step_reports_nominal_frame() {
        let mut clock = Clock::new(50, true);
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(clock.tick(), Duration::from_millis(20));
    }
}
