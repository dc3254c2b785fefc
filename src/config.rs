use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "flappy-arcade", version, about = "Flap through the pipes, in your terminal")]
pub struct Args {
    /// Seed for pipe placement (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target frame rate
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Feed the nominal frame time to the simulation instead of measured time
    #[arg(long)]
    pub fixed_step: bool,

    /// Disable sound
    #[arg(long)]
    pub mute: bool,

    /// Sound volume, 0.0 to 1.0
    #[arg(long, default_value_t = 0.8)]
    pub volume: f32,

    /// Keep the best score for this run only
    #[arg(long)]
    pub no_save: bool,

    /// Where the best score is kept
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log file (defaults to flappy-arcade.log in the data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn fps(&self) -> u32 {
        self.fps.clamp(1, 240)
    }

    pub fn volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}

/// Physics and playfield constants, in logical playfield units.
///
/// Velocities and accelerations are per tick, not per second: the game is
/// tuned around one integration step per rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub width: f32,
    pub height: f32,
    pub ground_height: f32,

    pub gravity: f32,
    pub flap_velocity: f32,
    pub scroll_speed: f32,

    pub bird_x: f32,
    pub bird_size: f32,
    pub flap_frames: usize,
    pub frame_interval: Duration,

    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Minimum distance between a gap and the ceiling or the ground.
    pub gap_margin: f32,
    /// How far past the right edge new pipes appear.
    pub spawn_offset: f32,
    /// How far past the left edge a pipe's trailing edge goes before removal.
    pub despawn_margin: f32,
    pub spawn_interval: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            ground_height: 80.0,

            gravity: 0.45,
            flap_velocity: -8.0,
            scroll_speed: 2.5,

            bird_x: 80.0,
            bird_size: 28.0,
            flap_frames: 3,
            frame_interval: Duration::from_millis(120),

            pipe_width: 60.0,
            pipe_gap: 150.0,
            gap_margin: 20.0,
            spawn_offset: 20.0,
            despawn_margin: 10.0,
            spawn_interval: Duration::from_millis(1500),
        }
    }
}

impl Tuning {
    /// Y coordinate of the top of the ground.
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Inclusive range of valid `gap_top` values. Collapses to the lower bound
    /// when the gap cannot fit.
    pub fn gap_top_range(&self) -> (i32, i32) {
        let min_top = self.gap_margin as i32;
        let max_top = (self.ground_y() - self.pipe_gap - self.gap_margin) as i32;
        (min_top, max_top.max(min_top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gap_range() {
        let t = Tuning::default();
        assert_eq!(t.ground_y(), 520.0);
        assert_eq!(t.gap_top_range(), (20, 350));
    }

    #[test]
    fn test_degenerate_gap_range_clamps() {
        let t = Tuning {
            pipe_gap: 900.0,
            ..Tuning::default()
        };
        assert_eq!(t.gap_top_range(), (20, 20));
    }

    #[test]
    fn test_args_clamp() {
        let args = Args::parse_from(["flappy-arcade", "--fps", "0", "--volume", "3.5"]);
        assert_eq!(args.fps(), 1);
        assert_eq!(args.volume(), 1.0);
        assert!(!args.mute);
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_args_seed() {
        let args = Args::parse_from(["flappy-arcade", "--seed", "42", "--fixed-step"]);
        assert_eq!(args.seed, Some(42));
        assert!(args.fixed_step);
        assert_eq!(args.fps(), 60);
    }
}
