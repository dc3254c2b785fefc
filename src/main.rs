mod audio;
mod clock;
mod config;
mod render;
mod session;
mod sim;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute, terminal,
};
use directories::ProjectDirs;
use std::fs;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::Audio;
use crate::clock::Clock;
use crate::config::{Args, Tuning};
use crate::render::PixelBuf;
use crate::session::Session;
use crate::store::{FileStore, MemoryStore, ScoreStore};

// ── Terminal ────────────────────────────────────────────────────────────────

/// Raw mode and the alternate screen for as long as it lives. Restores the
/// terminal on drop, including while unwinding from a panic.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let guard = TerminalGuard;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )
        .context("entering the alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Press,
    Quit,
    Resize(u16, u16),
}

fn command_for(event: Event) -> Option<Command> {
    match event {
        Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) if kind == KeyEventKind::Press => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('k') | KeyCode::Up
            | KeyCode::Enter => Some(Command::Press),
            _ => None,
        },
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(Command::Press),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Command::Resize(cols, rows)),
        _ => None,
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn data_dir(args: &Args) -> PathBuf {
    args.data_dir.clone().unwrap_or_else(|| {
        ProjectDirs::from("", "", "flappy-arcade")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Logs go to a file: stderr is hidden behind the alternate screen.
fn init_logging(args: &Args, data_dir: &Path) {
    let path = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("flappy-arcade.log"));
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match fs::File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            // Nowhere to write; keep the screen clean.
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

/// Route panics into the log file before the default hook prints them.
fn log_panics() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("Panic: {info}");
        default_hook(info);
    }));
}

fn run(session: &mut Session, clock: &mut Clock) -> Result<()> {
    let mut out = stdout();
    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let mut buf = PixelBuf::for_terminal(cols, rows);

    loop {
        // Input
        while event::poll(Duration::ZERO)? {
            match command_for(event::read()?) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Press) => session.press(),
                Some(Command::Resize(cols, rows)) => {
                    buf.resize(cols as usize, rows as usize * 2);
                    execute!(out, terminal::Clear(terminal::ClearType::All))?;
                }
                None => {}
            }
        }

        // Update
        let dt = clock.tick();
        session.tick(dt);

        // Render
        render::draw(session.sim(), &mut buf);
        buf.render(&mut out).context("drawing frame")?;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = data_dir(&args);
    init_logging(&args, &data_dir);
    log_panics();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "flappy-arcade {} starting: fps {}, fixed step {}, data in {}",
        env!("CARGO_PKG_VERSION"),
        args.fps(),
        args.fixed_step,
        data_dir.display()
    );

    let audio = if args.mute {
        Audio::muted()
    } else {
        Audio::open(args.volume())
    };
    log::info!("Sound {}", if audio.is_enabled() { "on" } else { "off" });

    let store: Box<dyn ScoreStore> = if args.no_save {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(&data_dir))
    };
    let mut session = Session::new(Tuning::default(), store, audio, seed);
    let mut clock = Clock::new(args.fps(), args.fixed_step);
    log::debug!("Frame budget {:?}", clock.frame_duration());

    let result = {
        let _guard = TerminalGuard::enter()?;
        run(&mut session, &mut clock)
    };

    match result {
        Ok(()) => {
            log::info!("Bye. Best score {}", session.sim().best_score());
            Ok(())
        }
        Err(e) => {
            log::error!("Exiting after error: {e:#}");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_flap_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Enter, KeyCode::Char('w')] {
            assert_eq!(command_for(key(code, KeyModifiers::NONE)), Some(Command::Press));
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(command_for(key(KeyCode::Esc, KeyModifiers::NONE)), Some(Command::Quit));
        assert_eq!(command_for(key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(Command::Quit));
        assert_eq!(
            command_for(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let event = Event::Key(KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(command_for(event), None);
    }

    #[test]
    fn test_mouse_press_flaps() {
        let down = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(command_for(down), Some(Command::Press));
        let moved = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(command_for(moved), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(command_for(Event::Resize(80, 24)), Some(Command::Resize(80, 24)));
    }

    #[test]
    fn test_data_dir_override() {
        let args = Args::parse_from(["flappy-arcade", "--data-dir", "/tmp/flappy-test"]);
        assert_eq!(data_dir(&args), PathBuf::from("/tmp/flappy-test"));
    }

    #[test]
    fn test_panic_hook_still_unwinds() {
        log_panics();
        let result = std::panic::catch_unwind(|| panic!("boom"));
        assert!(result.is_err());
    }
}
