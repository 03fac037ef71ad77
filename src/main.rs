use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pacman_sim::render::{self, Renderer};
use pacman_sim::{Command, Config, Direction, Error, Level, Result, Simulation, Ticker, Tuning};

/// Longest step a single tick may take, so a stalled frame cannot carry an
/// actor across a wall.
const MAX_DT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Steer(Direction),
    Command(Command),
    Quit,
}

fn key_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Action::Steer(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Action::Steer(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Action::Steer(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Action::Steer(Direction::Right),
        KeyCode::Char('p') => Action::Command(Command::TogglePause),
        KeyCode::Char('r') => Action::Command(Command::Restart),
        KeyCode::Char('n') => Action::Command(Command::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "seed {seed}, tick {}ms, {} fps",
        config.tick_ms, config.render_fps
    );
    let mut sim = Simulation::new(
        Level::try_classic()?,
        Tuning::default(),
        ChaCha8Rng::seed_from_u64(seed),
    );

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    let result = in_alternate_screen(&mut stdout, |out| run(out, &mut sim, &config));
    terminal::disable_raw_mode()?;
    info!("exit with score {}", sim.status().score);
    result
}

/// Runs `body` on the alternate screen with the cursor hidden. The screen is
/// restored even when entering it or `body` fails; the first error wins.
fn in_alternate_screen<W: Write>(
    out: &mut W,
    body: impl FnOnce(&mut W) -> Result<()>,
) -> Result<()> {
    let result = enter_screen(out).map_err(Error::from).and_then(|()| body(out));
    let restored = leave_screen(out);
    result.and(restored.map_err(Error::from))
}

fn enter_screen<W: Write>(out: &mut W) -> io::Result<()> {
    out.execute(EnterAlternateScreen)?;
    out.execute(Hide)?;
    Ok(())
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    out.execute(Show)?;
    out.execute(LeaveAlternateScreen)?;
    Ok(())
}

fn run<W: Write>(out: &mut W, sim: &mut Simulation, config: &Config) -> Result<()> {
    let input = sim.input();
    let mut renderer = Renderer::new(sim.grid().width(), sim.grid().height());
    let mut ticker = Ticker::default();
    let tick_interval = config.tick_interval();
    let frame_time = config.frame_time();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                    match key_action(key.code) {
                        Some(Action::Quit) => return Ok(()),
                        Some(Action::Steer(dir)) => input.post(dir),
                        Some(Action::Command(command)) => sim.apply(command),
                        None => {}
                    }
                }
                Event::Resize(..) => renderer.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        if ticker.is_due(now, tick_interval) {
            let dt = ticker.dt(now).min(MAX_DT);
            let outcome = sim.tick(dt);
            for event in &outcome.events {
                debug!("{event:?}");
            }
        }
        render::render(out, sim.state(), &mut renderer, terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_steering_scheme() {
        let schemes = [
            [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right],
            [KeyCode::Char('w'), KeyCode::Char('s'), KeyCode::Char('a'), KeyCode::Char('d')],
            [KeyCode::Char('k'), KeyCode::Char('j'), KeyCode::Char('h'), KeyCode::Char('l')],
        ];
        for keys in schemes {
            for (key, dir) in keys.into_iter().zip(Direction::CARDINALS) {
                assert_eq!(key_action(key), Some(Action::Steer(dir)));
            }
        }
    }

    /// Writer whose first `failures` writes error out.
    struct FlakyTerminal {
        failures: usize,
        written: Vec<u8>,
    }

    impl Write for FlakyTerminal {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::Error::new(io::ErrorKind::Other, "terminal gone"));
            }
            self.written.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const LEAVE: &str = "\x1b[?1049l";
    const SHOW: &str = "\x1b[?25h";

    #[test]
    fn test_screen_restored_when_entering_fails() {
        let mut term = FlakyTerminal {
            failures: 1,
            written: Vec::new(),
        };
        let mut ran = false;
        let result = in_alternate_screen(&mut term, |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!ran);
        let written = String::from_utf8(term.written).unwrap();
        assert!(written.contains(SHOW));
        assert!(written.ends_with(LEAVE));
    }

    #[test]
    fn test_screen_restored_when_body_fails() {
        let mut term = FlakyTerminal {
            failures: 0,
            written: Vec::new(),
        };
        let result = in_alternate_screen(&mut term, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "render failed").into())
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("render failed"));
        let written = String::from_utf8(term.written).unwrap();
        assert!(written.starts_with("\x1b[?1049h"));
        assert!(written.ends_with(LEAVE));
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(
            key_action(KeyCode::Char('p')),
            Some(Action::Command(Command::TogglePause))
        );
        assert_eq!(
            key_action(KeyCode::Char('r')),
            Some(Action::Command(Command::Restart))
        );
        assert_eq!(
            key_action(KeyCode::Char('n')),
            Some(Action::Command(Command::NewGame))
        );
        assert_eq!(key_action(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(key_action(KeyCode::Char('x')), None);
        assert_eq!(key_action(KeyCode::Enter), None);
    }
}
