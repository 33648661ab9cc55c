use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use labyrinth::{Game, MazeError, MoveOutcome, Settings};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

mod input;
mod render;

use input::HeldKeys;
use render::Renderer;

const BUMP_FLASH_MS: u64 = 200;

fn main() -> io::Result<()> {
    env_logger::init();
    let settings = Settings::from_env();
    let rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let game = Game::with_settings(&settings, rng).map_err(invalid_input)?;
    info!("starting {}x{} labyrinth", settings.rows, settings.cols);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, game, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn invalid_input(err: MazeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

/// Status-line feedback standing in for the step, bump and win sounds.
#[derive(Default)]
struct Feedback {
    steps: u32,
    bump_until: Option<Instant>,
}

impl Feedback {
    fn on_outcome(&mut self, stdout: &mut Stdout, outcome: MoveOutcome, now: Instant) -> io::Result<()> {
        match outcome {
            MoveOutcome::Moved => self.steps += 1,
            MoveOutcome::BlockedByWall => {
                self.bump_until = Some(now + Duration::from_millis(BUMP_FLASH_MS));
            }
            MoveOutcome::Won => {
                self.steps += 1;
                stdout.queue(Print('\x07'))?;
            }
            MoveOutcome::BlockedByThrottle | MoveOutcome::AlreadyWon => {}
        }
        Ok(())
    }

    fn status(&self, won: bool, now: Instant) -> String {
        if won {
            return format!("Steps: {}  Solved! A new maze is on its way.", self.steps);
        }
        if self.bump_until.is_some_and(|t| now < t) {
            return format!("Steps: {}  Bump!", self.steps);
        }
        format!("Steps: {}", self.steps)
    }
}

fn run(stdout: &mut Stdout, mut game: Game<ChaCha8Rng>, settings: &Settings) -> io::Result<()> {
    let frame_time = settings.frame_time();
    let mut keys = HeldKeys::for_move_delay(settings.move_delay);
    let mut feedback = Feedback::default();
    let mut renderer = Renderer::new();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('r') => {
                        game.regenerate().map_err(invalid_input)?;
                        feedback = Feedback::default();
                        keys.clear();
                        renderer.invalidate();
                    }
                    code => {
                        if let Some(dir) = input::dir_for_key(code) {
                            keys.press(dir, Instant::now());
                        }
                    }
                }
            }
        }

        let now = Instant::now();
        if game.tick(now).map_err(invalid_input)? {
            feedback = Feedback::default();
            keys.clear();
            renderer.invalidate();
        }
        if let Some(dir) = keys.next_intent(now) {
            let outcome = game.attempt_step(dir, now);
            feedback.on_outcome(stdout, outcome, now)?;
        }

        let status = feedback.status(game.player().won, now);
        renderer.render(stdout, &game, &status)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
