use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use labyrinth::Dir;

/// Terminals only report presses and auto-repeats, so a key counts as held
/// for up to this long after its last event.
pub const INPUT_HOLD: Duration = Duration::from_millis(160);

pub fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(Dir::Right),
        _ => None,
    }
}

/// Picks the single direction forwarded per frame. A key event is forwarded
/// once on the next frame; after that a key keeps moving only while fresh
/// events (auto-repeat) arrive inside the hold window. The window stays
/// shorter than the move delay, so one tap moves one cell.
pub struct HeldKeys {
    hold: Duration,
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Dir>,
    fresh: Option<Dir>,
}

impl HeldKeys {
    pub fn for_move_delay(move_delay: Duration) -> Self {
        Self {
            hold: INPUT_HOLD.min(move_delay),
            last_seen: [None; 4],
            last_pressed: None,
            fresh: None,
        }
    }

    pub fn press(&mut self, dir: Dir, now: Instant) {
        self.last_seen[idx_for_dir(dir)] = Some(now);
        self.last_pressed = Some(dir);
        self.fresh = Some(dir);
    }

    pub fn clear(&mut self) {
        *self = Self::for_move_delay(self.hold);
    }

    pub fn next_intent(&mut self, now: Instant) -> Option<Dir> {
        if let Some(dir) = self.fresh.take() {
            return Some(dir);
        }
        self.held(now)
    }

    fn held(&self, now: Instant) -> Option<Dir> {
        let held = |t: Instant| now.saturating_duration_since(t) < self.hold;
        if let Some(dir) = self.last_pressed {
            if self.last_seen[idx_for_dir(dir)].is_some_and(held) {
                return Some(dir);
            }
        }
        let mut best: Option<(Dir, Instant)> = None;
        for dir in Dir::ALL {
            if let Some(t) = self.last_seen[idx_for_dir(dir)].filter(|t| held(*t)) {
                match best {
                    Some((_, bt)) if t <= bt => {}
                    _ => best = Some((dir, t)),
                }
            }
        }
        best.map(|(dir, _)| dir)
    }
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}
