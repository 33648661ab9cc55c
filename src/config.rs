use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::generator::DEFAULT_WIDEN_PROBABILITY;
use crate::navigation::DEFAULT_MOVE_DELAY;

pub const DEFAULT_ROWS: usize = 31;
pub const DEFAULT_COLS: usize = 31;
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_RENDER_FPS: u64 = 60;

/// Runtime knobs, read once from `LABYRINTH_*` environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub rows: usize,
    pub cols: usize,
    pub move_delay: Duration,
    pub restart_delay: Duration,
    pub widen_probability: f64,
    pub render_fps: u64,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            move_delay: DEFAULT_MOVE_DELAY,
            restart_delay: DEFAULT_RESTART_DELAY,
            widen_probability: DEFAULT_WIDEN_PROBABILITY,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Unparsable values and a zero
    /// frame rate keep their default and are reported; zero delays are valid.
    /// Maze size and widening are checked later by the generator.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| -> Option<String> { lookup(key).filter(|v| !v.trim().is_empty()) };

        Self {
            rows: parse_or(&read, "LABYRINTH_ROWS", defaults.rows),
            cols: parse_or(&read, "LABYRINTH_COLS", defaults.cols),
            move_delay: Duration::from_millis(parse_or(
                &read,
                "LABYRINTH_MOVE_DELAY_MS",
                defaults.move_delay.as_millis() as u64,
            )),
            restart_delay: Duration::from_millis(parse_or(
                &read,
                "LABYRINTH_RESTART_MS",
                defaults.restart_delay.as_millis() as u64,
            )),
            widen_probability: parse_or(&read, "LABYRINTH_WIDEN", defaults.widen_probability),
            render_fps: match parse_or(&read, "LABYRINTH_FPS", defaults.render_fps) {
                0 => {
                    warn!("ignoring LABYRINTH_FPS=0: frame rate must be positive");
                    defaults.render_fps
                }
                fps => fps,
            },
            seed: read("LABYRINTH_SEED").and_then(|raw| parse_value("LABYRINTH_SEED", &raw)),
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

fn parse_or<T: FromStr>(read: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    read(key)
        .and_then(|raw| parse_value(key, &raw))
        .unwrap_or(default)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse::<T>().ok();
    if parsed.is_none() {
        warn!("ignoring {key}={raw:?}: not a valid value");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("LABYRINTH_ROWS", "21"),
            ("LABYRINTH_COLS", " 41 "),
            ("LABYRINTH_MOVE_DELAY_MS", "150"),
            ("LABYRINTH_RESTART_MS", "0"),
            ("LABYRINTH_WIDEN", "0.25"),
            ("LABYRINTH_FPS", "30"),
            ("LABYRINTH_SEED", "42"),
        ]);
        assert_eq!(s.rows, 21);
        assert_eq!(s.cols, 41);
        assert_eq!(s.move_delay, Duration::from_millis(150));
        assert_eq!(s.restart_delay, Duration::ZERO);
        assert_eq!(s.widen_probability, 0.25);
        assert_eq!(s.render_fps, 30);
        assert_eq!(s.seed, Some(42));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[
            ("LABYRINTH_ROWS", "lots"),
            ("LABYRINTH_FPS", "0"),
            ("LABYRINTH_MOVE_DELAY_MS", "-5"),
            ("LABYRINTH_SEED", ""),
        ]);
        assert_eq!(s.rows, DEFAULT_ROWS);
        assert_eq!(s.render_fps, DEFAULT_RENDER_FPS);
        assert_eq!(s.move_delay, DEFAULT_MOVE_DELAY);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn zero_delays_are_kept() {
        let s = settings(&[("LABYRINTH_MOVE_DELAY_MS", "0"), ("LABYRINTH_RESTART_MS", "0")]);
        assert_eq!(s.move_delay, Duration::ZERO);
        assert_eq!(s.restart_delay, Duration::ZERO);
    }

    #[test]
    fn unusable_maze_values_pass_through_to_the_generator() {
        let s = settings(&[("LABYRINTH_ROWS", "8"), ("LABYRINTH_WIDEN", "1.5")]);
        assert_eq!(s.rows, 8);
        assert_eq!(s.widen_probability, 1.5);
    }

    #[test]
    fn frame_time_matches_fps() {
        let s = Settings {
            render_fps: 50,
            ..Settings::default()
        };
        assert_eq!(s.frame_time(), Duration::from_millis(20));
    }
}
