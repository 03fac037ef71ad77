//! Host-side settings read from the environment.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_TICK_MS: u64 = 16;
pub const DEFAULT_RENDER_FPS: u64 = 60;

const TICK_MS_VAR: &str = "PACMAN_TICK_MS";
const FPS_VAR: &str = "PACMAN_FPS";
const SEED_VAR: &str = "PACMAN_SEED";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a positive integer")]
    NotPositive { var: &'static str, value: String },
    #[error("{var}={value:?} is not a valid seed")]
    BadSeed { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub tick_ms: u64,
    pub render_fps: u64,
    /// Ghost RNG seed; a random one is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from any variable source. Unset variables fall back to
    /// the defaults; set but malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tick_ms = positive(&lookup, TICK_MS_VAR)?.unwrap_or(DEFAULT_TICK_MS);
        let render_fps = positive(&lookup, FPS_VAR)?.unwrap_or(DEFAULT_RENDER_FPS);
        let seed = match lookup(SEED_VAR) {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|_| ConfigError::BadSeed {
                var: SEED_VAR,
                value,
            })?),
            None => None,
        };
        Ok(Self {
            tick_ms,
            render_fps,
            seed,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(Some(v)),
        _ => Err(ConfigError::NotPositive { var, value }),
    }
}
