use thiserror::Error;

use crate::config::ConfigError;
use crate::level::LevelError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("level: {0}")]
    Level(#[from] LevelError),
}

pub type Result<T> = std::result::Result<T, Error>;
