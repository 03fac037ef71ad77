//! Pac-Man style maze simulation.
//!
//! Core modules:
//! - `level`: maze topology, pellets and spawn points
//! - `movement`: continuous movement and turning over the tile grid
//! - `player`, `ghost`: the actors and how they steer
//! - `collision`: what happens when a ghost reaches the player
//! - `game`: the tick loop and the state it owns
//! - `input`: hand-off of directional intent from the host
//! - `render`: diffing terminal renderer used by the `pacman` binary

pub mod collision;
pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod input;
pub mod level;
pub mod movement;
pub mod player;
pub mod render;

pub use components::{Direction, Position};
pub use config::Config;
pub use error::{Error, Result};
pub use game::{Command, GameEvent, GameStatus, Simulation, SimulationState, TickOutcome, Ticker, Tuning};
pub use input::InputSlot;
pub use level::{GridMap, Level, Tile};
