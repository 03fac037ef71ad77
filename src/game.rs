//! The simulation clock: owns every piece of game state and advances it one
//! tick at a time.
//!
//! Per running tick, in order: input mailbox, player turn and move, pellet
//! consumption and scoring, win check, then for each ghost mode expiry,
//! steering, movement and collision. Paused, lost and won games do not tick;
//! the simulation clock does not advance either, so frightened timers hold
//! while paused.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::collision::{self, Resolution};
use crate::ghost::{Ghost, GhostKind};
use crate::input::InputSlot;
use crate::level::{GridMap, Level, Tile};
use crate::player::Player;

pub const PLAYER_SPEED: f64 = 6.0;
pub const GHOST_SPEED: f64 = 5.5;
pub const FRIGHTENED_MS: f64 = 6000.0;
pub const STARTING_LIVES: u32 = 3;
pub const COLLISION_RADIUS: f64 = 0.6;

/// Gameplay knobs. The defaults are the arcade values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Tiles per second.
    pub player_speed: f64,
    /// Tiles per second.
    pub ghost_speed: f64,
    pub frightened_ms: f64,
    pub starting_lives: u32,
    /// Ghost/player distance (tiles) that counts as contact.
    pub collision_radius: f64,
    pub pellet_score: u32,
    pub power_pellet_score: u32,
    pub ghost_score: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            ghost_speed: GHOST_SPEED,
            frightened_ms: FRIGHTENED_MS,
            starting_lives: STARTING_LIVES,
            collision_radius: COLLISION_RADIUS,
            pellet_score: 10,
            power_pellet_score: 50,
            ghost_score: 200,
        }
    }
}

/// Read-only snapshot handed to presentation after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Plain pellets left on the grid; power pellets are not counted.
    pub pellets_remaining: usize,
    pub paused: bool,
    pub game_over: bool,
    pub win: bool,
}

impl GameStatus {
    fn fresh(tuning: &Tuning, pellets_remaining: usize) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            pellets_remaining,
            paused: false,
            game_over: false,
            win: false,
        }
    }

    /// Nothing moves while any of these is set.
    pub fn is_frozen(&self) -> bool {
        self.paused || self.game_over || self.win
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PelletEaten,
    PowerPelletEaten,
    GhostsFrightened { until_ms: f64 },
    GhostRecovered(GhostKind),
    GhostEaten(GhostKind),
    PlayerCaught(GhostKind),
    GameOver,
    Won,
}

/// Discrete commands from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    /// Fresh pellets and start positions; score, lives and level carry over.
    Restart,
    /// Like `Restart`, but score, lives and level go back to defaults too.
    NewGame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub status: GameStatus,
    pub events: Vec<GameEvent>,
}

/// Everything that changes while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub grid: GridMap,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    pub status: GameStatus,
    /// Simulation time in milliseconds; only running ticks advance it.
    pub now_ms: f64,
}

impl SimulationState {
    pub fn new(level: &Level, tuning: &Tuning) -> Self {
        let grid = level.fresh_grid();
        let status = GameStatus::fresh(tuning, grid.pellet_count());
        Self {
            grid,
            player: Player::spawn(level, tuning.player_speed),
            ghosts: Ghost::roster(level, tuning.ghost_speed),
            status,
            now_ms: 0.0,
        }
    }

    /// Player and every ghost back to their starts, ghosts chasing again.
    pub fn reset_actors(&mut self, level: &Level, tuning: &Tuning) {
        self.player.respawn(level);
        self.ghosts = Ghost::roster(level, tuning.ghost_speed);
    }

    fn regenerate(&mut self, level: &Level) {
        self.grid = level.fresh_grid();
        self.status.pellets_remaining = self.grid.pellet_count();
    }

    fn collect(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        match self.player.eat(&mut self.grid) {
            Tile::Pellet => {
                self.status.score += tuning.pellet_score;
                self.status.pellets_remaining = self.status.pellets_remaining.saturating_sub(1);
                events.push(GameEvent::PelletEaten);
            }
            Tile::PowerPellet => {
                self.status.score += tuning.power_pellet_score;
                let until_ms = self.now_ms + tuning.frightened_ms;
                for ghost in &mut self.ghosts {
                    ghost.frighten(until_ms);
                }
                events.push(GameEvent::PowerPelletEaten);
                events.push(GameEvent::GhostsFrightened { until_ms });
                debug!("power pellet at {:?}, ghosts frightened until {until_ms}ms", self.player.pos().tile());
            }
            Tile::Empty | Tile::Wall | Tile::Gate => {}
        }
    }
}

/// Drives a [`SimulationState`] through ticks and host commands.
pub struct Simulation<R = ChaCha8Rng> {
    level: Level,
    tuning: Tuning,
    state: SimulationState,
    rng: R,
    input: Arc<InputSlot>,
}

impl Simulation<ChaCha8Rng> {
    /// Classic maze, default tuning, reproducible ghost randomness.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Level::classic(), Tuning::default(), ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn new(level: Level, tuning: Tuning, rng: R) -> Self {
        let state = SimulationState::new(&level, &tuning);
        info!("new game, {} pellets", state.status.pellets_remaining);
        Self {
            level,
            tuning,
            state,
            rng,
            input: Arc::new(InputSlot::new()),
        }
    }

    /// Handle for whoever captures directional input.
    pub fn input(&self) -> Arc<InputSlot> {
        Arc::clone(&self.input)
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn grid(&self) -> &GridMap {
        &self.state.grid
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.state.ghosts
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Advances everything by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> TickOutcome {
        let mut events = Vec::new();
        if self.state.status.is_frozen() {
            return TickOutcome {
                status: self.state.status,
                events,
            };
        }

        let Self {
            level,
            tuning,
            state,
            rng,
            input,
        } = self;
        state.now_ms += dt * 1000.0;

        if let Some(dir) = input.take() {
            state.player.request(dir);
        }
        state.player.steer(&state.grid);
        state.player.advance(&state.grid, dt);
        state.collect(tuning, &mut events);

        // Ghosts and collisions still get this tick; the next one is frozen.
        if state.status.pellets_remaining == 0 {
            state.status.win = true;
            events.push(GameEvent::Won);
            info!("maze cleared, score {}", state.status.score);
        }

        let target = state.player.pos();
        for idx in 0..state.ghosts.len() {
            let ghost = &mut state.ghosts[idx];
            if ghost.expire(state.now_ms) {
                debug!("{} stops being frightened", ghost.kind.name());
                events.push(GameEvent::GhostRecovered(ghost.kind));
            }
            ghost.steer(&state.grid, target, &mut *rng);
            ghost.advance(&state.grid, dt);
            if collision::resolve(state, idx, level, tuning, &mut events) == Resolution::Reset {
                break;
            }
        }

        TickOutcome {
            status: state.status,
            events,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Restart => self.restart(),
            Command::NewGame => self.new_game(),
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state.status.paused = !self.state.status.paused;
        info!("{}", if self.state.status.paused { "paused" } else { "resumed" });
        self.state.status.paused
    }

    /// Lays fresh pellets and puts every actor back at its start. Clears the
    /// game-over and win flags; score, lives, level and pause carry over.
    pub fn restart(&mut self) {
        self.state.regenerate(&self.level);
        self.state.status.game_over = false;
        self.state.status.win = false;
        self.state.reset_actors(&self.level, &self.tuning);
        info!(
            "restart: score {}, lives {}, {} pellets",
            self.state.status.score, self.state.status.lives, self.state.status.pellets_remaining
        );
    }

    pub fn new_game(&mut self) {
        self.state = SimulationState::new(&self.level, &self.tuning);
        info!("new game, {} pellets", self.state.status.pellets_remaining);
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }
}

/// Turns host timestamps into tick lengths. The first tick is zero long.
#[derive(Debug, Default)]
pub struct Ticker {
    last: Option<Instant>,
}

impl Ticker {
    pub fn is_due(&self, now: Instant, interval: Duration) -> bool {
        self.last
            .map_or(true, |last| now.saturating_duration_since(last) >= interval)
    }

    /// Seconds since the previous call.
    pub fn dt(&mut self, now: Instant) -> f64 {
        let dt = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last = Some(now);
        dt
    }
}
