//! Continuous movement over the tile grid, shared by the player and the ghosts.

use crate::components::{round_half_up, Actor, Direction, Position};
use crate::level::{GridMap, Walker};

/// How close to a tile center an actor must be before it may turn.
pub const TURN_TOLERANCE: f64 = 0.15;
const LOOK_AHEAD: f64 = 0.5;

pub fn near_center(pos: Position) -> bool {
    (pos.x - pos.x.round()).abs() < TURN_TOLERANCE && (pos.y - pos.y.round()).abs() < TURN_TOLERANCE
}

/// Probes half a tile ahead of `pos` in `dir`. A probe landing exactly on a
/// tile boundary counts as the tile being entered.
pub fn can_move(grid: &GridMap, pos: Position, dir: Direction, walker: Walker) -> bool {
    let (dx, dy) = dir.delta();
    grid.cell_passable(probe(pos.x, dx), probe(pos.y, dy), walker)
}

fn probe(v: f64, sign: f64) -> i64 {
    let ahead = v + sign * LOOK_AHEAD;
    if sign < 0.0 {
        (ahead - 0.5).ceil() as i64
    } else {
        round_half_up(ahead)
    }
}

/// Applies `requested` when the actor is centered on a tile and the way out of
/// that tile is open. Returns whether the heading changed hands.
pub fn try_turn(actor: &mut Actor, grid: &GridMap, requested: Direction, walker: Walker) -> bool {
    if requested == Direction::None || !near_center(actor.pos) {
        return false;
    }
    let (x, y) = actor.pos.tile();
    let center = Position::new(x as f64, y as f64);
    if !can_move(grid, center, requested, walker) {
        return false;
    }
    actor.dir = requested;
    true
}

/// Moves `speed * dt` along the current heading. A blocked destination
/// cancels the whole step; there is no sliding up to the wall.
pub fn advance(actor: &mut Actor, grid: &GridMap, walker: Walker, dt: f64) -> bool {
    let dest = actor.pos.offset(actor.dir, actor.speed * dt);
    if !grid.is_passable(dest, walker) {
        return false;
    }
    actor.pos = wrap_clamp(dest, grid);
    true
}

/// Columns wrap around the tunnel, rows clamp to the map.
pub fn wrap_clamp(pos: Position, grid: &GridMap) -> Position {
    let width = grid.width() as f64;
    let mut x = pos.x.rem_euclid(width);
    if x >= width {
        // rem_euclid can round up to `width` for tiny negatives
        x = 0.0;
    }
    let y = pos.y.clamp(0.0, (grid.height() - 1) as f64);
    Position::new(x, y)
}
