use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Actor, Direction, Position, Rgb};
use crate::level::{GridMap, Level, Walker};
use crate::movement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GhostKind::Blinky => "blinky",
            GhostKind::Pinky => "pinky",
            GhostKind::Inky => "inky",
            GhostKind::Clyde => "clyde",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            GhostKind::Blinky => Rgb(0xff, 0x4d, 0x4f), // red
            GhostKind::Pinky => Rgb(0xff, 0x87, 0xc5),  // pink
            GhostKind::Inky => Rgb(0x00, 0xe5, 0xff),   // cyan
            GhostKind::Clyde => Rgb(0xff, 0xb3, 0x47),  // orange
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Chase,
    Frightened,
    /// Reserved; nothing transitions into it yet.
    Eaten,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub actor: Actor,
    pub mode: GhostMode,
    /// Simulation time (ms) at which frightened mode runs out.
    pub frightened_until: f64,
}

impl Ghost {
    pub fn spawn(kind: GhostKind, start: (Position, Direction), speed: f64) -> Self {
        Self {
            kind,
            actor: Actor::new(start.0, start.1, speed),
            mode: GhostMode::Chase,
            frightened_until: 0.0,
        }
    }

    /// The four ghosts at their level starts, in evaluation order.
    pub fn roster(level: &Level, speed: f64) -> Vec<Ghost> {
        GhostKind::ALL
            .iter()
            .zip(level.ghost_starts)
            .map(|(&kind, start)| Ghost::spawn(kind, start, speed))
            .collect()
    }

    pub fn pos(&self) -> Position {
        self.actor.pos
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == GhostMode::Frightened
    }

    /// Overrides whatever the ghost was doing.
    pub fn frighten(&mut self, until_ms: f64) {
        self.mode = GhostMode::Frightened;
        self.frightened_until = until_ms;
    }

    /// Drops back to chase once the frightened deadline has passed.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        if self.mode == GhostMode::Frightened && now_ms > self.frightened_until {
            self.mode = GhostMode::Chase;
            return true;
        }
        false
    }

    /// Caught while frightened: straight back to the house, chasing again.
    pub fn send_home(&mut self, home: (Position, Direction)) {
        self.actor.pos = home.0;
        self.actor.dir = home.1;
        self.mode = GhostMode::Chase;
        self.frightened_until = 0.0;
    }

    /// Picks this tick's heading. See [`choose_direction`].
    pub fn steer(&mut self, grid: &GridMap, target: Position, rng: &mut impl Rng) {
        let dir = choose_direction(self, grid, target, rng);
        if dir != self.actor.dir {
            debug!("{} turns {:?} -> {:?}", self.kind.name(), self.actor.dir, dir);
        }
        self.actor.dir = dir;
    }

    pub fn advance(&mut self, grid: &GridMap, dt: f64) -> bool {
        movement::advance(&mut self.actor, grid, Walker::Ghost, dt)
    }
}

fn passable(grid: &GridMap, pos: Position, dir: Direction) -> bool {
    movement::can_move(grid, pos, dir, Walker::Ghost)
}

/// Three or more open ways out, reversal included.
pub fn is_intersection(grid: &GridMap, pos: Position) -> bool {
    Direction::CARDINALS
        .iter()
        .filter(|&&dir| passable(grid, pos, dir))
        .count()
        >= 3
}

/// Open ways out that are not a U-turn, in evaluation order.
pub fn valid_directions(grid: &GridMap, pos: Position, heading: Direction) -> Vec<Direction> {
    Direction::CARDINALS
        .iter()
        .copied()
        .filter(|&dir| dir != heading.opposite() && passable(grid, pos, dir))
        .collect()
}

/// Ghost steering:
///
/// 1. Stuck (no non-reversing exit, or the current heading is blocked): reverse.
/// 2. In a corridor: keep going.
/// 3. At an intersection: frightened ghosts pick a random exit, chasing ghosts
///    pick the exit whose next tile is closest to `target`, earliest in
///    [`Direction::CARDINALS`] on ties.
pub fn choose_direction<R: Rng + ?Sized>(
    ghost: &Ghost,
    grid: &GridMap,
    target: Position,
    rng: &mut R,
) -> Direction {
    let pos = ghost.actor.pos;
    let heading = ghost.actor.dir;
    let valid = valid_directions(grid, pos, heading);
    if valid.is_empty() || !passable(grid, pos, heading) {
        return heading.opposite();
    }
    if !is_intersection(grid, pos) {
        return heading;
    }
    if ghost.is_frightened() {
        return valid.choose(rng).copied().unwrap_or(heading);
    }

    let mut best = valid[0];
    let mut best_dist = f64::INFINITY;
    for &dir in &valid {
        let dist = pos.offset(dir, 1.0).distance(target);
        if dist < best_dist {
            best = dir;
            best_dist = dist;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn chaser(pos: Position, dir: Direction) -> Ghost {
        Ghost::spawn(GhostKind::Blinky, (pos, dir), 5.5)
    }

    #[test]
    fn test_roster_matches_level_starts() {
        let level = Level::classic();
        let ghosts = Ghost::roster(&level, 5.5);
        assert_eq!(ghosts.len(), 4);
        for (ghost, (kind, start)) in ghosts.iter().zip(GhostKind::ALL.iter().zip(level.ghost_starts)) {
            assert_eq!(ghost.kind, *kind);
            assert_eq!((ghost.actor.pos, ghost.actor.dir), start);
            assert_eq!(ghost.mode, GhostMode::Chase);
        }
    }

    #[test]
    fn test_expire_only_after_deadline() {
        let mut ghost = chaser(Position::new(6.0, 5.0), Direction::Left);
        ghost.frighten(6000.0);
        assert!(!ghost.expire(6000.0));
        assert!(ghost.is_frightened());
        assert!(ghost.expire(6000.5));
        assert_eq!(ghost.mode, GhostMode::Chase);
        assert!(!ghost.expire(9000.0));
    }

    #[test]
    fn test_corridor_keeps_heading() {
        let grid = Level::classic().fresh_grid();
        // Row 1 between the top-left block and the centre wall.
        let ghost = chaser(Position::new(3.0, 1.0), Direction::Right);
        assert!(!is_intersection(&grid, ghost.pos()));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let target = Position::new(3.0, 29.0);
        assert_eq!(choose_direction(&ghost, &grid, target, &mut rng), Direction::Right);
    }

    #[test]
    fn test_blocked_heading_reverses() {
        let grid = Level::classic().fresh_grid();
        // Heading straight into the centre wall on row 1.
        let ghost = chaser(Position::new(12.0, 1.0), Direction::Right);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let target = Position::new(20.0, 1.0);
        assert_eq!(choose_direction(&ghost, &grid, target, &mut rng), Direction::Left);
    }

    #[test]
    fn test_chase_picks_exit_closest_to_target() {
        let grid = Level::classic().fresh_grid();
        // (6, 5) opens in all four directions.
        let ghost = chaser(Position::new(6.0, 5.0), Direction::Right);
        assert!(is_intersection(&grid, ghost.pos()));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            choose_direction(&ghost, &grid, Position::new(6.0, 20.0), &mut rng),
            Direction::Down
        );
        assert_eq!(
            choose_direction(&ghost, &grid, Position::new(6.0, 1.0), &mut rng),
            Direction::Up
        );
        // Straight behind is off limits, so the closest remaining exit wins.
        assert_eq!(
            choose_direction(&ghost, &grid, Position::new(1.0, 5.0), &mut rng),
            Direction::Up
        );
    }

    #[test]
    fn test_chase_ties_prefer_evaluation_order() {
        let grid = Level::classic().fresh_grid();
        let ghost = chaser(Position::new(6.0, 5.0), Direction::Right);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // Up and Down land equally far from a target on the same row.
        assert_eq!(
            choose_direction(&ghost, &grid, Position::new(6.0, 5.0), &mut rng),
            Direction::Up
        );
    }

    #[test]
    fn test_frightened_choice_uses_injected_rng() {
        let grid = Level::classic().fresh_grid();
        let mut ghost = chaser(Position::new(6.0, 5.0), Direction::Right);
        ghost.frighten(6000.0);
        let mut zeros = StepRng::new(0, 0);
        let valid = valid_directions(&grid, ghost.pos(), ghost.actor.dir);
        assert_eq!(valid, vec![Direction::Up, Direction::Down, Direction::Right]);
        assert_eq!(
            choose_direction(&ghost, &grid, Position::new(6.0, 20.0), &mut zeros),
            Direction::Up
        );
    }

    #[test]
    fn test_frightened_never_reverses_at_intersection() {
        let grid = Level::classic().fresh_grid();
        let mut ghost = chaser(Position::new(6.0, 5.0), Direction::Right);
        ghost.frighten(6000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let dir = choose_direction(&ghost, &grid, Position::new(6.0, 20.0), &mut rng);
            assert_ne!(dir, Direction::Left);
        }
    }

    #[test]
    fn test_ghosts_pass_the_gate() {
        let grid = Level::classic().fresh_grid();
        let mut ghost = chaser(Position::new(14.0, 13.0), Direction::Up);
        for _ in 0..8 {
            assert!(ghost.advance(&grid, 0.05));
        }
        assert!(ghost.pos().y < 11.5);

        ghost.frighten(6000.0);
        ghost.actor.pos = Position::new(13.0, 11.0);
        ghost.actor.dir = Direction::Down;
        assert!(passable(&grid, ghost.pos(), Direction::Down));
    }

    #[test]
    fn test_send_home_resets_mode() {
        let level = Level::classic();
        let mut ghost = chaser(Position::new(3.0, 29.0), Direction::Right);
        ghost.frighten(500.0);
        ghost.send_home(level.ghost_home);
        assert_eq!(ghost.pos(), Position::new(14.0, 11.0));
        assert_eq!(ghost.actor.dir, Direction::Left);
        assert_eq!(ghost.mode, GhostMode::Chase);
    }
}
