use crate::components::{Actor, Direction, Position};
use crate::level::{GridMap, Level, Tile, Walker};
use crate::movement;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub actor: Actor,
    /// Latched turn request; the latest one wins and it stays until replaced.
    pub requested: Direction,
}

impl Player {
    pub fn spawn(level: &Level, speed: f64) -> Self {
        let (pos, dir) = level.player_start;
        Self {
            actor: Actor::new(pos, dir, speed),
            requested: Direction::None,
        }
    }

    pub fn pos(&self) -> Position {
        self.actor.pos
    }

    pub fn dir(&self) -> Direction {
        self.actor.dir
    }

    pub fn request(&mut self, dir: Direction) {
        self.requested = dir;
    }

    /// Back to the start tile; the pending request survives.
    pub fn respawn(&mut self, level: &Level) {
        let (pos, dir) = level.player_start;
        self.actor.pos = pos;
        self.actor.dir = dir;
    }

    pub fn steer(&mut self, grid: &GridMap) -> bool {
        movement::try_turn(&mut self.actor, grid, self.requested, Walker::Player)
    }

    pub fn advance(&mut self, grid: &GridMap, dt: f64) -> bool {
        movement::advance(&mut self.actor, grid, Walker::Player, dt)
    }

    /// Eats the collectible on the player's tile, if any.
    pub fn eat(&self, grid: &mut GridMap) -> Tile {
        grid.consume(self.actor.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_at_level_start() {
        let level = Level::classic();
        let player = Player::spawn(&level, 6.0);
        assert_eq!(player.pos(), Position::new(14.0, 23.0));
        assert_eq!(player.dir(), Direction::Left);
        assert_eq!(player.requested, Direction::None);
    }

    #[test]
    fn test_latched_request_turns_at_next_corner() {
        let level = Level::classic();
        let grid = level.fresh_grid();
        let mut player = Player::spawn(&level, 6.0);
        player.actor.pos = Position::new(8.6, 5.0);
        player.actor.dir = Direction::Left;
        player.request(Direction::Down);

        // Column 8 has a wall below, column 6 is open.
        let mut turned_at = None;
        for _ in 0..100 {
            if player.steer(&grid) {
                turned_at = Some(player.pos());
                break;
            }
            player.advance(&grid, 0.01);
        }
        let at = turned_at.expect("player should turn down at column 6");
        assert_eq!(at.tile(), (6, 5));
        assert_eq!(player.dir(), Direction::Down);
    }

    #[test]
    fn test_gate_keeps_player_out_of_house() {
        let level = Level::classic();
        let grid = level.fresh_grid();
        let mut player = Player::spawn(&level, 6.0);
        player.actor.pos = Position::new(13.0, 11.0);
        player.actor.dir = Direction::Left;
        player.request(Direction::Down);
        assert!(!player.steer(&grid));
        assert_eq!(player.dir(), Direction::Left);
    }

    #[test]
    fn test_respawn_keeps_request() {
        let level = Level::classic();
        let mut player = Player::spawn(&level, 6.0);
        player.actor.pos = Position::new(1.0, 1.0);
        player.actor.dir = Direction::Up;
        player.request(Direction::Right);
        player.respawn(&level);
        assert_eq!(player.pos(), Position::new(14.0, 23.0));
        assert_eq!(player.dir(), Direction::Left);
        assert_eq!(player.requested, Direction::Right);
    }
}
