use log::info;

use crate::game::{GameEvent, SimulationState, Tuning};
use crate::level::Level;

/// What the ghost loop should do after a contact check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    /// The player was caught and every actor went back to its start.
    Reset,
}

pub fn touching(state: &SimulationState, idx: usize, radius: f64) -> bool {
    state.ghosts[idx].pos().distance(state.player.pos()) < radius
}

/// Resolves contact between the player and ghost `idx`, if any.
///
/// A frightened ghost is eaten: score, back to the house, chasing again.
/// Any other ghost costs a life and resets every actor, after which no other
/// ghost is checked this tick.
pub fn resolve(
    state: &mut SimulationState,
    idx: usize,
    level: &Level,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    if !touching(state, idx, tuning.collision_radius) {
        return Resolution::Continue;
    }

    let kind = state.ghosts[idx].kind;
    if state.ghosts[idx].is_frightened() {
        state.status.score += tuning.ghost_score;
        state.ghosts[idx].send_home(level.ghost_home);
        events.push(GameEvent::GhostEaten(kind));
        info!("{} eaten, score {}", kind.name(), state.status.score);
        return Resolution::Continue;
    }

    state.status.lives = state.status.lives.saturating_sub(1);
    events.push(GameEvent::PlayerCaught(kind));
    info!("caught by {}, {} lives left", kind.name(), state.status.lives);
    if state.status.lives == 0 {
        state.status.game_over = true;
        events.push(GameEvent::GameOver);
        info!("game over, final score {}", state.status.score);
    }
    state.reset_actors(level, tuning);
    Resolution::Reset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Position;
    use crate::ghost::GhostKind;

    fn setup() -> (Level, Tuning, SimulationState) {
        let level = Level::classic();
        let tuning = Tuning::default();
        let state = SimulationState::new(&level, &tuning);
        (level, tuning, state)
    }

    #[test]
    fn test_far_ghost_is_ignored() {
        let (level, tuning, mut state) = setup();
        let mut events = Vec::new();
        state.ghosts[0].actor.pos = Position::new(14.7, 23.0);
        let before = state.clone();
        assert_eq!(resolve(&mut state, 0, &level, &tuning, &mut events), Resolution::Continue);
        assert_eq!(state, before);
        assert!(events.is_empty());
    }

    #[test]
    fn test_frightened_ghost_is_eaten() {
        let (level, tuning, mut state) = setup();
        let mut events = Vec::new();
        state.ghosts[2].frighten(6000.0);
        state.ghosts[2].actor.pos = Position::new(14.3, 23.2);
        assert_eq!(resolve(&mut state, 2, &level, &tuning, &mut events), Resolution::Continue);
        assert_eq!(state.status.score, 200);
        assert_eq!(state.status.lives, 3);
        assert_eq!(state.ghosts[2].pos(), level.ghost_home.0);
        assert_eq!(state.ghosts[2].actor.dir, level.ghost_home.1);
        assert!(!state.ghosts[2].is_frightened());
        assert_eq!(events, vec![GameEvent::GhostEaten(GhostKind::Inky)]);
    }

    #[test]
    fn test_chasing_ghost_costs_a_life_and_resets_everyone() {
        let (level, tuning, mut state) = setup();
        let mut events = Vec::new();
        state.player.actor.pos = Position::new(6.0, 5.0);
        for ghost in &mut state.ghosts {
            ghost.actor.pos = Position::new(1.0, 29.0);
        }
        state.ghosts[1].actor.pos = Position::new(6.2, 5.3);
        assert_eq!(resolve(&mut state, 1, &level, &tuning, &mut events), Resolution::Reset);
        assert_eq!(state.status.lives, 2);
        assert!(!state.status.game_over);
        assert_eq!(state.player.pos(), level.player_start.0);
        for (ghost, start) in state.ghosts.iter().zip(level.ghost_starts) {
            assert_eq!((ghost.pos(), ghost.actor.dir), start);
        }
        assert_eq!(events, vec![GameEvent::PlayerCaught(GhostKind::Pinky)]);
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let (level, tuning, mut state) = setup();
        let mut events = Vec::new();
        state.status.lives = 1;
        state.ghosts[0].actor.pos = state.player.pos();
        assert_eq!(resolve(&mut state, 0, &level, &tuning, &mut events), Resolution::Reset);
        assert_eq!(state.status.lives, 0);
        assert!(state.status.game_over);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
    }
}
