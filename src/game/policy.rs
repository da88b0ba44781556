//! Wandering policy for AI snakes
//!
//! Cheap reactive wandering: an occasional random turn plus a one-step wall
//! check. There is no pathfinding and no awareness of other snakes or food.

use rand::Rng;
use rand::seq::SliceRandom;

use super::action::Direction;
use super::state::{Grid, Snake};

/// Per-tick decision for one AI snake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderPolicy {
    /// Probability of picking a fresh direction on any tick
    pub turn_chance: f64,
    /// Delay before a dead snake is revived
    pub revive_delay_ms: u64,
}

impl WanderPolicy {
    pub fn new(turn_chance: f64, revive_delay_ms: u64) -> Self {
        Self {
            turn_chance,
            revive_delay_ms,
        }
    }

    /// Steer and move `snake` for the tick at `now`
    ///
    /// A dead snake is revived once the delay has passed; the reviving tick
    /// does not move. Returns true if the snake was revived.
    pub fn tick<R: Rng + ?Sized>(
        &self,
        snake: &mut Snake,
        grid: Grid,
        now: u64,
        rng: &mut R,
    ) -> bool {
        if !snake.alive {
            let ready = snake
                .death_time
                .is_some_and(|died| now.saturating_sub(died) >= self.revive_delay_ms);
            if ready {
                snake.revive(now);
            }
            return ready;
        }

        self.steer(snake, grid, rng);
        snake.update(now);
        false
    }

    /// Update the pending direction without moving
    pub fn steer<R: Rng + ?Sized>(&self, snake: &mut Snake, grid: Grid, rng: &mut R) {
        if rng.gen_bool(self.turn_chance) {
            if let Some(&dir) = turn_candidates(snake, grid).choose(rng) {
                snake.pending_direction = dir;
            }
        }

        let ahead = snake.head().moved_in_direction(snake.pending_direction);
        if !grid.contains(ahead) {
            if let Some(&dir) = turn_candidates(snake, grid).choose(rng) {
                snake.pending_direction = dir;
            }
        }
    }
}

/// In-bounds directions from the current head, minus a reversal
fn turn_candidates(snake: &Snake, grid: Grid) -> Vec<Direction> {
    grid.safe_directions(snake.head())
        .into_iter()
        .filter(|dir| !snake.direction.is_opposite(*dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Controller, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ai_at(x: i32, y: i32) -> Snake {
        Snake::new(Position::new(x, y), Controller::Wander, 5, 200, 0)
    }

    #[test]
    fn test_steers_away_from_wall() {
        let grid = Grid::new(10);
        let policy = WanderPolicy::new(0.0, 3_000);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            let mut snake = ai_at(9, 4);
            policy.steer(&mut snake, grid, &mut rng);
            assert!(matches!(
                snake.pending_direction,
                Direction::Up | Direction::Down
            ));
        }
    }

    #[test]
    fn test_keeps_heading_when_clear_and_no_turn() {
        let grid = Grid::new(10);
        let policy = WanderPolicy::new(0.0, 3_000);
        let mut rng = StdRng::seed_from_u64(2);
        let mut snake = ai_at(4, 4);

        policy.steer(&mut snake, grid, &mut rng);
        assert_eq!(snake.pending_direction, Direction::Right);
    }

    #[test]
    fn test_random_turns_never_reverse() {
        let grid = Grid::new(10);
        let policy = WanderPolicy::new(1.0, 3_000);
        let mut rng = StdRng::seed_from_u64(3);
        let mut snake = ai_at(4, 4);

        for step in 1..=200 {
            let previous = snake.direction;
            policy.tick(&mut snake, grid, step * 200, &mut rng);
            assert!(!previous.is_opposite(snake.direction));
            assert!(grid.contains(snake.head()));
        }
    }

    #[test]
    fn test_no_candidates_leaves_direction() {
        // a 1x1 grid has no in-bounds move at all
        let grid = Grid::new(1);
        let policy = WanderPolicy::new(1.0, 3_000);
        let mut rng = StdRng::seed_from_u64(4);
        let mut snake = ai_at(0, 0);

        policy.steer(&mut snake, grid, &mut rng);
        assert_eq!(snake.pending_direction, Direction::Right);
    }

    #[test]
    fn test_revives_after_delay() {
        let grid = Grid::new(10);
        let policy = WanderPolicy::new(0.0, 3_000);
        let mut rng = StdRng::seed_from_u64(5);
        let mut snake = ai_at(2, 2);
        snake.update(200);
        snake.die(1_000);

        assert!(!policy.tick(&mut snake, grid, 3_999, &mut rng));
        assert!(!snake.alive);

        assert!(policy.tick(&mut snake, grid, 4_000, &mut rng));
        assert!(snake.alive);
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Position::new(2, 2));
    }
}
