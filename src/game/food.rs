//! Food tiers, periodic spawning and death-drops

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::config::FoodTier;
use super::state::{Food, GameState, Position, Snake};

/// Decides what food appears and where
#[derive(Debug, Clone)]
pub struct FoodManager {
    tiers: Vec<FoodTier>,
    death_drop_score: u32,
}

impl FoodManager {
    pub fn new(tiers: Vec<FoodTier>, death_drop_score: u32) -> Self {
        Self {
            tiers,
            death_drop_score,
        }
    }

    /// Tiers unlocked at `elapsed_ms`
    pub fn eligible_tiers(&self, elapsed_ms: u64) -> impl Iterator<Item = &FoodTier> {
        self.tiers
            .iter()
            .filter(move |tier| tier.unlock_ms <= elapsed_ms)
    }

    /// Place one food of a random eligible tier on a random free cell
    ///
    /// Returns the placed food, or None if the board has no free cell.
    pub fn spawn<R: Rng + ?Sized>(&self, state: &mut GameState, rng: &mut R) -> Option<Food> {
        let eligible: Vec<&FoodTier> = self.eligible_tiers(state.elapsed_ms).collect();
        let tier = eligible.choose(rng)?;

        let Some(position) = random_free_cell(state, rng) else {
            warn!("no free cell for food; skipping spawn");
            return None;
        };

        let food = Food::new(position, tier.score);
        debug!(x = position.x, y = position.y, score = food.score, "food spawned");
        state.foods.push(food);
        Some(food)
    }

    /// Turn every cell of a dying snake into food, one per unit of length
    ///
    /// A head that left the grid still drops its food; it is never drawn
    /// and never eaten.
    pub fn drop_remains(&self, foods: &mut Vec<Food>, snake: &Snake) -> usize {
        let before = foods.len();
        foods.extend(snake.remains().map(|pos| Food::new(pos, self.death_drop_score)));
        foods.len() - before
    }
}

/// Uniformly random cell not covered by a living snake
///
/// Returns None only when every cell is covered.
pub fn random_free_cell<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<Position> {
    let size = state.grid.size() as i32;
    let free: Vec<Position> = (0..size)
        .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
        .filter(|&pos| !state.is_occupied_by_snake(pos))
        .collect();
    free.choose(rng).copied()
}
