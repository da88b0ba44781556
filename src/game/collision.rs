//! Per-tick collision resolution
//!
//! Runs after every snake has moved, in a fixed order:
//!
//! 1. **Boundary** -- a head outside the grid is fatal.
//! 2. **Food** -- a head on a food cell eats the first such food.
//! 3. **Snake vs snake** -- a head on another snake's non-head segment is
//!    fatal; on a head-head collision the longer snake survives and loses
//!    the length difference from its tail, equal lengths both die.
//! 4. **End of round** -- a fatal tick for the player ends the session
//!    before deaths are applied, so the final score is the pre-death one.
//! 5. **Deaths** -- every marked snake drops its body as food and dies.
//!
//! Phase 3 works against one snapshot of the board, so there are no chain
//! reactions inside a tick.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::food::FoodManager;
use super::state::{Food, GameOver, GameOverReason, GameState, Position};

/// What happened during one resolver pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Snakes that died this tick, by index
    pub deaths: Vec<usize>,
    /// Food eaten this tick, by eater index
    pub eaten: Vec<(usize, Food)>,
    /// Points added to the player's score
    pub score_delta: u32,
    /// Tail segments removed from head-head survivors
    pub truncated: Vec<(usize, usize)>,
    /// Food created from dead bodies
    pub dropped_food: usize,
    pub player_died: bool,
}

struct Snapshot {
    index: usize,
    head: Position,
    segments: Vec<Position>,
    len: usize,
}

/// Resolve all collisions for the tick at `now`
pub fn resolve(state: &mut GameState, foods: &FoodManager, now: u64) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut doomed = BTreeSet::new();

    // boundary
    for (index, snake) in state.snakes.iter().enumerate() {
        if snake.alive && !state.grid.contains(snake.head()) {
            doomed.insert(index);
        }
    }

    // food, at most one per snake
    for index in 0..state.snakes.len() {
        let snake = &state.snakes[index];
        if !snake.alive {
            continue;
        }
        let head = snake.head();
        let Some(slot) = state.foods.iter().position(|food| food.position == head) else {
            continue;
        };

        let food = state.foods.remove(slot);
        state.snakes[index].grow();
        if index == state.player {
            state.score += food.score;
            report.score_delta += food.score;
        }
        report.eaten.push((index, food));
    }

    // snake vs snake
    let snapshot: Vec<Snapshot> = state
        .snakes
        .iter()
        .enumerate()
        .filter(|(_, snake)| snake.alive)
        .map(|(index, snake)| Snapshot {
            index,
            head: snake.head(),
            segments: snake.body_segments().to_vec(),
            len: snake.len(),
        })
        .collect();

    // pairs of snapshot slots, each unordered pair once
    let mut head_on = BTreeSet::new();
    for (i, a) in snapshot.iter().enumerate() {
        for (j, b) in snapshot.iter().enumerate() {
            if i == j {
                continue;
            }
            if b.segments.contains(&a.head) {
                doomed.insert(a.index);
                continue;
            }
            if a.head == b.head {
                head_on.insert((i.min(j), i.max(j)));
            }
        }
    }

    let mut trims: BTreeMap<usize, usize> = BTreeMap::new();
    for (a, b) in head_on {
        let (a, b) = (&snapshot[a], &snapshot[b]);
        match a.len.cmp(&b.len) {
            Ordering::Greater => {
                *trims.entry(a.index).or_default() += a.len - b.len;
                doomed.insert(b.index);
            }
            Ordering::Less => {
                *trims.entry(b.index).or_default() += b.len - a.len;
                doomed.insert(a.index);
            }
            Ordering::Equal => {
                doomed.insert(a.index);
                doomed.insert(b.index);
            }
        }
    }

    for (index, count) in trims {
        if doomed.contains(&index) {
            continue;
        }
        state.snakes[index].truncate_tail(count);
        report.truncated.push((index, count));
    }

    // end of round, before any death is applied
    if doomed.contains(&state.player) {
        report.player_died = true;
        if state.outcome.is_none() {
            state.outcome = Some(GameOver {
                reason: GameOverReason::PlayerDied,
                final_score: state.score,
            });
        }
    }

    for index in doomed {
        let snake = &state.snakes[index];
        report.dropped_food += foods.drop_remains(&mut state.foods, snake);
        debug!(snake = index, len = snake.len(), "snake died");
        state.snakes[index].die(now);
        report.deaths.push(index);
    }

    report
}
