use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::{
    action::Action,
    collision::{self, CollisionReport},
    config::GameConfig,
    food::{self, FoodManager},
    policy::WanderPolicy,
    scheduler::{Scheduler, TimerEvent},
    state::{Controller, Food, GameOver, GameOverReason, GameState, Grid, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Food placed by the spawn timer this step
    pub spawned_food: Vec<Food>,
    /// Indices of AI snakes that joined this step
    pub spawned_ai: Vec<usize>,
    /// Indices of AI snakes revived this step
    pub revived: Vec<usize>,
    /// Everything the collision pass did
    pub collisions: CollisionReport,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session has ended
    pub terminated: bool,
    pub outcome: Option<GameOver>,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// One call to [`GameEngine::step`] is one tick: timers and input, then
/// movement, then collisions, then the time limit.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    foods: FoodManager,
    policy: WanderPolicy,
    scheduler: Scheduler,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            foods: FoodManager::new(config.food_tiers.clone(), config.death_drop_score),
            policy: WanderPolicy::new(config.ai_turn_chance, config.ai_revive_delay_ms),
            scheduler: Scheduler::new(config.food_spawn_interval_ms, &config.ai_spawn_times_ms),
            config,
            rng,
        }
    }

    /// Start a fresh session: player at the centre plus the initial AI snakes
    pub fn reset(&mut self) -> GameState {
        self.scheduler = Scheduler::new(
            self.config.food_spawn_interval_ms,
            &self.config.ai_spawn_times_ms,
        );

        let grid = Grid::new(self.config.grid_size);
        let player = Snake::new(
            grid.center(),
            Controller::Player,
            self.config.initial_snake_length,
            self.config.base_speed_ms,
            0,
        );
        let mut state = GameState::new(grid, player);

        for _ in 0..self.config.initial_ai_count {
            self.spawn_ai(&mut state, 0);
        }

        info!(
            grid = self.config.grid_size,
            ai = state.snakes.len() - 1,
            "session started"
        );
        state
    }

    /// Execute one tick at `now` ms since session start
    pub fn step(&mut self, state: &mut GameState, now: u64, actions: &[Action]) -> StepResult {
        if let Some(outcome) = state.outcome {
            return StepResult {
                terminated: true,
                outcome: Some(outcome),
                info: StepInfo::default(),
            };
        }

        state.elapsed_ms = now;
        let mut info = StepInfo::default();

        for event in self.scheduler.poll(now) {
            match event {
                TimerEvent::SpawnFood => {
                    if let Some(food) = self.foods.spawn(state, &mut self.rng) {
                        info.spawned_food.push(food);
                    }
                }
                TimerEvent::SpawnAi => {
                    if let Some(index) = self.spawn_ai(state, now) {
                        info.spawned_ai.push(index);
                    }
                }
            }
        }

        self.apply_actions(state, actions);

        let grid = state.grid;
        for (index, snake) in state.snakes.iter_mut().enumerate() {
            match snake.controller {
                Controller::Player => {
                    snake.update(now);
                }
                Controller::Wander => {
                    if self.policy.tick(snake, grid, now, &mut self.rng) {
                        debug!(snake = index, "snake revived");
                        info.revived.push(index);
                    }
                }
            }
        }

        info.collisions = collision::resolve(state, &self.foods, now);

        if state.outcome.is_none() && now >= self.config.time_limit_ms {
            state.outcome = Some(GameOver {
                reason: GameOverReason::TimeUp,
                final_score: state.score,
            });
        }

        if let Some(outcome) = state.outcome {
            info!(
                reason = ?outcome.reason,
                score = outcome.final_score,
                elapsed_ms = now,
                "session over"
            );
        }

        StepResult {
            terminated: state.outcome.is_some(),
            outcome: state.outcome,
            info,
        }
    }

    /// Feed player intents; ignored once the player is dead
    fn apply_actions(&self, state: &mut GameState, actions: &[Action]) {
        let boosted = self.config.boosted_speed_ms();
        let player = state.player_mut();
        if !player.alive {
            return;
        }

        for action in actions {
            match *action {
                Action::Move(direction) => player.set_direction(direction),
                Action::ToggleBoost => player.toggle_boost(boosted),
            }
        }
    }

    /// Add a wandering snake on a random free cell
    fn spawn_ai(&mut self, state: &mut GameState, now: u64) -> Option<usize> {
        let spawn = food::random_free_cell(state, &mut self.rng)?;
        state.snakes.push(Snake::new(
            spawn,
            Controller::Wander,
            self.config.initial_snake_length,
            self.config.base_speed_ms,
            now,
        ));

        let index = state.snakes.len() - 1;
        debug!(snake = index, x = spawn.x, y = spawn.y, "ai snake spawned");
        Some(index)
    }
}
