//! Core simulation for the snake arena
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time is passed in explicitly as milliseconds since session start, so every rule
//! can be driven deterministically from tests.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod food;
pub mod policy;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use collision::CollisionReport;
pub use config::{ConfigError, FoodTier, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::FoodManager;
pub use policy::WanderPolicy;
pub use scheduler::{Scheduler, TimerEvent};
pub use state::{
    Controller, Food, GameOver, GameOverReason, GameState, Grid, Position, Snake,
};
