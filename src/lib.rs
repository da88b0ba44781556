//! Snake Arena - one player against wandering AI snakes on a fixed grid
//!
//! This library provides:
//! - Core simulation: movement, collisions, food tiers and timers (game module)
//! - High-score persistence (storage module)
//! - TUI rendering and keyboard input (render and input modules)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
