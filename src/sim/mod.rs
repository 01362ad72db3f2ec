//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (row-major over the brick grid)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{ball_hits_brick, paddle_bounce, paddle_catches, reflect_walls};
pub use state::{
    Ball, Brick, BrickGrid, GameEvent, GamePhase, GameState, Message, Paddle,
};
pub use tick::{TickInput, tick};
pub use timer::{Scheduler, TimerEvent};
