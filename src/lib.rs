//! Brick Rush - a canvas brick-breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Canvas 2D rendering (wasm only)
//! - `settings`: Player preferences and gameplay policies
//! - `highscores`: Local leaderboard

pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{GameOverPolicy, MissPolicy, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas width is the viewport width capped at this value
    pub const MAX_CANVAS_WIDTH: f32 = 960.0;
    /// Height of the play area (ball/paddle/brick space)
    pub const PLAY_HEIGHT: f32 = 640.0;
    /// Full canvas height; the strip below the play area hosts on-screen controls
    pub const TOTAL_HEIGHT: f32 = 840.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED: f32 = 170.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 300.0;
    /// Maximum rebound angle from vertical for an edge-of-paddle hit
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 10;
    pub const BASE_BRICK_ROWS: usize = 5;
    pub const BRICK_WIDTH: f32 = 80.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 40.0;
    pub const BRICK_OFFSET_LEFT: f32 = 35.0;

    /// Score awarded per destroyed brick
    pub const SCORE_PER_BRICK: u64 = 10;
    pub const STARTING_LIVES: u8 = 3;

    /// Serve countdown starts at this number and steps once per second
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_STEP_TICKS: u64 = 120;
    /// How long "Miss!" / "Stage Clear!" holds before the countdown begins
    pub const MESSAGE_HOLD_TICKS: u64 = 90;
}
