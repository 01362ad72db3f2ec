//! Game state and core simulation types

use glam::Vec2;

use super::timer::{Scheduler, TimerEvent};
use crate::consts::*;
use crate::settings::{GameOverPolicy, MissPolicy};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Pre-serve countdown or message hold; physics frozen, paddle may move
    Countdown,
    /// Active gameplay
    Running,
    /// User pause; time does not advance
    Paused,
    /// Run ended, terminal
    GameOver,
}

/// Transient overlay text shown above the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Serve countdown step (3, 2, 1)
    Countdown(u32),
    Miss,
    StageClear,
    GameOver,
}

/// Events the host drains each frame (logging, leaderboard, reload)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BrickDestroyed { column: usize, row: usize },
    LifeLost { remaining: u8 },
    StageCleared { stage: u32 },
    GameOver { score: u64, stage: u32 },
    /// Emitted under `GameOverPolicy::Reload`; the host reloads the page
    ReloadRequested,
}

/// The ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Place the ball at the serve position for the given canvas width.
    ///
    /// Serves up and to the right at 45 degrees, like the original.
    pub fn reset(&mut self, width: f32) {
        self.pos = Vec2::new(width / 2.0, PLAY_HEIGHT - 30.0);
        self.vel = Vec2::new(1.0, -1.0).normalize() * BALL_SPEED;
    }
}

impl Default for Ball {
    fn default() -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        };
        ball.reset(MAX_CANVAS_WIDTH);
        ball
    }
}

/// The player's paddle, resting on the play-area floor line
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    /// Left edge x position
    pub x: f32,
    pub width: f32,
}

impl Paddle {
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Clamp to [0, canvas width - paddle width]
    pub fn clamp_to(&mut self, canvas_width: f32) {
        // max(0.0) keeps the range valid on viewports narrower than the paddle
        self.x = self.x.clamp(0.0, (canvas_width - self.width).max(0.0));
    }

    /// Center the paddle for a serve
    pub fn reset(&mut self, canvas_width: f32) {
        self.x = (canvas_width - self.width) / 2.0;
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (MAX_CANVAS_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
        }
    }
}

/// One brick cell with its computed top-left corner
#[derive(Debug, Clone, Copy)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    /// Destroyed bricks never come back within a stage
    pub alive: bool,
}

/// Fixed-size grid of bricks, rebuilt at each stage start
#[derive(Debug, Clone)]
pub struct BrickGrid {
    pub columns: usize,
    pub rows: usize,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Build a full grid with every brick alive.
    ///
    /// Cell positions are fixed by column/row index and the layout offsets;
    /// they do not depend on canvas width.
    pub fn build(columns: usize, rows: usize) -> Self {
        let mut bricks = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                bricks.push(Brick {
                    x: column as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
                    y: row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
                    alive: true,
                });
            }
        }
        Self {
            columns,
            rows,
            bricks,
        }
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> &Brick {
        &self.bricks[row * self.columns + column]
    }

    #[inline]
    pub fn get_mut(&mut self, column: usize, row: usize) -> &mut Brick {
        &mut self.bricks[row * self.columns + column]
    }

    /// Iterate all bricks row-major with their (column, row) indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Brick)> {
        self.bricks.iter().enumerate().map(|(i, b)| {
            (i % self.columns, i / self.columns, b)
        })
    }

    pub fn live_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    pub fn all_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.alive)
    }
}

/// Complete game state, owned by the loop - no globals
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current canvas width (viewport width capped at `MAX_CANVAS_WIDTH`)
    pub width: f32,
    pub score: u64,
    pub lives: u8,
    /// 1-based stage counter
    pub stage: u32,
    pub phase: GamePhase,
    pub message: Option<Message>,
    /// Remaining countdown steps while serving
    pub countdown: u32,
    /// Bumped on every reset; cancels in-flight timers
    pub epoch: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    pub timers: Scheduler,
    pub miss_policy: MissPolicy,
    pub game_over_policy: GameOverPolicy,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run for the given canvas width
    pub fn new(width: f32) -> Self {
        let width = width.min(MAX_CANVAS_WIDTH);
        let mut state = Self {
            width,
            score: 0,
            lives: STARTING_LIVES,
            stage: 1,
            phase: GamePhase::Running,
            message: None,
            countdown: 0,
            epoch: 0,
            time_ticks: 0,
            ball: Ball::default(),
            paddle: Paddle::default(),
            bricks: BrickGrid::build(BRICK_COLUMNS, Self::rows_for_stage(1)),
            timers: Scheduler::new(),
            miss_policy: MissPolicy::default(),
            game_over_policy: GameOverPolicy::default(),
            events: Vec::new(),
        };
        state.reset_positions();
        state.begin_countdown();
        state
    }

    /// Row count grows by one per stage
    pub fn rows_for_stage(stage: u32) -> usize {
        BASE_BRICK_ROWS + (stage as usize - 1)
    }

    /// Re-center ball and paddle for a serve
    pub fn reset_positions(&mut self) {
        self.ball.reset(self.width);
        self.paddle.reset(self.width);
    }

    /// Rebuild the grid for the current stage and re-center positions
    pub fn rebuild_for_stage(&mut self) {
        self.bricks = BrickGrid::build(BRICK_COLUMNS, Self::rows_for_stage(self.stage));
        self.reset_positions();
    }

    /// Invalidate all in-flight timers
    pub fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Enter the serve countdown: 3, 2, 1, then Running
    pub fn begin_countdown(&mut self) {
        self.phase = GamePhase::Countdown;
        self.countdown = COUNTDOWN_START;
        self.message = Some(Message::Countdown(self.countdown));
        self.timers.arm(
            self.time_ticks + COUNTDOWN_STEP_TICKS,
            self.epoch,
            TimerEvent::CountdownStep,
        );
    }

    /// Show a message for `MESSAGE_HOLD_TICKS`, then run the serve countdown
    pub fn hold_message(&mut self, message: Message) {
        self.phase = GamePhase::Countdown;
        self.countdown = 0;
        self.message = Some(message);
        self.timers.arm(
            self.time_ticks + MESSAGE_HOLD_TICKS,
            self.epoch,
            TimerEvent::Resume,
        );
    }

    /// Apply a viewport resize.
    ///
    /// Like the original, a resize re-centers ball and paddle; brick
    /// positions are layout-fixed and unaffected.
    pub fn resize(&mut self, width: f32) {
        self.width = width.min(MAX_CANVAS_WIDTH);
        if self.phase != GamePhase::GameOver {
            self.reset_positions();
        }
        self.paddle.clamp_to(self.width);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_build_positions() {
        let grid = BrickGrid::build(BRICK_COLUMNS, BASE_BRICK_ROWS);
        assert_eq!(grid.live_count(), 50);

        let first = grid.get(0, 0);
        assert_eq!(first.x, BRICK_OFFSET_LEFT);
        assert_eq!(first.y, BRICK_OFFSET_TOP);

        let b = grid.get(2, 1);
        assert_eq!(b.x, 2.0 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT);
        assert_eq!(b.y, BRICK_HEIGHT + BRICK_PADDING + BRICK_OFFSET_TOP);
    }

    #[test]
    fn test_rows_for_stage() {
        assert_eq!(GameState::rows_for_stage(1), 5);
        assert_eq!(GameState::rows_for_stage(2), 6);
        assert_eq!(GameState::rows_for_stage(10), 14);
    }

    #[test]
    fn test_new_state_starts_in_countdown() {
        let state = GameState::new(960.0);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.message, Some(Message::Countdown(3)));
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.stage, 1);
        assert_eq!(state.bricks.live_count(), 50);
    }

    #[test]
    fn test_paddle_clamp() {
        let mut paddle = Paddle::default();
        paddle.x = -20.0;
        paddle.clamp_to(960.0);
        assert_eq!(paddle.x, 0.0);

        paddle.x = 2000.0;
        paddle.clamp_to(960.0);
        assert_eq!(paddle.x, 960.0 - PADDLE_WIDTH);
    }

    #[test]
    fn test_resize_recenters() {
        let mut state = GameState::new(960.0);
        state.resize(600.0);
        assert_eq!(state.width, 600.0);
        assert_eq!(state.ball.pos.x, 300.0);
        assert_eq!(state.paddle.center(), 300.0);
    }

    #[test]
    fn test_resize_caps_width() {
        let mut state = GameState::new(960.0);
        state.resize(4000.0);
        assert_eq!(state.width, MAX_CANVAS_WIDTH);
    }
}
