//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The host calls
//! [`tick`] from its frame callback via a fixed-timestep accumulator; input
//! handlers only set flags on [`TickInput`], never touch physics directly.

use super::collision;
use super::state::{GameEvent, GamePhase, GameState, Message};
use super::timer::TimerEvent;
use crate::consts::*;
use crate::settings::{GameOverPolicy, MissPolicy};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left movement held (ArrowLeft or on-screen button)
    pub left: bool,
    /// Right movement held (ArrowRight or on-screen button)
    pub right: bool,
    /// Absolute paddle-center override from touch drag
    pub drag_x: Option<f32>,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
            }
            // Countdowns are short; pausing them is not supported
            _ => {}
        }
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    // Timers first, so a fired transition takes effect within this tick
    for event in state.timers.drain_due(state.time_ticks, state.epoch) {
        match event {
            TimerEvent::CountdownStep => step_countdown(state),
            TimerEvent::Resume => {
                if state.phase == GamePhase::Countdown {
                    state.begin_countdown();
                }
            }
        }
    }

    // Paddle responds to input even during the countdown
    apply_paddle_input(state, input, dt);

    if state.phase != GamePhase::Running {
        return;
    }

    resolve_brick_hits(state);
    if state.bricks.all_cleared() {
        advance_stage(state);
        return;
    }

    state.ball.pos += state.ball.vel * dt;

    let width = state.width;
    let ball = &mut state.ball;
    collision::reflect_walls(&mut ball.pos, &mut ball.vel, ball.radius, width);

    resolve_floor(state);
}

fn step_countdown(state: &mut GameState) {
    if state.phase != GamePhase::Countdown || state.countdown == 0 {
        return;
    }
    state.countdown -= 1;
    if state.countdown == 0 {
        state.phase = GamePhase::Running;
        state.message = None;
    } else {
        state.message = Some(Message::Countdown(state.countdown));
        state.timers.arm(
            state.time_ticks + COUNTDOWN_STEP_TICKS,
            state.epoch,
            TimerEvent::CountdownStep,
        );
    }
}

fn apply_paddle_input(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(x) = input.drag_x {
        state.paddle.x = x - state.paddle.width / 2.0;
    } else if input.right {
        state.paddle.x += PADDLE_SPEED * dt;
    } else if input.left {
        state.paddle.x -= PADDLE_SPEED * dt;
    }
    state.paddle.clamp_to(state.width);
}

/// Point-in-rect pass over every live brick.
///
/// Each hit flips the vertical velocity, kills the brick, and scores. Brick
/// rects are disjoint, so at most one brick can contain the ball center.
fn resolve_brick_hits(state: &mut GameState) {
    let ball_pos = state.ball.pos;
    for row in 0..state.bricks.rows {
        for column in 0..state.bricks.columns {
            let hit = {
                let brick = state.bricks.get_mut(column, row);
                if brick.alive && collision::ball_hits_brick(ball_pos, brick.x, brick.y) {
                    brick.alive = false;
                    true
                } else {
                    false
                }
            };
            if hit {
                state.ball.vel.y = -state.ball.vel.y;
                state.score += SCORE_PER_BRICK;
                state.push_event(GameEvent::BrickDestroyed { column, row });
            }
        }
    }
}

/// All bricks gone: next stage gets one more row, fresh grid, fresh serve
fn advance_stage(state: &mut GameState) {
    state.push_event(GameEvent::StageCleared { stage: state.stage });
    state.stage += 1;
    state.bump_epoch();
    state.rebuild_for_stage();
    state.hold_message(Message::StageClear);
}

/// Paddle catch or miss once the ball reaches the play-area floor line
fn resolve_floor(state: &mut GameState) {
    let floor = PLAY_HEIGHT - state.ball.radius;
    if state.ball.pos.y < floor {
        return;
    }

    if collision::paddle_catches(state.ball.pos.x, state.paddle.x, state.paddle.width) {
        state.ball.vel = collision::paddle_bounce(
            state.ball.vel,
            state.ball.pos.x,
            state.paddle.x,
            state.paddle.width,
        );
        state.ball.pos.y = floor - (state.ball.pos.y - floor);
        return;
    }

    handle_miss(state);
}

fn handle_miss(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::LifeLost {
        remaining: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.message = Some(Message::GameOver);
        state.timers.clear();
        state.push_event(GameEvent::GameOver {
            score: state.score,
            stage: state.stage,
        });
        if state.game_over_policy == GameOverPolicy::Reload {
            state.push_event(GameEvent::ReloadRequested);
        }
        return;
    }

    state.bump_epoch();
    state.reset_positions();
    match state.miss_policy {
        MissPolicy::Immediate => {}
        MissPolicy::CountdownResume => state.hold_message(Message::Miss),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Fresh state forced straight into active play
    fn running_state() -> GameState {
        let mut state = GameState::new(960.0);
        state.phase = GamePhase::Running;
        state.message = None;
        state.countdown = 0;
        state.timers.clear();
        state
    }

    fn run_ticks(state: &mut GameState, input: &TickInput, n: u64) {
        for _ in 0..n {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_countdown_reaches_running_after_three_steps() {
        let mut state = GameState::new(960.0);
        let input = TickInput::default();

        run_ticks(&mut state, &input, COUNTDOWN_STEP_TICKS * 3 - 1);
        assert_eq!(state.phase, GamePhase::Countdown);

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.message, None);
    }

    #[test]
    fn test_countdown_steps_update_message() {
        let mut state = GameState::new(960.0);
        let input = TickInput::default();

        run_ticks(&mut state, &input, COUNTDOWN_STEP_TICKS);
        assert_eq!(state.message, Some(Message::Countdown(2)));

        run_ticks(&mut state, &input, COUNTDOWN_STEP_TICKS);
        assert_eq!(state.message, Some(Message::Countdown(1)));
    }

    #[test]
    fn test_brick_hit_destroys_scores_and_flips_velocity() {
        let mut state = running_state();
        // Inside brick (0, 0): rect (35, 40) to (115, 65)
        state.ball.pos = Vec2::new(75.0, 52.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(!state.bricks.get(0, 0).alive);
        assert_eq!(state.score, SCORE_PER_BRICK);
        assert!(state.ball.vel.y > 0.0);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::BrickDestroyed { column: 0, row: 0 })
        );
    }

    #[test]
    fn test_destroyed_brick_stays_destroyed() {
        let mut state = running_state();
        state.ball.pos = Vec2::new(75.0, 52.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.bricks.get(0, 0).alive);

        // Park the ball in open space and keep ticking
        state.ball.pos = Vec2::new(480.0, 400.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED);
        run_ticks(&mut state, &TickInput::default(), 60);
        assert!(!state.bricks.get(0, 0).alive);
    }

    #[test]
    fn test_stage_clear_increments_once_and_adds_row() {
        let mut state = running_state();
        // Leave only brick (0, 0) alive
        for row in 0..state.bricks.rows {
            for column in 0..state.bricks.columns {
                if (column, row) != (0, 0) {
                    state.bricks.get_mut(column, row).alive = false;
                }
            }
        }
        state.ball.pos = Vec2::new(75.0, 52.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.stage, 2);
        assert_eq!(state.bricks.rows, 6);
        assert_eq!(state.bricks.live_count(), 60);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.message, Some(Message::StageClear));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::StageCleared { stage: 1 })
        );

        // No double increment on the next tick
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.stage, 2);
    }

    #[test]
    fn test_stage_clear_resumes_through_message_and_countdown() {
        let mut state = running_state();
        for row in 0..state.bricks.rows {
            for column in 0..state.bricks.columns {
                state.bricks.get_mut(column, row).alive = false;
            }
        }
        // Grid already empty: the clear triggers on the first tick
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.message, Some(Message::StageClear));

        let input = TickInput::default();
        run_ticks(&mut state, &input, MESSAGE_HOLD_TICKS);
        assert_eq!(state.message, Some(Message::Countdown(3)));

        run_ticks(&mut state, &input, COUNTDOWN_STEP_TICKS * 3);
        assert_eq!(state.phase, GamePhase::Running);
    }

    /// Drop the ball past the floor far away from the paddle
    fn force_miss(state: &mut GameState) {
        state.ball.pos = Vec2::new(100.0, PLAY_HEIGHT - state.ball.radius - 0.5);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED);
        state.paddle.x = 800.0;
        tick(state, &TickInput::default(), SIM_DT);
    }

    #[test]
    fn test_miss_with_countdown_policy() {
        let mut state = running_state();
        state.miss_policy = MissPolicy::CountdownResume;

        force_miss(&mut state);

        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.message, Some(Message::Miss));
        // Ball back at the serve position
        assert_eq!(state.ball.pos.y, PLAY_HEIGHT - 30.0);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LifeLost { remaining: 2 })
        );
    }

    #[test]
    fn test_miss_with_immediate_policy() {
        let mut state = running_state();
        state.miss_policy = MissPolicy::Immediate;

        force_miss(&mut state);

        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.message, None);
        assert_eq!(state.ball.pos.y, PLAY_HEIGHT - 30.0);
    }

    #[test]
    fn test_last_life_enters_game_over() {
        let mut state = running_state();
        state.lives = 1;

        force_miss(&mut state);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.message, Some(Message::GameOver));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LifeLost { remaining: 0 }));
        assert!(events.contains(&GameEvent::GameOver { score: 0, stage: 1 }));
        assert!(!events.contains(&GameEvent::ReloadRequested));

        // Terminal: no more time, no more lives lost
        let ticks_at_end = state.time_ticks;
        run_ticks(&mut state, &TickInput::default(), 30);
        assert_eq!(state.time_ticks, ticks_at_end);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_game_over_reload_policy_requests_reload() {
        let mut state = running_state();
        state.lives = 1;
        state.game_over_policy = GameOverPolicy::Reload;

        force_miss(&mut state);

        assert!(state.drain_events().contains(&GameEvent::ReloadRequested));
    }

    #[test]
    fn test_paddle_catch_rebounds_upward() {
        let mut state = running_state();
        state.paddle.x = 400.0;
        state.ball.pos = Vec2::new(437.5, PLAY_HEIGHT - state.ball.radius - 0.5);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.pos.y <= PLAY_HEIGHT - state.ball.radius);
    }

    #[test]
    fn test_held_right_clamps_at_canvas_edge() {
        // Countdown phase: paddle moves, ball stays frozen
        let mut state = GameState::new(960.0);
        let input = TickInput {
            right: true,
            ..Default::default()
        };

        run_ticks(&mut state, &input, 300);
        assert_eq!(state.paddle.x, 960.0 - PADDLE_WIDTH);
    }

    #[test]
    fn test_drag_overrides_held_keys() {
        let mut state = running_state();
        let input = TickInput {
            right: true,
            drag_x: Some(100.0),
            ..Default::default()
        };

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.paddle.center(), 100.0);
    }

    #[test]
    fn test_drag_is_clamped_to_bounds() {
        let mut state = running_state();
        let input = TickInput {
            drag_x: Some(-500.0),
            ..Default::default()
        };

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.paddle.x, 0.0);
    }

    #[test]
    fn test_pause_toggle_freezes_time() {
        let mut state = running_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.time_ticks;
        run_ticks(&mut state, &TickInput::default(), 50);
        assert_eq!(state.time_ticks, frozen);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_stale_countdown_timer_never_fires() {
        let mut state = GameState::new(960.0);
        // Invalidate the countdown timer armed at construction
        state.bump_epoch();

        run_ticks(&mut state, &TickInput::default(), COUNTDOWN_STEP_TICKS * 2);
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.message, Some(Message::Countdown(3)));
        assert_eq!(state.timers.pending_count(), 0);
    }

    #[test]
    fn test_wall_bounces_during_play() {
        let mut state = running_state();
        state.ball.pos = Vec2::new(state.ball.radius + 1.0, 400.0);
        state.ball.vel = Vec2::new(-BALL_SPEED, 0.0);

        run_ticks(&mut state, &TickInput::default(), 5);
        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.pos.x >= state.ball.radius);
    }
}
