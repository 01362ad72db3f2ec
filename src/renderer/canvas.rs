//! Canvas 2D renderer
//!
//! Paints the frame in the same order as the game's draw loop always has:
//! background split (play area + control strip), bricks, ball, paddle, HUD
//! text, then any overlay message.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::{GamePhase, GameState, Message};

/// Entity and background colors
const ENTITY_COLOR: &str = "#0095DD";
const PLAY_BG: &str = "#ffffff";
const STRIP_BG: &str = "#dddddd";
const OVERLAY_BG: &str = "rgba(0, 0, 0, 0.45)";
const OVERLAY_TEXT: &str = "#ffffff";

/// Extra HUD values supplied by the host
#[derive(Debug, Clone, Copy, Default)]
pub struct HudInfo {
    /// FPS counter, shown when enabled in settings
    pub fps: Option<u32>,
    /// Best score from the leaderboard
    pub best: Option<u64>,
}

/// Owns the 2D drawing context for the game canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasRenderer {
    /// Acquire the 2D context. A missing context is a fatal startup
    /// precondition, surfaced as an error here.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            ctx,
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Paint one full frame from the current state
    pub fn render(&self, state: &GameState, hud: &HudInfo) {
        self.draw_background();
        self.draw_bricks(state);
        self.draw_ball(state);
        self.draw_paddle(state);
        self.draw_hud(state, hud);
        self.draw_overlay(state);
    }

    fn draw_background(&self) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(PLAY_BG);
        ctx.fill_rect(0.0, 0.0, self.width as f64, PLAY_HEIGHT as f64);
        ctx.set_fill_style_str(STRIP_BG);
        ctx.fill_rect(
            0.0,
            PLAY_HEIGHT as f64,
            self.width as f64,
            (self.height - PLAY_HEIGHT) as f64,
        );
    }

    fn draw_bricks(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(ENTITY_COLOR);
        for (_, _, brick) in state.bricks.iter() {
            if brick.alive {
                ctx.fill_rect(
                    brick.x as f64,
                    brick.y as f64,
                    BRICK_WIDTH as f64,
                    BRICK_HEIGHT as f64,
                );
            }
        }
    }

    fn draw_ball(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(ENTITY_COLOR);
        ctx.begin_path();
        let _ = ctx.arc(
            state.ball.pos.x as f64,
            state.ball.pos.y as f64,
            state.ball.radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
        ctx.close_path();
    }

    fn draw_paddle(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(ENTITY_COLOR);
        ctx.fill_rect(
            state.paddle.x as f64,
            (PLAY_HEIGHT - PADDLE_HEIGHT) as f64,
            state.paddle.width as f64,
            PADDLE_HEIGHT as f64,
        );
    }

    fn draw_hud(&self, state: &GameState, hud: &HudInfo) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(ENTITY_COLOR);
        ctx.set_font("20px Arial");

        ctx.set_text_align("left");
        let _ = ctx.fill_text(&format!("Score: {}", state.score), 10.0, 30.0);

        ctx.set_text_align("center");
        let _ = ctx.fill_text(
            &format!("Stage: {}", state.stage),
            self.width as f64 / 2.0,
            30.0,
        );

        ctx.set_text_align("right");
        let _ = ctx.fill_text(
            &format!("Lives: {}", state.lives),
            (self.width - 10.0) as f64,
            30.0,
        );

        // Secondary line in the control strip
        ctx.set_font("16px Arial");
        ctx.set_text_align("left");
        if let Some(best) = hud.best {
            let _ = ctx.fill_text(
                &format!("Best: {}", best),
                10.0,
                (PLAY_HEIGHT + 28.0) as f64,
            );
        }
        ctx.set_text_align("right");
        if let Some(fps) = hud.fps {
            let _ = ctx.fill_text(
                &format!("{} fps", fps),
                (self.width - 10.0) as f64,
                (PLAY_HEIGHT + 28.0) as f64,
            );
        }
    }

    fn overlay_text(state: &GameState) -> Option<String> {
        if state.phase == GamePhase::Paused {
            return Some("Paused".to_string());
        }
        match state.message? {
            Message::Countdown(n) => Some(n.to_string()),
            Message::Miss => Some("Miss!".to_string()),
            Message::StageClear => Some("Stage Clear!".to_string()),
            Message::GameOver => Some("Game Over".to_string()),
        }
    }

    fn draw_overlay(&self, state: &GameState) {
        let Some(text) = Self::overlay_text(state) else {
            return;
        };
        let ctx = &self.ctx;
        let cx = self.width as f64 / 2.0;
        let cy = PLAY_HEIGHT as f64 / 2.0;

        ctx.set_fill_style_str(OVERLAY_BG);
        ctx.fill_rect(0.0, 0.0, self.width as f64, PLAY_HEIGHT as f64);

        ctx.set_fill_style_str(OVERLAY_TEXT);
        ctx.set_text_align("center");
        ctx.set_font("bold 64px Arial");
        let _ = ctx.fill_text(&text, cx, cy);

        if state.phase == GamePhase::GameOver {
            ctx.set_font("24px Arial");
            let _ = ctx.fill_text(&format!("Final score: {}", state.score), cx, cy + 48.0);
        }
    }
}
