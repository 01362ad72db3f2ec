//! Canvas 2D rendering module
//!
//! Draw-only: reads `GameState` each frame and owns no gameplay logic.

pub mod canvas;

pub use canvas::{CanvasRenderer, HudInfo};
