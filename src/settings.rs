//! Game settings and gameplay policies
//!
//! Persisted to LocalStorage on wasm. The two policies cover behaviors the
//! earlier browser builds disagreed on, so both are configurable instead of
//! hard-coded.

use serde::{Deserialize, Serialize};

/// What happens after a missed ball when lives remain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissPolicy {
    /// Reset ball and paddle, keep playing on the next tick
    Immediate,
    /// Show "Miss!", then a 3-2-1 countdown before resuming
    #[default]
    CountdownResume,
}

impl MissPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissPolicy::Immediate => "Immediate",
            MissPolicy::CountdownResume => "CountdownResume",
        }
    }
}

/// How a finished run is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameOverPolicy {
    /// In-canvas terminal message; the loop keeps rendering
    #[default]
    Overlay,
    /// Ask the host to reload the page after showing the message
    Reload,
}

impl GameOverPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverPolicy::Overlay => "Overlay",
            GameOverPolicy::Reload => "Reload",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub miss_policy: MissPolicy,
    pub game_over_policy: GameOverPolicy,
    /// Show the on-screen left/right buttons in the lower strip
    pub touch_controls: bool,
    /// Show FPS counter in the HUD strip
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            miss_policy: MissPolicy::default(),
            game_over_policy: GameOverPolicy::default(),
            touch_controls: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "brick_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
