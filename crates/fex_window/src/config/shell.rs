use log::LevelFilter;
use serde::{Deserialize, Serialize};

use super::Config;

/// Application name, also the default window title
pub const APP_NAME: &str = "FEX";
/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default requested window width in pixels
pub const WINDOW_DEFAULT_WIDTH: i32 = 800;
/// Default requested window height in pixels
pub const WINDOW_DEFAULT_HEIGHT: i32 = 600;
/// Smallest width a window may be resized to
pub const WINDOW_MIN_WIDTH: i32 = 400;
/// Smallest height a window may be resized to
pub const WINDOW_MIN_HEIGHT: i32 = 300;

/// Default frame rate the main loop paces itself to
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Requested geometry, title and resizability of the shell window
///
/// The title is owned: the window context keeps its own copy for as long as
/// the window lives, so callers never have to keep the string alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Requested width in pixels
    pub width: i32,
    /// Requested height in pixels
    pub height: i32,
    /// Requested x position of the top-left corner
    pub x: i32,
    /// Requested y position of the top-left corner
    pub y: i32,
    /// Window title
    pub title: String,
    /// Whether the window manager may resize the window
    pub resizable: bool,
}

impl WindowConfig {
    /// Create a window configuration with the given title and size
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the requested position
    #[must_use]
    pub const fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set whether the window is resizable
    #[must_use]
    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: WINDOW_DEFAULT_WIDTH,
            height: WINDOW_DEFAULT_HEIGHT,
            x: 0,
            y: 0,
            title: APP_NAME.to_string(),
            resizable: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level; `RUST_LOG` still overrides it
    pub level: LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info }
    }
}

/// Main loop pacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second the main loop sleeps towards
    pub target_fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

/// # Shell Configuration
///
/// Everything the `fex` binary reads from its config file.
///
/// ```toml
/// [window]
/// width = 800
/// height = 600
/// title = "FEX"
/// resizable = true
///
/// [logging]
/// level = "info"
///
/// [frame]
/// target_fps = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Window geometry and title
    pub window: WindowConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Frame pacing settings
    pub frame: FrameConfig,
}

impl Config for ShellConfig {}
