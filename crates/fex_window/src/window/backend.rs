//! Display-server session trait
//!
//! A backend owns the connection to the display server and the one native
//! window created on it. The [`WindowContext`](super::WindowContext) drives
//! it through the init sequence, pulls native events out of it, and tears
//! it down exactly once.

use crate::config::{WindowConfig, WINDOW_MIN_HEIGHT, WINDOW_MIN_WIDTH};
use crate::error::WindowResult;

use super::event::NativeEvent;

/// Size hints handed to the window manager (`WM_NORMAL_HINTS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeHints {
    /// Smallest size the window manager may give the window
    pub min_size: Option<(i32, i32)>,
    /// Largest size the window manager may give the window
    pub max_size: Option<(i32, i32)>,
}

impl SizeHints {
    /// Hints for a window created from `config`
    ///
    /// Fixed-size windows pin min and max to the requested size; resizable
    /// windows only get the platform floor as a minimum.
    pub const fn for_config(config: &WindowConfig) -> Self {
        if config.resizable {
            Self {
                min_size: Some((WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT)),
                max_size: None,
            }
        } else {
            let size = (config.width, config.height);
            Self {
                min_size: Some(size),
                max_size: Some(size),
            }
        }
    }
}

/// Native session + window operations
///
/// Every method maps onto one or two display-server requests. None of them
/// waits for events: [`DisplayBackend::next_event`] returns `Ok(None)` when
/// the queue is empty.
pub trait DisplayBackend {
    /// Native window handle type
    type WindowId: Copy + std::fmt::Debug;

    /// Screen number the session selected
    fn screen(&self) -> usize;

    /// Native handle of the created window, if any
    fn window_id(&self) -> Option<Self::WindowId>;

    /// Create the top-level window at the requested position and size
    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<()>;

    /// Store the window title
    fn set_title(&mut self, title: &str) -> WindowResult<()>;

    /// Publish size hints to the window manager
    fn set_size_hints(&mut self, hints: &SizeHints) -> WindowResult<()>;

    /// Opt in to the graceful-close protocol and return its close token
    fn register_close_protocol(&mut self) -> WindowResult<u32>;

    /// Select exposure, structure, key, button, motion and focus events
    fn select_events(&mut self) -> WindowResult<()>;

    /// Make the window visible
    fn map_window(&mut self) -> WindowResult<()>;

    /// Push buffered requests to the server
    fn flush(&mut self) -> WindowResult<()>;

    /// Request a new window size
    fn resize(&mut self, width: u32, height: u32) -> WindowResult<()>;

    /// Dequeue at most one native event without blocking
    fn next_event(&mut self) -> WindowResult<Option<NativeEvent>>;

    /// Destroy the native window if one exists; later calls do nothing
    fn destroy_window(&mut self) -> WindowResult<()>;

    /// Close the session
    fn close(self) -> WindowResult<()>;
}
