//! # FEX Window
//!
//! A minimal X11 window shell: one display connection, one top-level window,
//! and a stream of application-level events translated from the native ones.
//!
//! ## Features
//!
//! - **Direct X11**: talks to the display server through `x11rb`, no toolkit
//! - **Event Translation**: native events become a single [`WindowEvent`] sum type
//! - **Explicit Lifecycle**: init once, poll in your own loop, destroy once
//! - **Headless Backend**: the same façade runs over a scripted in-memory session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fex_window::prelude::*;
//!
//! fn main() -> Result<(), WindowError> {
//!     let mut window = WindowContext::init(&WindowConfig::default())?;
//!     let mut frame = FrameTimer::new(DEFAULT_TARGET_FPS);
//!
//!     while !window.should_close() {
//!         loop {
//!             match window.poll_event()? {
//!                 WindowEvent::None => break,
//!                 event => log::debug!("{:?}", event),
//!             }
//!         }
//!         frame.wait_for_next_frame();
//!     }
//!
//!     window.destroy();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod window;

pub use error::{WindowError, WindowResult};
pub use window::{WindowContext, WindowEvent};

/// Common imports for shell users
pub mod prelude {
    pub use crate::{
        config::{
            Config, ConfigError, ShellConfig, WindowConfig, APP_NAME, DEFAULT_TARGET_FPS,
            WINDOW_MIN_HEIGHT, WINDOW_MIN_WIDTH,
        },
        error::{WindowError, WindowResult},
        foundation::time::FrameTimer,
        window::{
            keysyms, DisplayBackend, HeadlessBackend, KeyEvent, ModifierState, MouseButtonEvent,
            WindowContext, WindowEvent, WindowEventKind, X11Backend,
        },
    };
}
