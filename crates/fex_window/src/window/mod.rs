//! Window management subsystem
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application main loop       │
//! └─────────────┬───────────────────┘
//!               │ polls, resizes, destroys
//!      ┌────────▼────────┐
//!      │ WindowContext   │ ← State + event translation (context.rs)
//!      └────────┬────────┘
//!               │ drives
//!      ┌────────▼────────┐
//!      │ DisplayBackend  │ ← Session trait (backend.rs)
//!      └────────┬────────┘
//!               │ implemented by
//!   ┌───────────▼───────────┐
//!   │ X11Backend            │ ← x11rb connection (x11.rs)
//!   │ HeadlessBackend       │ ← Scripted in-memory session (headless.rs)
//!   └───────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - **`context`**: the application-facing window
//! - **`backend`**: the session contract and size hint policy
//! - **`event`**: native and application event types
//! - **`keymap`**: keycode to keysym and text lookup
//! - **`x11`** / **`headless`**: session implementations

mod backend;
mod context;
mod event;
mod headless;
mod keymap;
mod x11;

pub use backend::{DisplayBackend, SizeHints};
pub use context::WindowContext;
pub use event::{
    keysyms, KeyEvent, Keysym, ModifierState, MouseButtonEvent, NativeEvent, WindowEvent, WindowEventKind,
};
pub use headless::{HeadlessBackend, HeadlessRecord, HEADLESS_CLOSE_TOKEN};
pub use keymap::{keysym_to_text, Keymap};
pub use x11::X11Backend;
