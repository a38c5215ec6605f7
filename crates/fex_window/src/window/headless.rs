//! In-memory display session
//!
//! Behaves like a display server that never produces events on its own:
//! callers script the native event queue and inspect what the window
//! context asked for. Used by the test suite and for runs without `$DISPLAY`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::WindowConfig;
use crate::error::{WindowError, WindowResult};

use super::backend::{DisplayBackend, SizeHints};
use super::event::NativeEvent;

/// Close token the headless session hands out
pub const HEADLESS_CLOSE_TOKEN: u32 = 0x1d1;

/// Everything the window context requested from the headless session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessRecord {
    /// Title stored on the window
    pub title: Option<String>,
    /// Last size hints published
    pub size_hints: Option<SizeHints>,
    /// Whether the close protocol was registered
    pub close_protocol_registered: bool,
    /// Whether events were selected
    pub events_selected: bool,
    /// Whether the window was mapped
    pub mapped: bool,
    /// Native resize requests, in order
    pub resizes: Vec<(u32, u32)>,
    /// Number of flushes
    pub flushes: u32,
    /// Number of native windows destroyed
    pub windows_destroyed: u32,
    /// Number of sessions closed
    pub sessions_closed: u32,
}

/// Scripted display session
pub struct HeadlessBackend {
    queue: VecDeque<NativeEvent>,
    window: Option<u32>,
    next_window_id: u32,
    fail_window_creation: bool,
    connection_lost: bool,
    record: Rc<RefCell<HeadlessRecord>>,
}

impl HeadlessBackend {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            window: None,
            next_window_id: 0x0020_0001,
            fail_window_creation: false,
            connection_lost: false,
            record: Rc::new(RefCell::new(HeadlessRecord::default())),
        }
    }

    /// Create a session whose window creation is rejected
    pub fn failing_window_creation() -> Self {
        Self {
            fail_window_creation: true,
            ..Self::new()
        }
    }

    /// Shared view of the requests made so far
    ///
    /// The handle stays readable after the session itself is closed.
    pub fn record(&self) -> Rc<RefCell<HeadlessRecord>> {
        Rc::clone(&self.record)
    }

    /// Queue a native event
    pub fn push_event(&mut self, event: NativeEvent) {
        self.queue.push_back(event);
    }

    /// Queue a window-manager close request
    pub fn push_close_request(&mut self) {
        self.push_event(NativeEvent::ClientMessage {
            data0: HEADLESS_CLOSE_TOKEN,
        });
    }

    /// Make every later flush and poll fail as if the server went away
    pub fn lose_connection(&mut self) {
        self.connection_lost = true;
    }

    /// Number of queued events not yet polled
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn window(&self) -> WindowResult<u32> {
        self.window
            .ok_or_else(|| WindowError::InvalidParameter("no headless window has been created".to_string()))
    }

    fn connected(&self) -> WindowResult<()> {
        if self.connection_lost {
            Err(WindowError::Connection("headless session lost".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for HeadlessBackend {
    type WindowId = u32;

    fn screen(&self) -> usize {
        0
    }

    fn window_id(&self) -> Option<u32> {
        self.window
    }

    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<()> {
        if self.fail_window_creation {
            return Err(WindowError::CreationFailed(format!(
                "headless session rejected {}x{} window",
                config.width, config.height
            )));
        }
        self.window = Some(self.next_window_id);
        self.next_window_id += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        self.window()?;
        self.record.borrow_mut().title = Some(title.to_string());
        Ok(())
    }

    fn set_size_hints(&mut self, hints: &SizeHints) -> WindowResult<()> {
        self.window()?;
        self.record.borrow_mut().size_hints = Some(*hints);
        Ok(())
    }

    fn register_close_protocol(&mut self) -> WindowResult<u32> {
        self.window()?;
        self.record.borrow_mut().close_protocol_registered = true;
        Ok(HEADLESS_CLOSE_TOKEN)
    }

    fn select_events(&mut self) -> WindowResult<()> {
        self.window()?;
        self.record.borrow_mut().events_selected = true;
        Ok(())
    }

    fn map_window(&mut self) -> WindowResult<()> {
        self.window()?;
        self.record.borrow_mut().mapped = true;
        Ok(())
    }

    fn flush(&mut self) -> WindowResult<()> {
        self.connected()?;
        self.record.borrow_mut().flushes += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> WindowResult<()> {
        self.window()?;
        self.record.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn next_event(&mut self) -> WindowResult<Option<NativeEvent>> {
        self.connected()?;
        Ok(self.queue.pop_front())
    }

    fn destroy_window(&mut self) -> WindowResult<()> {
        if self.window.take().is_some() {
            self.record.borrow_mut().windows_destroyed += 1;
        }
        Ok(())
    }

    fn close(self) -> WindowResult<()> {
        self.record.borrow_mut().sessions_closed += 1;
        Ok(())
    }
}
