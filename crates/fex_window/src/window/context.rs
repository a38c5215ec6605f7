//! The shell window
//!
//! [`WindowContext`] owns one display session and the single window created
//! on it. It is driven entirely by the caller:
//!
//! ```text
//! init ──► poll_event / resize (repeated) ──► destroy
//! ```
//!
//! Nothing here sleeps or blocks on the event queue. The caller drains
//! events until [`WindowEvent::None`] comes back, paces its own frames, and
//! stops once [`WindowContext::should_close`] turns true.

use crate::config::{WindowConfig, WINDOW_MIN_HEIGHT, WINDOW_MIN_WIDTH};
use crate::error::{WindowError, WindowResult};

use super::backend::{DisplayBackend, SizeHints};
use super::event::{NativeEvent, WindowEvent};
use super::x11::X11Backend;

/// A live top-level window and the session it belongs to
///
/// Destroying the context (explicitly or by dropping it) releases the
/// native window and the connection exactly once. A destroyed context keeps
/// answering the state accessors with shutdown-friendly values and refuses
/// every native operation with [`WindowError::InvalidParameter`].
pub struct WindowContext<B: DisplayBackend = X11Backend> {
    backend: Option<B>,
    screen: usize,
    config: WindowConfig,
    close_token: u32,
    should_close: bool,
    is_focused: bool,
}

impl WindowContext<X11Backend> {
    /// Connect to the default X display and open a window described by `config`
    ///
    /// Geometry is validated by [`WindowContext::init_with`] before any
    /// window request reaches the server.
    pub fn init(config: &WindowConfig) -> WindowResult<Self> {
        let backend =
            X11Backend::connect(None).inspect_err(|e| log::error!("Failed to open X display: {}", e))?;
        Self::init_with(backend, config)
    }
}

impl<B: DisplayBackend> WindowContext<B> {
    /// Open a window described by `config` on an already connected session
    ///
    /// If any step fails the session is closed before the error is returned.
    pub fn init_with(mut backend: B, config: &WindowConfig) -> WindowResult<Self> {
        validate_geometry(config)?;

        let close_token = match open_window(&mut backend, config) {
            Ok(token) => token,
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                release(backend);
                return Err(e);
            }
        };

        log::info!(
            "Window initialized: {} ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(Self {
            screen: backend.screen(),
            backend: Some(backend),
            config: config.clone(),
            close_token,
            should_close: false,
            is_focused: true,
        })
    }

    /// Dequeue and translate at most one native event
    ///
    /// Returns [`WindowEvent::None`] when nothing is queued; that is the
    /// normal "nothing happened this tick" answer, not an error.
    pub fn poll_event(&mut self) -> WindowResult<WindowEvent> {
        let Some(backend) = self.backend.as_mut() else {
            log::error!("Invalid parameter: poll_event on a destroyed window");
            return Err(destroyed());
        };

        let event = match backend.next_event()? {
            Some(native) => self.translate(native),
            None => WindowEvent::None,
        };
        Ok(event)
    }

    fn translate(&mut self, native: NativeEvent) -> WindowEvent {
        match native {
            NativeEvent::Configure { width, height } => {
                self.config.width = width;
                self.config.height = height;
                log::debug!("Window resized: {}x{}", width, height);
                WindowEvent::Resize { width, height }
            }
            NativeEvent::KeyPress(key) => {
                log::debug!("Key pressed: {:#x}", key.keysym);
                WindowEvent::KeyPress(key)
            }
            NativeEvent::KeyRelease(key) => {
                log::debug!("Key released: {:#x}", key.keysym);
                WindowEvent::KeyRelease(key)
            }
            NativeEvent::ButtonPress(mouse) => {
                log::debug!("Mouse button pressed: {} at ({}, {})", mouse.button, mouse.x, mouse.y);
                WindowEvent::MousePress(mouse)
            }
            NativeEvent::ButtonRelease(mouse) => {
                log::debug!("Mouse button released: {} at ({}, {})", mouse.button, mouse.x, mouse.y);
                WindowEvent::MouseRelease(mouse)
            }
            NativeEvent::Motion { x, y } => {
                log::trace!("Mouse moved to: ({}, {})", x, y);
                WindowEvent::MouseMove { x, y }
            }
            NativeEvent::FocusIn => {
                self.is_focused = true;
                log::debug!("Window gained focus");
                WindowEvent::FocusGained
            }
            NativeEvent::FocusOut => {
                self.is_focused = false;
                log::debug!("Window lost focus");
                WindowEvent::FocusLost
            }
            NativeEvent::ClientMessage { data0 } if data0 == self.close_token => {
                self.should_close = true;
                log::info!("Window close requested");
                WindowEvent::Close
            }
            NativeEvent::ClientMessage { data0 } => {
                log::trace!("Ignoring client message {:#x}", data0);
                WindowEvent::None
            }
            NativeEvent::Unmapped(name) => {
                log::trace!("Ignoring native event {}", name);
                WindowEvent::None
            }
        }
    }

    /// Resize the window
    ///
    /// Sizes below the platform floor are rejected without touching the
    /// window. An accepted size is cached once the request has been flushed,
    /// before the server confirms it with a structure change event; if the
    /// flush fails the cached size keeps its previous value.
    pub fn resize(&mut self, width: i32, height: i32) -> WindowResult<()> {
        let Some(backend) = self.backend.as_mut() else {
            log::error!("Invalid parameter: resize on a destroyed window");
            return Err(destroyed());
        };

        if width < WINDOW_MIN_WIDTH || height < WINDOW_MIN_HEIGHT {
            log::error!(
                "Invalid window size: {}x{} (min: {}x{})",
                width,
                height,
                WINDOW_MIN_WIDTH,
                WINDOW_MIN_HEIGHT
            );
            return Err(WindowError::InvalidParameter(format!(
                "window size {width}x{height} below minimum {WINDOW_MIN_WIDTH}x{WINDOW_MIN_HEIGHT}"
            )));
        }
        let (Ok(native_width), Ok(native_height)) = (u16::try_from(width), u16::try_from(height)) else {
            log::error!("Invalid window size: {}x{} (max: {}x{})", width, height, u16::MAX, u16::MAX);
            return Err(WindowError::InvalidParameter(format!(
                "window size {width}x{height} exceeds protocol maximum"
            )));
        };

        backend.resize(u32::from(native_width), u32::from(native_height))?;
        backend
            .flush()
            .inspect_err(|e| log::error!("Failed to send resize to {}x{}: {}", width, height, e))?;
        self.config.width = width;
        self.config.height = height;

        log::info!("Window resized to: {}x{}", width, height);
        Ok(())
    }

    /// Flush pending requests so the server shows the latest frame
    pub fn present(&mut self) -> WindowResult<()> {
        match self.backend.as_mut() {
            Some(backend) => backend.flush(),
            None => Ok(()),
        }
    }

    /// Release the native window and the session
    ///
    /// Safe to call any number of times; only the first call does anything.
    /// Teardown errors are logged, never returned.
    pub fn destroy(&mut self) {
        let Some(mut backend) = self.backend.take() else {
            return;
        };

        if backend.window_id().is_some() {
            match backend.destroy_window() {
                Ok(()) => log::info!("Window destroyed"),
                Err(e) => log::warn!("Error while destroying window: {}", e),
            }
        }
        match backend.close() {
            Ok(()) => log::info!("Display connection closed"),
            Err(e) => log::warn!("Error while closing display connection: {}", e),
        }

        self.is_focused = false;
    }

    /// Whether the application should stop its main loop
    ///
    /// Once true it stays true. A destroyed window always reports true.
    pub const fn should_close(&self) -> bool {
        self.should_close || self.backend.is_none()
    }

    /// Whether the window has input focus, per the latest focus event
    ///
    /// A destroyed window never has focus.
    pub const fn is_focused(&self) -> bool {
        self.is_focused && self.backend.is_some()
    }

    /// Ask the main loop to stop, e.g. from a key binding
    pub fn request_close(&mut self) {
        if !self.should_close {
            log::info!("Window close requested by application");
        }
        self.should_close = true;
    }

    /// Current window configuration, with the latest known size
    pub const fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Latest known size as `(width, height)`
    pub const fn size(&self) -> (i32, i32) {
        (self.config.width, self.config.height)
    }

    /// Screen the window lives on
    pub const fn screen(&self) -> usize {
        self.screen
    }

    /// Token identifying the window manager's close request
    pub const fn close_token(&self) -> u32 {
        self.close_token
    }

    /// Native window handle, `None` once destroyed
    pub fn window_id(&self) -> Option<B::WindowId> {
        self.backend.as_ref().and_then(B::window_id)
    }

    /// Native session, `None` once destroyed
    pub const fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Mutable native session, `None` once destroyed
    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }
}

impl<B: DisplayBackend> Drop for WindowContext<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<B: DisplayBackend> std::fmt::Debug for WindowContext<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowContext")
            .field("window", &self.window_id())
            .field("screen", &self.screen)
            .field("config", &self.config)
            .field("close_token", &self.close_token)
            .field("should_close", &self.should_close())
            .field("is_focused", &self.is_focused())
            .finish()
    }
}

fn open_window<B: DisplayBackend>(backend: &mut B, config: &WindowConfig) -> WindowResult<u32> {
    backend.create_window(config)?;
    backend.set_title(&config.title)?;
    backend.set_size_hints(&SizeHints::for_config(config))?;
    let close_token = backend.register_close_protocol()?;
    backend.select_events()?;
    backend.map_window()?;
    backend.flush()?;
    Ok(close_token)
}

fn release<B: DisplayBackend>(mut backend: B) {
    if let Err(e) = backend.destroy_window() {
        log::warn!("Error while destroying partially created window: {}", e);
    }
    if let Err(e) = backend.close() {
        log::warn!("Error while closing display connection: {}", e);
    }
}

fn validate_geometry(config: &WindowConfig) -> WindowResult<()> {
    let size_ok = (1..=i32::from(u16::MAX)).contains(&config.width)
        && (1..=i32::from(u16::MAX)).contains(&config.height);
    let position_ok = i16::try_from(config.x).is_ok() && i16::try_from(config.y).is_ok();

    if size_ok && position_ok {
        Ok(())
    } else {
        log::error!(
            "Invalid window geometry: {}x{} at ({}, {})",
            config.width,
            config.height,
            config.x,
            config.y
        );
        Err(WindowError::InvalidParameter(format!(
            "window geometry {}x{} at ({}, {}) is not representable",
            config.width, config.height, config.x, config.y
        )))
    }
}

fn destroyed() -> WindowError {
    WindowError::InvalidParameter("window has been destroyed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::event::{KeyEvent, ModifierState, MouseButtonEvent};
    use crate::window::headless::{HeadlessBackend, HEADLESS_CLOSE_TOKEN};

    fn headless_window(config: &WindowConfig) -> WindowContext<HeadlessBackend> {
        WindowContext::init_with(HeadlessBackend::new(), config).unwrap()
    }

    fn push(ctx: &mut WindowContext<HeadlessBackend>, event: NativeEvent) {
        ctx.backend_mut().unwrap().push_event(event);
    }

    #[test]
    fn test_init_runs_full_sequence() {
        let backend = HeadlessBackend::new();
        let record = backend.record();
        let ctx = WindowContext::init_with(backend, &WindowConfig::new("Test", 800, 600)).unwrap();

        assert!(!ctx.should_close());
        assert!(ctx.is_focused());
        assert_eq!(ctx.close_token(), HEADLESS_CLOSE_TOKEN);
        assert!(ctx.window_id().is_some());

        let record = record.borrow();
        assert_eq!(record.title.as_deref(), Some("Test"));
        assert!(record.close_protocol_registered);
        assert!(record.events_selected);
        assert!(record.mapped);
        assert!(record.flushes >= 1);
    }

    #[test]
    fn test_init_rejects_unrepresentable_geometry() {
        for config in [
            WindowConfig::new("Test", 0, 600),
            WindowConfig::new("Test", 800, -5),
            WindowConfig::new("Test", 70_000, 600),
            WindowConfig::new("Test", 800, 600).with_position(40_000, 0),
        ] {
            let result = WindowContext::init_with(HeadlessBackend::new(), &config);
            assert!(matches!(result, Err(WindowError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_failed_creation_closes_session() {
        let backend = HeadlessBackend::failing_window_creation();
        let record = backend.record();

        let result = WindowContext::init_with(backend, &WindowConfig::default());
        assert!(matches!(result, Err(WindowError::CreationFailed(_))));
        assert_eq!(record.borrow().sessions_closed, 1);
        assert_eq!(record.borrow().windows_destroyed, 0);
    }

    #[test]
    fn test_title_is_owned_by_context() {
        let mut config = WindowConfig::new("Original", 800, 600);
        let ctx = headless_window(&config);
        config.title.push_str(" changed");
        assert_eq!(ctx.config().title, "Original");
    }

    #[test]
    fn test_empty_queue_returns_none_and_keeps_flags() {
        let mut ctx = headless_window(&WindowConfig::default());
        assert_eq!(ctx.poll_event(), Ok(WindowEvent::None));
        assert!(!ctx.should_close());
        assert!(ctx.is_focused());
    }

    #[test]
    fn test_poll_consumes_exactly_one_event() {
        let mut ctx = headless_window(&WindowConfig::default());
        push(&mut ctx, NativeEvent::FocusOut);
        push(&mut ctx, NativeEvent::FocusIn);

        assert_eq!(ctx.poll_event(), Ok(WindowEvent::FocusLost));
        assert_eq!(ctx.backend().unwrap().pending(), 1);
    }

    #[test]
    fn test_configure_updates_cached_size() {
        let mut ctx = headless_window(&WindowConfig::default());
        push(&mut ctx, NativeEvent::Configure { width: 1280, height: 720 });

        assert_eq!(ctx.poll_event(), Ok(WindowEvent::Resize { width: 1280, height: 720 }));
        assert_eq!(ctx.size(), (1280, 720));
    }

    #[test]
    fn test_input_events_pass_through() {
        let mut ctx = headless_window(&WindowConfig::default());
        let key = KeyEvent {
            keysym: 0x61,
            state: ModifierState::SHIFT,
            text: "A".to_string(),
        };
        let mouse = MouseButtonEvent { x: 10, y: 20, button: 3 };
        push(&mut ctx, NativeEvent::KeyPress(key.clone()));
        push(&mut ctx, NativeEvent::KeyRelease(key.clone()));
        push(&mut ctx, NativeEvent::ButtonPress(mouse));
        push(&mut ctx, NativeEvent::ButtonRelease(mouse));
        push(&mut ctx, NativeEvent::Motion { x: 5, y: 6 });

        assert_eq!(ctx.poll_event(), Ok(WindowEvent::KeyPress(key.clone())));
        assert_eq!(ctx.poll_event(), Ok(WindowEvent::KeyRelease(key)));
        assert_eq!(ctx.poll_event(), Ok(WindowEvent::MousePress(mouse)));
        assert_eq!(ctx.poll_event(), Ok(WindowEvent::MouseRelease(mouse)));
        assert_eq!(ctx.poll_event(), Ok(WindowEvent::MouseMove { x: 5, y: 6 }));
        assert!(ctx.is_focused());
        assert!(!ctx.should_close());
    }

    #[test]
    fn test_foreign_client_message_is_ignored() {
        let mut ctx = headless_window(&WindowConfig::default());
        push(&mut ctx, NativeEvent::ClientMessage { data0: HEADLESS_CLOSE_TOKEN + 1 });
        push(&mut ctx, NativeEvent::Unmapped("Expose"));

        assert_eq!(ctx.poll_event(), Ok(WindowEvent::None));
        assert_eq!(ctx.poll_event(), Ok(WindowEvent::None));
        assert!(!ctx.should_close());
    }

    #[test]
    fn test_close_message_sets_should_close() {
        let mut ctx = headless_window(&WindowConfig::default());
        ctx.backend_mut().unwrap().push_close_request();

        assert_eq!(ctx.poll_event(), Ok(WindowEvent::Close));
        assert!(ctx.should_close());
    }

    #[test]
    fn test_request_close_is_sticky() {
        let mut ctx = headless_window(&WindowConfig::default());
        ctx.request_close();
        push(&mut ctx, NativeEvent::FocusIn);
        push(&mut ctx, NativeEvent::Configure { width: 900, height: 700 });

        ctx.poll_event().unwrap();
        ctx.poll_event().unwrap();
        assert!(ctx.should_close());
    }

    #[test]
    fn test_resize_below_floor_is_rejected() {
        let backend = HeadlessBackend::new();
        let record = backend.record();
        let mut ctx = WindowContext::init_with(backend, &WindowConfig::default()).unwrap();

        for (width, height) in [(WINDOW_MIN_WIDTH - 1, 600), (800, WINDOW_MIN_HEIGHT - 1), (0, 0)] {
            let result = ctx.resize(width, height);
            assert!(matches!(result, Err(WindowError::InvalidParameter(_))));
        }
        assert_eq!(ctx.size(), (800, 600));
        assert!(record.borrow().resizes.is_empty());
    }

    #[test]
    fn test_resize_updates_cache_immediately() {
        let backend = HeadlessBackend::new();
        let record = backend.record();
        let mut ctx = WindowContext::init_with(backend, &WindowConfig::default()).unwrap();
        let flushes_before = record.borrow().flushes;

        ctx.resize(WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT).unwrap();
        assert_eq!(ctx.size(), (WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT));
        assert_eq!(record.borrow().resizes, vec![(400, 300)]);
        assert_eq!(record.borrow().flushes, flushes_before + 1);
    }

    #[test]
    fn test_failed_resize_flush_keeps_cached_size() {
        let mut ctx = headless_window(&WindowConfig::default());
        ctx.backend_mut().unwrap().lose_connection();

        assert!(matches!(ctx.resize(1024, 768), Err(WindowError::Connection(_))));
        assert_eq!(ctx.size(), (800, 600));
    }

    #[test]
    fn test_resize_above_protocol_limit_is_rejected() {
        let mut ctx = headless_window(&WindowConfig::default());
        assert!(matches!(ctx.resize(70_000, 600), Err(WindowError::InvalidParameter(_))));
        assert_eq!(ctx.size(), (800, 600));
    }

    #[test]
    fn test_destroyed_context_is_fail_safe() {
        let mut ctx = headless_window(&WindowConfig::default());
        ctx.destroy();

        assert!(ctx.should_close());
        assert!(!ctx.is_focused());
        assert!(ctx.window_id().is_none());
        assert!(matches!(ctx.poll_event(), Err(WindowError::InvalidParameter(_))));
        assert!(matches!(ctx.resize(800, 600), Err(WindowError::InvalidParameter(_))));
        assert_eq!(ctx.present(), Ok(()));
    }

    #[test]
    fn test_drop_releases_once() {
        let backend = HeadlessBackend::new();
        let record = backend.record();
        {
            let mut ctx = WindowContext::init_with(backend, &WindowConfig::default()).unwrap();
            ctx.destroy();
        }
        assert_eq!(record.borrow().windows_destroyed, 1);
        assert_eq!(record.borrow().sessions_closed, 1);
    }
}
