//! The shell's main loop
//!
//! Drains every queued window event once per frame, reacts to the few that
//! matter to the shell itself, then sleeps out the rest of the frame.

use fex_window::config::ShellConfig;
use fex_window::foundation::time::FrameTimer;
use fex_window::window::{keysyms, DisplayBackend, WindowContext, WindowEvent, X11Backend};
use fex_window::WindowResult;

pub struct ShellApp<B: DisplayBackend = X11Backend> {
    window: WindowContext<B>,
    frame: FrameTimer,
}

impl ShellApp<X11Backend> {
    /// Open the shell window on the default X display
    pub fn new(config: &ShellConfig) -> WindowResult<Self> {
        let window = WindowContext::init(&config.window)?;
        Ok(Self::with_window(window, config.frame.target_fps))
    }
}

impl<B: DisplayBackend> ShellApp<B> {
    pub fn with_window(window: WindowContext<B>, target_fps: u32) -> Self {
        Self {
            window,
            frame: FrameTimer::new(target_fps),
        }
    }

    /// Run until the window asks to close, then tear it down
    pub fn run(&mut self) -> WindowResult<()> {
        log::info!("Entering main loop at {:?} per frame", self.frame.frame_budget());

        while !self.window.should_close() {
            self.drain_events()?;
            self.frame.wait_for_next_frame();
        }

        log::info!("Leaving main loop after {} frames", self.frame.frame_count());
        self.window.destroy();
        Ok(())
    }

    fn drain_events(&mut self) -> WindowResult<()> {
        loop {
            let event = self.window.poll_event()?;
            if event.is_none() {
                return Ok(());
            }
            self.handle_event(&event);
        }
    }

    fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Close => log::info!("Close event received"),
            WindowEvent::KeyPress(key) if key.keysym == keysyms::ESCAPE => {
                log::info!("Escape key pressed, closing window");
                self.window.request_close();
            }
            WindowEvent::Resize { width, height } => {
                log::info!("Window resized to: {}x{}", width, height);
            }
            _ => {}
        }
    }
}
