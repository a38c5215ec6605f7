//! Window event model
//!
//! Two layers of events live here. [`NativeEvent`] is what a
//! [`DisplayBackend`](super::DisplayBackend) hands over after dequeuing one
//! event from the display server. [`WindowEvent`] is what applications see
//! after the window context has translated it.

use bitflags::bitflags;

/// X11 keysym value
pub type Keysym = u32;

/// Keysym values applications commonly compare against
pub mod keysyms {
    use super::Keysym;

    /// Backspace
    pub const BACKSPACE: Keysym = 0xff08;
    /// Tab
    pub const TAB: Keysym = 0xff09;
    /// Return / Enter
    pub const RETURN: Keysym = 0xff0d;
    /// Escape
    pub const ESCAPE: Keysym = 0xff1b;
    /// Delete
    pub const DELETE: Keysym = 0xffff;
    /// Keypad Enter
    pub const KP_ENTER: Keysym = 0xff8d;
    /// Keypad 0 (keypad 1-9 follow consecutively)
    pub const KP_0: Keysym = 0xffb0;
    /// Keypad 9
    pub const KP_9: Keysym = 0xffb9;
    /// Left arrow
    pub const LEFT: Keysym = 0xff51;
    /// Up arrow
    pub const UP: Keysym = 0xff52;
    /// Right arrow
    pub const RIGHT: Keysym = 0xff53;
    /// Down arrow
    pub const DOWN: Keysym = 0xff54;
    /// Space
    pub const SPACE: Keysym = 0x0020;
    /// Lowercase `q`
    pub const LOWER_Q: Keysym = 0x0071;
}

bitflags! {
    /// Modifier and pointer button state carried by key and button events
    ///
    /// Bit layout follows the X11 `KeyButMask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierState: u16 {
        /// Shift
        const SHIFT = 1 << 0;
        /// Caps Lock
        const LOCK = 1 << 1;
        /// Control
        const CONTROL = 1 << 2;
        /// Mod1 (usually Alt)
        const MOD1 = 1 << 3;
        /// Mod2 (usually Num Lock)
        const MOD2 = 1 << 4;
        /// Mod3
        const MOD3 = 1 << 5;
        /// Mod4 (usually Super)
        const MOD4 = 1 << 6;
        /// Mod5
        const MOD5 = 1 << 7;
        /// Pointer button 1 held
        const BUTTON1 = 1 << 8;
        /// Pointer button 2 held
        const BUTTON2 = 1 << 9;
        /// Pointer button 3 held
        const BUTTON3 = 1 << 10;
        /// Pointer button 4 held
        const BUTTON4 = 1 << 11;
        /// Pointer button 5 held
        const BUTTON5 = 1 << 12;
    }
}

/// Payload of key press and release events
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// Unshifted keysym of the key
    pub keysym: Keysym,
    /// Modifier state at the time of the event
    pub state: ModifierState,
    /// Short text the key produces, empty for keys without text
    pub text: String,
}

/// Payload of pointer button press and release events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtonEvent {
    /// Pointer x relative to the window
    pub x: i32,
    /// Pointer y relative to the window
    pub y: i32,
    /// X11 button number (1 left, 2 middle, 3 right, 4/5 wheel)
    pub button: u8,
}

/// Application-level window events
///
/// Exactly one variant, [`WindowEvent::None`], means that nothing was
/// queued when the window was polled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WindowEvent {
    /// No event was available this poll
    #[default]
    None,
    /// The window manager asked the window to close
    Close,
    /// The window gained input focus
    FocusGained,
    /// The window lost input focus
    FocusLost,
    /// The window was resized or reconfigured
    Resize {
        /// New width in pixels
        width: i32,
        /// New height in pixels
        height: i32,
    },
    /// A key was pressed
    KeyPress(KeyEvent),
    /// A key was released
    KeyRelease(KeyEvent),
    /// A pointer button was pressed
    MousePress(MouseButtonEvent),
    /// A pointer button was released
    MouseRelease(MouseButtonEvent),
    /// The pointer moved inside the window
    MouseMove {
        /// Pointer x relative to the window
        x: i32,
        /// Pointer y relative to the window
        y: i32,
    },
}

/// Discriminant of a [`WindowEvent`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    /// See [`WindowEvent::None`]
    None,
    /// See [`WindowEvent::Close`]
    Close,
    /// See [`WindowEvent::FocusGained`]
    FocusGained,
    /// See [`WindowEvent::FocusLost`]
    FocusLost,
    /// See [`WindowEvent::Resize`]
    Resize,
    /// See [`WindowEvent::KeyPress`]
    KeyPress,
    /// See [`WindowEvent::KeyRelease`]
    KeyRelease,
    /// See [`WindowEvent::MousePress`]
    MousePress,
    /// See [`WindowEvent::MouseRelease`]
    MouseRelease,
    /// See [`WindowEvent::MouseMove`]
    MouseMove,
}

impl WindowEvent {
    /// Get the kind of this event
    pub const fn kind(&self) -> WindowEventKind {
        match self {
            Self::None => WindowEventKind::None,
            Self::Close => WindowEventKind::Close,
            Self::FocusGained => WindowEventKind::FocusGained,
            Self::FocusLost => WindowEventKind::FocusLost,
            Self::Resize { .. } => WindowEventKind::Resize,
            Self::KeyPress(_) => WindowEventKind::KeyPress,
            Self::KeyRelease(_) => WindowEventKind::KeyRelease,
            Self::MousePress(_) => WindowEventKind::MousePress,
            Self::MouseRelease(_) => WindowEventKind::MouseRelease,
            Self::MouseMove { .. } => WindowEventKind::MouseMove,
        }
    }

    /// Whether this is the "nothing happened" event
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One event as dequeued from the display server
///
/// Backends decode their wire events into this form; the window context
/// decides what each one means for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    /// Structure change (ConfigureNotify)
    Configure {
        /// Width reported by the server
        width: i32,
        /// Height reported by the server
        height: i32,
    },
    /// Key down
    KeyPress(KeyEvent),
    /// Key up
    KeyRelease(KeyEvent),
    /// Pointer button down
    ButtonPress(MouseButtonEvent),
    /// Pointer button up
    ButtonRelease(MouseButtonEvent),
    /// Pointer motion
    Motion {
        /// Pointer x relative to the window
        x: i32,
        /// Pointer y relative to the window
        y: i32,
    },
    /// Focus gained
    FocusIn,
    /// Focus lost
    FocusOut,
    /// Client message; `data0` is the first 32-bit data word
    ClientMessage {
        /// First 32-bit data word (the protocol atom for WM_PROTOCOLS messages)
        data0: u32,
    },
    /// Any event the shell does not translate
    Unmapped(&'static str),
}
