//! X11 display-server session
//!
//! Speaks the X11 protocol through `x11rb`'s pure-Rust connection. Window
//! creation is checked synchronously so that a rejected request surfaces as
//! [`WindowError::CreationFailed`] instead of an asynchronous X error later.

use x11rb::connection::Connection;
use x11rb::properties::WmSizeHints;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ChangeWindowAttributesAux, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux,
    EventMask, KeyButMask, Mapping, PropMode, Window, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT};

use crate::config::WindowConfig;
use crate::error::{WindowError, WindowResult};

use super::backend::{DisplayBackend, SizeHints};
use super::event::{KeyEvent, ModifierState, MouseButtonEvent, NativeEvent};
use super::keymap::Keymap;

/// Border width of the top-level window in pixels
const BORDER_WIDTH: u16 = 1;

/// Live connection to an X server plus the shell window created on it
pub struct X11Backend {
    conn: RustConnection,
    screen_num: usize,
    window: Option<Window>,
    keymap: Keymap,
}

impl X11Backend {
    /// Connect to the display named by `display_name`, or `$DISPLAY` when `None`
    pub fn connect(display_name: Option<&str>) -> WindowResult<Self> {
        let (conn, screen_num) = x11rb::connect(display_name)?;
        let keymap = fetch_keymap(&conn)?;

        log::debug!(
            "Connected to X server (screen {}, {} roots)",
            screen_num,
            conn.setup().roots.len()
        );

        Ok(Self {
            conn,
            screen_num,
            window: None,
            keymap,
        })
    }

    /// Native connection, for presentation layers that draw into the window
    pub const fn connection(&self) -> &RustConnection {
        &self.conn
    }

    fn window(&self) -> WindowResult<Window> {
        self.window
            .ok_or_else(|| WindowError::InvalidParameter("no X11 window has been created".to_string()))
    }

    fn intern_atom(&self, name: &str) -> WindowResult<Atom> {
        Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
    }

    fn refresh_keymap(&mut self) {
        match fetch_keymap(&self.conn) {
            Ok(keymap) => self.keymap = keymap,
            Err(e) => log::warn!("Keeping stale keyboard mapping: {}", e),
        }
    }
}

/// Whether `event` invalidates the cached keyboard mapping
fn is_keyboard_remap(event: &Event) -> bool {
    matches!(event, Event::MappingNotify(ev) if ev.request == Mapping::KEYBOARD)
}

fn key_event(keymap: &Keymap, keycode: u8, state: KeyButMask) -> KeyEvent {
    let state = ModifierState::from_bits_retain(u16::from(state));
    KeyEvent {
        keysym: keymap.keysym(keycode, 0),
        state,
        text: keymap.lookup_text(keycode, state),
    }
}

/// Reduce a protocol event to the part the window context cares about
///
/// Pointer positions are window-relative. Client messages only count when
/// they carry 32-bit data.
fn translate_event(keymap: &Keymap, event: &Event) -> NativeEvent {
    match event {
        Event::ConfigureNotify(ev) => NativeEvent::Configure {
            width: i32::from(ev.width),
            height: i32::from(ev.height),
        },
        Event::KeyPress(ev) => NativeEvent::KeyPress(key_event(keymap, ev.detail, ev.state)),
        Event::KeyRelease(ev) => NativeEvent::KeyRelease(key_event(keymap, ev.detail, ev.state)),
        Event::ButtonPress(ev) => NativeEvent::ButtonPress(MouseButtonEvent {
            x: i32::from(ev.event_x),
            y: i32::from(ev.event_y),
            button: ev.detail,
        }),
        Event::ButtonRelease(ev) => NativeEvent::ButtonRelease(MouseButtonEvent {
            x: i32::from(ev.event_x),
            y: i32::from(ev.event_y),
            button: ev.detail,
        }),
        Event::MotionNotify(ev) => NativeEvent::Motion {
            x: i32::from(ev.event_x),
            y: i32::from(ev.event_y),
        },
        Event::FocusIn(_) => NativeEvent::FocusIn,
        Event::FocusOut(_) => NativeEvent::FocusOut,
        Event::ClientMessage(ev) if ev.format == 32 => NativeEvent::ClientMessage {
            data0: ev.data.as_data32()[0],
        },
        Event::MappingNotify(_) => NativeEvent::Unmapped("MappingNotify"),
        Event::Expose(_) => NativeEvent::Unmapped("Expose"),
        Event::Error(err) => {
            log::warn!("X11 error {:?} from request {}", err.error_kind, err.major_opcode);
            NativeEvent::Unmapped("Error")
        }
        _ => NativeEvent::Unmapped("Other"),
    }
}

/// `WM_NAME` is typed `STRING`, which is Latin-1; `None` when the title
/// has characters outside it
fn latin1_title(title: &str) -> Option<Vec<u8>> {
    title.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

fn fetch_keymap(conn: &RustConnection) -> WindowResult<Keymap> {
    let setup = conn.setup();
    let (min_keycode, max_keycode) = (setup.min_keycode, setup.max_keycode);
    let count = max_keycode.saturating_sub(min_keycode).saturating_add(1);
    let reply = conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
    Ok(Keymap::new(min_keycode, reply.keysyms_per_keycode, reply.keysyms))
}

fn protocol_coordinate(value: i32, what: &str) -> WindowResult<i16> {
    i16::try_from(value).map_err(|_| WindowError::InvalidParameter(format!("{what} {value} out of range")))
}

fn protocol_dimension(value: i32, what: &str) -> WindowResult<u16> {
    u16::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| WindowError::InvalidParameter(format!("{what} {value} out of range")))
}

impl DisplayBackend for X11Backend {
    type WindowId = Window;

    fn screen(&self) -> usize {
        self.screen_num
    }

    fn window_id(&self) -> Option<Window> {
        self.window
    }

    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<()> {
        let screen = self
            .conn
            .setup()
            .roots
            .get(self.screen_num)
            .ok_or_else(|| WindowError::Connection(format!("server has no screen {}", self.screen_num)))?;
        let (root, black) = (screen.root, screen.black_pixel);

        let x = protocol_coordinate(config.x, "x")?;
        let y = protocol_coordinate(config.y, "y")?;
        let width = protocol_dimension(config.width, "width")?;
        let height = protocol_dimension(config.height, "height")?;

        let window = self.conn.generate_id()?;
        let aux = CreateWindowAux::new().background_pixel(black).border_pixel(black);

        self.conn
            .create_window(
                COPY_DEPTH_FROM_PARENT,
                window,
                root,
                x,
                y,
                width,
                height,
                BORDER_WIDTH,
                WindowClass::INPUT_OUTPUT,
                COPY_FROM_PARENT,
                &aux,
            )?
            .check()
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;

        self.window = Some(window);
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        let window = self.window()?;
        if let Some(latin1) = latin1_title(title) {
            self.conn
                .change_property8(PropMode::REPLACE, window, AtomEnum::WM_NAME, AtomEnum::STRING, &latin1)?;
        } else {
            log::debug!("Title {:?} is not Latin-1, leaving WM_NAME unset", title);
        }

        // EWMH title carries the full UTF-8 text
        let net_wm_name = self.intern_atom("_NET_WM_NAME")?;
        let utf8_string = self.intern_atom("UTF8_STRING")?;
        self.conn
            .change_property8(PropMode::REPLACE, window, net_wm_name, utf8_string, title.as_bytes())?;
        Ok(())
    }

    fn set_size_hints(&mut self, hints: &SizeHints) -> WindowResult<()> {
        let window = self.window()?;
        let mut wm_hints = WmSizeHints::new();
        wm_hints.min_size = hints.min_size;
        wm_hints.max_size = hints.max_size;
        wm_hints.set_normal_hints(&self.conn, window)?;
        Ok(())
    }

    fn register_close_protocol(&mut self) -> WindowResult<u32> {
        let window = self.window()?;
        let wm_protocols = self.intern_atom("WM_PROTOCOLS")?;
        let wm_delete_window = self.intern_atom("WM_DELETE_WINDOW")?;
        self.conn
            .change_property32(PropMode::REPLACE, window, wm_protocols, AtomEnum::ATOM, &[wm_delete_window])?;
        Ok(wm_delete_window)
    }

    fn select_events(&mut self) -> WindowResult<()> {
        let window = self.window()?;
        let mask = EventMask::EXPOSURE
            | EventMask::STRUCTURE_NOTIFY
            | EventMask::KEY_PRESS
            | EventMask::KEY_RELEASE
            | EventMask::BUTTON_PRESS
            | EventMask::BUTTON_RELEASE
            | EventMask::POINTER_MOTION
            | EventMask::FOCUS_CHANGE;
        self.conn
            .change_window_attributes(window, &ChangeWindowAttributesAux::new().event_mask(mask))?;
        Ok(())
    }

    fn map_window(&mut self) -> WindowResult<()> {
        let window = self.window()?;
        self.conn.map_window(window)?;
        Ok(())
    }

    fn flush(&mut self) -> WindowResult<()> {
        self.conn.flush()?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> WindowResult<()> {
        let window = self.window()?;
        self.conn
            .configure_window(window, &ConfigureWindowAux::new().width(width).height(height))?;
        Ok(())
    }

    fn next_event(&mut self) -> WindowResult<Option<NativeEvent>> {
        let Some(event) = self.conn.poll_for_event()? else {
            return Ok(None);
        };
        if is_keyboard_remap(&event) {
            self.refresh_keymap();
        }
        Ok(Some(translate_event(&self.keymap, &event)))
    }

    fn destroy_window(&mut self) -> WindowResult<()> {
        if let Some(window) = self.window.take() {
            self.conn.destroy_window(window)?;
        }
        Ok(())
    }

    fn close(self) -> WindowResult<()> {
        self.conn.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::protocol::xproto::{
        ButtonPressEvent, ClientMessageEvent, ConfigureNotifyEvent, ExposeEvent, FocusInEvent, KeyPressEvent,
        MappingNotifyEvent, MotionNotifyEvent,
    };
    use x11rb::protocol::ErrorKind;
    use x11rb::x11_utils::X11Error;

    use crate::window::event::keysyms;

    // keycode 10: a/A
    fn test_keymap() -> Keymap {
        Keymap::new(10, 2, vec![0x61, 0x41])
    }

    fn translate(event: &Event) -> NativeEvent {
        translate_event(&test_keymap(), event)
    }

    #[test]
    fn test_configure_notify_reports_new_size() {
        let event = Event::ConfigureNotify(ConfigureNotifyEvent {
            x: 15,
            y: 25,
            width: 1024,
            height: 768,
            ..Default::default()
        });
        assert_eq!(translate(&event), NativeEvent::Configure { width: 1024, height: 768 });
    }

    #[test]
    fn test_key_events_carry_keysym_and_text() {
        let press = KeyPressEvent {
            detail: 10,
            state: KeyButMask::SHIFT,
            ..Default::default()
        };
        let expected = KeyEvent {
            keysym: 0x61,
            state: ModifierState::SHIFT,
            text: "A".to_string(),
        };

        assert_eq!(translate(&Event::KeyPress(press)), NativeEvent::KeyPress(expected.clone()));
        assert_eq!(translate(&Event::KeyRelease(press)), NativeEvent::KeyRelease(expected));
    }

    #[test]
    fn test_pointer_events_use_window_coordinates() {
        let button = ButtonPressEvent {
            detail: 1,
            root_x: 500,
            root_y: 400,
            event_x: 12,
            event_y: 34,
            state: KeyButMask::BUTTON1,
            ..Default::default()
        };
        let motion = MotionNotifyEvent {
            root_x: 600,
            root_y: 450,
            event_x: -3,
            event_y: 77,
            ..Default::default()
        };
        let mouse = MouseButtonEvent { x: 12, y: 34, button: 1 };

        assert_eq!(translate(&Event::ButtonPress(button)), NativeEvent::ButtonPress(mouse));
        assert_eq!(translate(&Event::ButtonRelease(button)), NativeEvent::ButtonRelease(mouse));
        assert_eq!(translate(&Event::MotionNotify(motion)), NativeEvent::Motion { x: -3, y: 77 });
    }

    #[test]
    fn test_focus_events() {
        let focus = FocusInEvent::default();
        assert_eq!(translate(&Event::FocusIn(focus)), NativeEvent::FocusIn);
        assert_eq!(translate(&Event::FocusOut(focus)), NativeEvent::FocusOut);
    }

    #[test]
    fn test_client_message_needs_32_bit_format() {
        let close = ClientMessageEvent::new(32, 1, 42u32, [0x1d1_u32, 7, 0, 0, 0]);
        assert_eq!(
            translate(&Event::ClientMessage(close)),
            NativeEvent::ClientMessage { data0: 0x1d1 }
        );

        let bytes = ClientMessageEvent::new(8, 1, 42u32, [0xd1_u8; 20]);
        assert_eq!(translate(&Event::ClientMessage(bytes)), NativeEvent::Unmapped("Other"));
    }

    #[test]
    fn test_only_keyboard_mapping_changes_refresh_keymap() {
        let keyboard = Event::MappingNotify(MappingNotifyEvent {
            request: Mapping::KEYBOARD,
            ..Default::default()
        });
        let pointer = Event::MappingNotify(MappingNotifyEvent {
            request: Mapping::POINTER,
            ..Default::default()
        });

        assert!(is_keyboard_remap(&keyboard));
        assert!(!is_keyboard_remap(&pointer));
        assert!(!is_keyboard_remap(&Event::Expose(ExposeEvent::default())));
        assert_eq!(translate(&keyboard), NativeEvent::Unmapped("MappingNotify"));
    }

    #[test]
    fn test_expose_and_errors_are_unmapped() {
        let error = X11Error {
            error_kind: ErrorKind::Window,
            error_code: 3,
            sequence: 9,
            bad_value: 0x0040_0001,
            minor_opcode: 0,
            major_opcode: 8,
            extension_name: None,
            request_name: Some("MapWindow"),
        };

        assert_eq!(translate(&Event::Expose(ExposeEvent::default())), NativeEvent::Unmapped("Expose"));
        assert_eq!(translate(&Event::Error(error)), NativeEvent::Unmapped("Error"));
    }

    #[test]
    fn test_remapped_keymap_changes_translation() {
        let press = Event::KeyPress(KeyPressEvent {
            detail: 10,
            ..Default::default()
        });
        let remapped = Keymap::new(10, 1, vec![keysyms::ESCAPE]);

        match translate_event(&remapped, &press) {
            NativeEvent::KeyPress(key) => assert_eq!(key.keysym, keysyms::ESCAPE),
            other => panic!("expected a key press, got {other:?}"),
        }
    }

    #[test]
    fn test_wm_name_only_takes_latin1_titles() {
        assert_eq!(latin1_title("FEX"), Some(b"FEX".to_vec()));
        assert_eq!(latin1_title("Café"), Some(vec![b'C', b'a', b'f', 0xe9]));
        assert_eq!(latin1_title("窓"), None);
        assert_eq!(latin1_title(""), Some(Vec::new()));
    }

    #[test]
    fn test_protocol_ranges() {
        assert_eq!(protocol_coordinate(-20, "x"), Ok(-20));
        assert!(protocol_coordinate(40_000, "x").is_err());
        assert_eq!(protocol_dimension(800, "width"), Ok(800));
        assert!(protocol_dimension(0, "width").is_err());
        assert!(protocol_dimension(-1, "height").is_err());
        assert!(protocol_dimension(70_000, "height").is_err());
    }

    #[test]
    fn test_connecting_to_missing_display_is_connection_error() {
        let result = X11Backend::connect(Some(":4321"));
        assert!(matches!(result, Err(WindowError::Connection(_))));
    }
}
