//! Keycode to keysym lookup
//!
//! The server hands out keycodes; the keyboard mapping fetched once at
//! startup turns them into keysyms. Text decoding covers Latin-1 and the
//! handful of function keys that have an ASCII meaning.

use super::event::{keysyms, Keysym, ModifierState};

/// `NoSymbol`
const NO_SYMBOL: Keysym = 0;

/// Snapshot of the server keyboard mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl Keymap {
    /// Build a keymap from a `GetKeyboardMapping` reply
    pub const fn new(min_keycode: u8, keysyms_per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    /// Keysym at `column` for `keycode`, or `NoSymbol`
    pub fn keysym(&self, keycode: u8, column: usize) -> Keysym {
        let per = usize::from(self.keysyms_per_keycode);
        if keycode < self.min_keycode || column >= per {
            return NO_SYMBOL;
        }
        let index = usize::from(keycode - self.min_keycode) * per + column;
        self.keysyms.get(index).copied().unwrap_or(NO_SYMBOL)
    }

    /// Keysym the key produces with the given modifiers
    ///
    /// Shift selects the second column; Lock does too, but only for letters.
    pub fn shifted_keysym(&self, keycode: u8, state: ModifierState) -> Keysym {
        let base = self.keysym(keycode, 0);
        let shifted = match self.keysym(keycode, 1) {
            NO_SYMBOL => base,
            sym => sym,
        };

        if state.contains(ModifierState::SHIFT) {
            shifted
        } else if state.contains(ModifierState::LOCK) && is_latin1_letter(base) {
            shifted
        } else {
            base
        }
    }

    /// Short text produced by the key, empty when it produces none
    pub fn lookup_text(&self, keycode: u8, state: ModifierState) -> String {
        keysym_to_text(self.shifted_keysym(keycode, state), state)
    }
}

fn is_latin1_letter(sym: Keysym) -> bool {
    char::from_u32(sym).is_some_and(|c| c.is_ascii_alphabetic())
        || ((0xc0..=0xfe).contains(&sym) && sym != 0xd7 && sym != 0xf7)
}

/// Decode a keysym into the text it types
pub fn keysym_to_text(sym: Keysym, state: ModifierState) -> String {
    let ch = match sym {
        0x20..=0x7e | 0xa0..=0xff => char::from_u32(sym),
        keysyms::BACKSPACE => Some('\u{8}'),
        keysyms::TAB => Some('\t'),
        keysyms::RETURN | keysyms::KP_ENTER => Some('\r'),
        keysyms::ESCAPE => Some('\u{1b}'),
        keysyms::DELETE => Some('\u{7f}'),
        keysyms::KP_0..=keysyms::KP_9 => char::from_u32(u32::from(b'0') + (sym - keysyms::KP_0)),
        _ => None,
    };

    let Some(ch) = ch else {
        return String::new();
    };

    if state.contains(ModifierState::CONTROL) {
        if let Some(control) = control_character(ch) {
            return control.to_string();
        }
    }
    ch.to_string()
}

fn control_character(ch: char) -> Option<char> {
    match ch {
        '@'..='_' | 'a'..='z' => char::from_u32(u32::from(ch) & 0x1f),
        ' ' | '2' => Some('\0'),
        '?' => Some('\u{7f}'),
        _ => None,
    }
}
