//! Key code definitions and key event handling

use std::fmt;

/// Key symbol (keysym) values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keysym(pub u32);

impl Keysym {
    // Common key symbols (XKB keysym values)
    pub const BACKSPACE: Keysym = Keysym(0xff08);
    pub const TAB: Keysym = Keysym(0xff09);
    pub const RETURN: Keysym = Keysym(0xff0d);
    pub const KP_ENTER: Keysym = Keysym(0xff8d);
    pub const ESCAPE: Keysym = Keysym(0xff1b);

    // Cursor movement
    pub const LEFT: Keysym = Keysym(0xff51);
    pub const UP: Keysym = Keysym(0xff52);
    pub const RIGHT: Keysym = Keysym(0xff53);
    pub const DOWN: Keysym = Keysym(0xff54);
    pub const PAGE_UP: Keysym = Keysym(0xff55);
    pub const PAGE_DOWN: Keysym = Keysym(0xff56);

    // Modifiers
    pub const SHIFT_L: Keysym = Keysym(0xffe1);
    pub const SHIFT_R: Keysym = Keysym(0xffe2);
    pub const CONTROL_L: Keysym = Keysym(0xffe3);
    pub const CONTROL_R: Keysym = Keysym(0xffe4);
    pub const ALT_L: Keysym = Keysym(0xffe9);
    pub const ALT_R: Keysym = Keysym(0xffea);
    pub const META_L: Keysym = Keysym(0xffe7);
    pub const META_R: Keysym = Keysym(0xffe8);
    pub const SUPER_L: Keysym = Keysym(0xffeb);
    pub const SUPER_R: Keysym = Keysym(0xffec);
    pub const HYPER_L: Keysym = Keysym(0xffed);
    pub const HYPER_R: Keysym = Keysym(0xffee);

    // Space and punctuation
    pub const SPACE: Keysym = Keysym(0x0020);
    pub const PERIOD: Keysym = Keysym(0x002e);

    // Numbers
    pub const KEY_0: Keysym = Keysym(0x0030);
    pub const KEY_1: Keysym = Keysym(0x0031);
    pub const KEY_9: Keysym = Keysym(0x0039);

    /// Check if this keysym represents a printable character
    pub fn is_printable(&self) -> bool {
        // ASCII printable range (0x20-0x7e)
        (0x0020..=0x007e).contains(&self.0)
    }

    /// Try to convert this keysym to a character
    pub fn to_char(&self) -> Option<char> {
        if self.is_printable() {
            char::from_u32(self.0)
        } else {
            None
        }
    }

    /// Digit value of `0`-`9`
    pub fn digit_value(&self) -> Option<u8> {
        match self.0 {
            0x0030..=0x0039 => Some((self.0 - 0x0030) as u8),
            _ => None,
        }
    }

    /// Check if this is a right-side modifier key used for the table/direct
    /// mode toggle. Keyboards map the right CMD/Super key to different keysyms
    /// (Alt_R, Super_R, Meta_R, Hyper_R), so all of them are accepted.
    pub fn is_mode_toggle_key(&self) -> bool {
        matches!(
            *self,
            Self::ALT_R | Self::SUPER_R | Self::META_R | Self::HYPER_R
        )
    }

    /// Check if this is a modifier key
    pub fn is_modifier(&self) -> bool {
        matches!(
            *self,
            Self::SHIFT_L
                | Self::SHIFT_R
                | Self::CONTROL_L
                | Self::CONTROL_R
                | Self::ALT_L
                | Self::ALT_R
                | Self::META_L
                | Self::META_R
                | Self::SUPER_L
                | Self::SUPER_R
                | Self::HYPER_L
                | Self::HYPER_R
        )
    }
}

impl fmt::Display for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ch) = self.to_char() {
            write!(f, "{}", ch)
        } else {
            write!(f, "Keysym(0x{:04x})", self.0)
        }
    }
}

/// Key modifier flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift_key: bool,
    pub control_key: bool,
    pub alt_key: bool,
    pub super_key: bool,
}

/// XKB modifier bitmask constants used at the C boundary.
impl KeyModifiers {
    pub const SHIFT_MASK: u32 = 1; // ShiftMask
    pub const CONTROL_MASK: u32 = 4; // ControlMask
    pub const ALT_MASK: u32 = 8; // Mod1Mask
    pub const SUPER_MASK: u32 = 64; // Mod4Mask
    /// Set by IBus-style hosts on key release events
    pub const RELEASE_MASK: u32 = 1 << 30;

    /// Decode a bitmask of XKB modifier flags into a `KeyModifiers` struct.
    pub fn from_modifier_state(state: u32) -> Self {
        Self {
            shift_key: (state & Self::SHIFT_MASK) != 0,
            control_key: (state & Self::CONTROL_MASK) != 0,
            alt_key: (state & Self::ALT_MASK) != 0,
            super_key: (state & Self::SUPER_MASK) != 0,
        }
    }
}

impl KeyModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_control(mut self, control: bool) -> Self {
        self.control_key = control;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt_key = alt;
        self
    }

    /// Control, Alt or Super held: the key is a shortcut, not text input
    pub fn has_command(&self) -> bool {
        self.control_key || self.alt_key || self.super_key
    }
}

/// A key event
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// The key symbol
    pub keysym: Keysym,
    /// Hardware key code (informational only)
    pub keycode: u32,
    /// Modifier key state
    pub modifiers: KeyModifiers,
    /// Whether this is a key press (true) or release (false)
    pub is_press: bool,
}

impl KeyEvent {
    pub fn new(keysym: Keysym, modifiers: KeyModifiers, is_press: bool) -> Self {
        Self {
            keysym,
            keycode: 0,
            modifiers,
            is_press,
        }
    }

    /// Build an event from a raw host modifier mask. A set `RELEASE_MASK` bit
    /// marks a release even when `is_release` is false.
    pub fn from_raw(keysym: u32, keycode: u32, state: u32, is_release: bool) -> Self {
        Self {
            keysym: Keysym(keysym),
            keycode,
            modifiers: KeyModifiers::from_modifier_state(state),
            is_press: !is_release && (state & KeyModifiers::RELEASE_MASK) == 0,
        }
    }

    /// Create a simple key press event without modifiers
    pub fn press(keysym: Keysym) -> Self {
        Self::new(keysym, KeyModifiers::default(), true)
    }

    /// Check if this is a printable character key press
    pub fn is_printable_press(&self) -> bool {
        self.is_press && self.keysym.is_printable() && !self.modifiers.has_command()
    }

    /// Get the character for this key event if it's a printable press
    pub fn to_char(&self) -> Option<char> {
        if self.is_printable_press() {
            self.keysym.to_char()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keysym_printable() {
        assert!(Keysym(0x0061).is_printable()); // 'a'
        assert!(Keysym(0x0041).is_printable()); // 'A'
        assert!(Keysym(0x0020).is_printable()); // space
        assert!(!Keysym::BACKSPACE.is_printable());
        assert!(!Keysym::RETURN.is_printable());
    }

    #[test]
    fn test_digit_value() {
        assert_eq!(Keysym::KEY_0.digit_value(), Some(0));
        assert_eq!(Keysym::KEY_1.digit_value(), Some(1));
        assert_eq!(Keysym::KEY_9.digit_value(), Some(9));
        assert_eq!(Keysym(0x0061).digit_value(), None);
    }

    #[test]
    fn test_from_raw_release_mask() {
        let ev = KeyEvent::from_raw(0x61, 38, KeyModifiers::RELEASE_MASK, false);
        assert!(!ev.is_press);
        let ev = KeyEvent::from_raw(0x61, 38, 0, true);
        assert!(!ev.is_press);
        let ev = KeyEvent::from_raw(0x61, 38, KeyModifiers::CONTROL_MASK, false);
        assert!(ev.is_press);
        assert!(ev.modifiers.control_key);
        assert_eq!(ev.keycode, 38);
    }

    #[test]
    fn test_key_event_printable() {
        let event = KeyEvent::press(Keysym(0x0061));
        assert!(event.is_printable_press());
        assert_eq!(event.to_char(), Some('a'));

        let ctrl_a = KeyEvent::new(Keysym(0x0061), KeyModifiers::new().with_control(true), true);
        assert!(!ctrl_a.is_printable_press());

        let alt_a = KeyEvent::new(Keysym(0x0061), KeyModifiers::new().with_alt(true), true);
        assert_eq!(alt_a.to_char(), None);
    }
}
