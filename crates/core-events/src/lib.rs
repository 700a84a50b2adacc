//! Events flowing from the terminal reader into the composer loop.
//!
//! One async input task sends; the loop in `length-gauge` is the only
//! receiver and the only owner of composer state, so nothing here is shared
//! beyond the telemetry counters.

use std::sync::atomic::AtomicU64;

/// Capacity of the input → loop channel. The reader awaits `send`, so a
/// busy loop slows typing down rather than losing keys.
pub const EVENT_CHANNEL_CAP: usize = 1024;

// Input telemetry. Relaxed counters, reported once on shutdown.
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_REPEAT: AtomicU64 = AtomicU64::new(0);
pub static PASTE_SESSIONS: AtomicU64 = AtomicU64::new(0);
pub static PASTE_CHUNKS: AtomicU64 = AtomicU64::new(0);
pub static PASTE_BYTES: AtomicU64 = AtomicU64::new(0);
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOPS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Ask the loop to stop as if the user had quit.
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    /// May carry a typed character. Log [`KeyToken::kind_label`] instead.
    KeyPress(KeyEventExt),
    /// New terminal size in columns and rows.
    Resize(u16, u16),
    CtrlC,
    PasteStart,
    /// Part of the pasted text. Only its length may be logged.
    PasteChunk(String),
    PasteEnd,
    FocusGained,
    FocusLost,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEventExt {
    pub token: KeyToken,
    /// Auto-repeat from a held key.
    pub repeat: bool,
}

impl KeyEventExt {
    pub fn new(token: KeyToken) -> Self {
        Self::with_repeat(token, false)
    }

    pub fn with_repeat(token: KeyToken, repeat: bool) -> Self {
        Self { token, repeat }
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ModMask: u8 {
        const CTRL = 1;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
        const SUPER = 1 << 4;
    }
}

/// Non-character keys the composer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Esc,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Named(NamedKey),
    /// A key held together with modifiers, e.g. Ctrl-S.
    Chord { base: Box<KeyToken>, mods: ModMask },
}

impl KeyToken {
    /// Wraps `base` in a chord unless `mods` is empty.
    pub fn chord(base: KeyToken, mods: ModMask) -> Self {
        if mods.is_empty() {
            return base;
        }
        KeyToken::Chord {
            base: Box::new(base),
            mods,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            KeyToken::Char(_) => "char",
            KeyToken::Named(_) => "named",
            KeyToken::Chord { .. } => "chord",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_key_event_is_not_a_repeat() {
        let press = KeyEventExt::new(KeyToken::Char('a'));
        assert_eq!(press, KeyEventExt::with_repeat(KeyToken::Char('a'), false));
    }

    #[test]
    fn empty_mods_leave_the_token_plain() {
        assert_eq!(
            KeyToken::chord(KeyToken::Named(NamedKey::Enter), ModMask::empty()),
            KeyToken::Named(NamedKey::Enter)
        );
    }

    #[test]
    fn ctrl_s_wraps_the_base_key() {
        let KeyToken::Chord { base, mods } = KeyToken::chord(KeyToken::Char('s'), ModMask::CTRL)
        else {
            panic!("expected a chord");
        };
        assert_eq!(*base, KeyToken::Char('s'));
        assert_eq!(mods, ModMask::CTRL);
    }

    #[test]
    fn kind_labels() {
        let chord = KeyToken::chord(KeyToken::Char('p'), ModMask::ALT);
        for (token, label) in [
            (KeyToken::Char('p'), "char"),
            (KeyToken::Named(NamedKey::Tab), "named"),
            (chord, "chord"),
        ] {
            assert_eq!(token.kind_label(), label);
        }
    }
}
