use core_events::{KeyToken, ModMask, NamedKey};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A crossterm key press reduced to what the composer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyPressParts {
    pub token: KeyToken,
    pub mods: ModMask,
    pub repeat: bool,
}

/// Translate a crossterm key event. Keys the composer never binds (function
/// keys, media keys, lock keys) yield `None`.
pub(crate) fn map_key_event(event: &KeyEvent) -> Option<KeyPressParts> {
    let token = map_key_token(event.code)?;
    let mut mods = map_mod_mask(event.modifiers);
    if let KeyToken::Char(_) = token {
        // `A` already carries its shift.
        mods -= ModMask::SHIFT;
    }
    Some(KeyPressParts {
        token,
        mods,
        repeat: event.kind == KeyEventKind::Repeat,
    })
}

fn map_key_token(code: KeyCode) -> Option<KeyToken> {
    let named = match code {
        KeyCode::Char(c) => return Some(KeyToken::Char(c)),
        KeyCode::Enter => NamedKey::Enter,
        KeyCode::Esc => NamedKey::Esc,
        KeyCode::Backspace => NamedKey::Backspace,
        KeyCode::Delete => NamedKey::Delete,
        KeyCode::Tab | KeyCode::BackTab => NamedKey::Tab,
        KeyCode::Left => NamedKey::Left,
        KeyCode::Right => NamedKey::Right,
        KeyCode::Up => NamedKey::Up,
        KeyCode::Down => NamedKey::Down,
        KeyCode::Home => NamedKey::Home,
        KeyCode::End => NamedKey::End,
        _ => return None,
    };
    Some(KeyToken::Named(named))
}

fn map_mod_mask(mods: KeyModifiers) -> ModMask {
    [
        (KeyModifiers::CONTROL, ModMask::CTRL),
        (KeyModifiers::ALT, ModMask::ALT),
        (KeyModifiers::SHIFT, ModMask::SHIFT),
        (KeyModifiers::SUPER, ModMask::SUPER),
        (KeyModifiers::META, ModMask::META),
    ]
    .into_iter()
    .filter(|(from, _)| mods.contains(*from))
    .fold(ModMask::empty(), |acc, (_, to)| acc | to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn ev(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::empty(),
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyPressParts> {
        map_key_event(&ev(code, modifiers, KeyEventKind::Press))
    }

    #[test]
    fn composer_keys_map_to_tokens() {
        let cases = [
            (KeyCode::Char('a'), KeyToken::Char('a')),
            (KeyCode::Enter, KeyToken::Named(NamedKey::Enter)),
            (KeyCode::Backspace, KeyToken::Named(NamedKey::Backspace)),
            (KeyCode::Delete, KeyToken::Named(NamedKey::Delete)),
            (KeyCode::Home, KeyToken::Named(NamedKey::Home)),
            (KeyCode::BackTab, KeyToken::Named(NamedKey::Tab)),
        ];
        for (code, expected) in cases {
            let parts = press(code, KeyModifiers::NONE).expect("composer key");
            assert_eq!(parts.token, expected, "{code:?}");
            assert!(parts.mods.is_empty());
            assert!(!parts.repeat);
        }
    }

    #[test]
    fn shift_is_folded_into_chars_but_kept_for_named_keys() {
        let upper = press(KeyCode::Char('A'), KeyModifiers::SHIFT).unwrap();
        assert_eq!(upper.token, KeyToken::Char('A'));
        assert!(upper.mods.is_empty());

        let shift_left = press(KeyCode::Left, KeyModifiers::SHIFT).unwrap();
        assert_eq!(shift_left.mods, ModMask::SHIFT);
    }

    #[test]
    fn ctrl_and_alt_bits_survive() {
        let parts = press(KeyCode::Char('s'), KeyModifiers::CONTROL | KeyModifiers::ALT).unwrap();
        assert_eq!(parts.mods, ModMask::CTRL | ModMask::ALT);
    }

    #[test]
    fn repeat_kind_sets_flag() {
        let parts = map_key_event(&ev(
            KeyCode::Backspace,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ))
        .unwrap();
        assert!(parts.repeat);
    }

    #[test]
    fn unbound_keys_are_dropped() {
        assert!(press(KeyCode::F(5), KeyModifiers::NONE).is_none());
        assert!(press(KeyCode::CapsLock, KeyModifiers::NONE).is_none());
        assert!(press(KeyCode::Insert, KeyModifiers::NONE).is_none());
    }
}
