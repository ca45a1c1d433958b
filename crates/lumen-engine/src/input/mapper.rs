use super::types::InputSymbol;
use super::vk;

const CODE_COUNT: usize = 256;

const DIGITS: [InputSymbol; 10] = [
    InputSymbol::Digit0, InputSymbol::Digit1, InputSymbol::Digit2, InputSymbol::Digit3,
    InputSymbol::Digit4, InputSymbol::Digit5, InputSymbol::Digit6, InputSymbol::Digit7,
    InputSymbol::Digit8, InputSymbol::Digit9,
];

const LETTERS: [InputSymbol; 26] = [
    InputSymbol::A, InputSymbol::B, InputSymbol::C, InputSymbol::D, InputSymbol::E,
    InputSymbol::F, InputSymbol::G, InputSymbol::H, InputSymbol::I, InputSymbol::J,
    InputSymbol::K, InputSymbol::L, InputSymbol::M, InputSymbol::N, InputSymbol::O,
    InputSymbol::P, InputSymbol::Q, InputSymbol::R, InputSymbol::S, InputSymbol::T,
    InputSymbol::U, InputSymbol::V, InputSymbol::W, InputSymbol::X, InputSymbol::Y,
    InputSymbol::Z,
];

const NUMPAD: [InputSymbol; 10] = [
    InputSymbol::Numpad0, InputSymbol::Numpad1, InputSymbol::Numpad2, InputSymbol::Numpad3,
    InputSymbol::Numpad4, InputSymbol::Numpad5, InputSymbol::Numpad6, InputSymbol::Numpad7,
    InputSymbol::Numpad8, InputSymbol::Numpad9,
];

// F16..F24 exist as codes but have no symbol.
const FUNCTION_KEYS: [InputSymbol; 15] = [
    InputSymbol::F1, InputSymbol::F2, InputSymbol::F3, InputSymbol::F4, InputSymbol::F5,
    InputSymbol::F6, InputSymbol::F7, InputSymbol::F8, InputSymbol::F9, InputSymbol::F10,
    InputSymbol::F11, InputSymbol::F12, InputSymbol::F13, InputSymbol::F14, InputSymbol::F15,
];

/// Write-once code → symbol table, evaluated at compile time.
static TABLE: [InputSymbol; CODE_COUNT] = build_table();

const fn build_table() -> [InputSymbol; CODE_COUNT] {
    let mut t = [InputSymbol::Invalid; CODE_COUNT];

    t[0] = InputSymbol::Null;

    t[vk::LBUTTON as usize] = InputSymbol::MouseLeft;
    t[vk::RBUTTON as usize] = InputSymbol::MouseRight;
    t[vk::MBUTTON as usize] = InputSymbol::MouseMiddle;
    t[vk::XBUTTON1 as usize] = InputSymbol::MouseX1;
    t[vk::XBUTTON2 as usize] = InputSymbol::MouseX2;

    t[vk::BACK as usize] = InputSymbol::Backspace;
    t[vk::TAB as usize] = InputSymbol::Tab;
    t[vk::RETURN as usize] = InputSymbol::Enter;

    t[vk::SHIFT as usize] = InputSymbol::Shift;
    t[vk::CONTROL as usize] = InputSymbol::Ctrl;
    t[vk::MENU as usize] = InputSymbol::Alt;
    t[vk::PAUSE as usize] = InputSymbol::Pause;
    t[vk::CAPITAL as usize] = InputSymbol::CapsLock;

    t[vk::ESCAPE as usize] = InputSymbol::Escape;

    t[vk::SPACE as usize] = InputSymbol::Space;
    t[vk::PRIOR as usize] = InputSymbol::PageUp;
    t[vk::NEXT as usize] = InputSymbol::PageDown;
    t[vk::END as usize] = InputSymbol::End;
    t[vk::HOME as usize] = InputSymbol::Home;
    t[vk::LEFT as usize] = InputSymbol::ArrowLeft;
    t[vk::UP as usize] = InputSymbol::ArrowUp;
    t[vk::RIGHT as usize] = InputSymbol::ArrowRight;
    t[vk::DOWN as usize] = InputSymbol::ArrowDown;
    t[vk::INSERT as usize] = InputSymbol::Insert;
    t[vk::DELETE as usize] = InputSymbol::Delete;

    let mut i = 0;
    while i < DIGITS.len() {
        t[vk::DIGIT_0 as usize + i] = DIGITS[i];
        i += 1;
    }

    let mut i = 0;
    while i < LETTERS.len() {
        t[vk::KEY_A as usize + i] = LETTERS[i];
        i += 1;
    }

    t[vk::LWIN as usize] = InputSymbol::LeftWin;
    t[vk::RWIN as usize] = InputSymbol::RightWin;
    t[vk::APPS as usize] = InputSymbol::Apps;
    t[vk::SLEEP as usize] = InputSymbol::Sleep;

    let mut i = 0;
    while i < NUMPAD.len() {
        t[vk::NUMPAD0 as usize + i] = NUMPAD[i];
        i += 1;
    }

    t[vk::MULTIPLY as usize] = InputSymbol::NumpadMultiply;
    t[vk::ADD as usize] = InputSymbol::NumpadAdd;
    t[vk::SUBTRACT as usize] = InputSymbol::NumpadSubtract;
    t[vk::DECIMAL as usize] = InputSymbol::NumpadDecimal;
    t[vk::DIVIDE as usize] = InputSymbol::NumpadDivide;

    let mut i = 0;
    while i < FUNCTION_KEYS.len() {
        t[vk::F1 as usize + i] = FUNCTION_KEYS[i];
        i += 1;
    }

    t[vk::NUMLOCK as usize] = InputSymbol::NumLock;
    t[vk::SCROLL as usize] = InputSymbol::ScrollLock;
    t[vk::OEM_NEC_EQUAL as usize] = InputSymbol::NumpadEquals;

    t[vk::LSHIFT as usize] = InputSymbol::LeftShift;
    t[vk::RSHIFT as usize] = InputSymbol::RightShift;
    t[vk::LCONTROL as usize] = InputSymbol::LeftCtrl;
    t[vk::RCONTROL as usize] = InputSymbol::RightCtrl;
    t[vk::LMENU as usize] = InputSymbol::LeftAlt;
    t[vk::RMENU as usize] = InputSymbol::RightAlt;

    t[vk::BROWSER_BACK as usize] = InputSymbol::BrowserBack;
    t[vk::BROWSER_FORWARD as usize] = InputSymbol::BrowserForward;
    t[vk::BROWSER_REFRESH as usize] = InputSymbol::BrowserRefresh;
    t[vk::BROWSER_STOP as usize] = InputSymbol::BrowserStop;
    t[vk::BROWSER_SEARCH as usize] = InputSymbol::BrowserSearch;
    t[vk::BROWSER_FAVORITES as usize] = InputSymbol::BrowserFavorites;
    t[vk::BROWSER_HOME as usize] = InputSymbol::BrowserHome;

    t[vk::VOLUME_MUTE as usize] = InputSymbol::VolumeMute;
    t[vk::VOLUME_DOWN as usize] = InputSymbol::VolumeDown;
    t[vk::VOLUME_UP as usize] = InputSymbol::VolumeUp;
    t[vk::MEDIA_NEXT_TRACK as usize] = InputSymbol::MediaNextTrack;
    t[vk::MEDIA_PREV_TRACK as usize] = InputSymbol::MediaPrevTrack;
    t[vk::MEDIA_STOP as usize] = InputSymbol::MediaStop;
    t[vk::MEDIA_PLAY_PAUSE as usize] = InputSymbol::MediaPlayPause;
    t[vk::LAUNCH_MAIL as usize] = InputSymbol::LaunchMail;
    t[vk::LAUNCH_MEDIA_SELECT as usize] = InputSymbol::LaunchMediaSelect;

    t[vk::OEM_1 as usize] = InputSymbol::Semicolon;
    t[vk::OEM_COMMA as usize] = InputSymbol::Comma;
    t[vk::OEM_MINUS as usize] = InputSymbol::Minus;
    t[vk::OEM_PERIOD as usize] = InputSymbol::Period;
    t[vk::OEM_2 as usize] = InputSymbol::Slash;
    t[vk::OEM_3 as usize] = InputSymbol::Grave;
    t[vk::OEM_4 as usize] = InputSymbol::LeftBracket;
    t[vk::OEM_5 as usize] = InputSymbol::Backslash;
    t[vk::OEM_6 as usize] = InputSymbol::RightBracket;
    t[vk::OEM_7 as usize] = InputSymbol::Quote;

    t
}

/// Translates a platform virtual-key code into an [`InputSymbol`].
///
/// Total over the code space: unmapped codes yield `Invalid`, code 0 yields `Null`.
#[inline]
pub fn translate(code: u8) -> InputSymbol {
    TABLE[code as usize]
}

/// Like [`translate`] for codes carried in a wider integer; anything past the
/// 8-bit code space is `Invalid`.
pub fn translate_raw(code: u32) -> InputSymbol {
    u8::try_from(code).map_or(InputSymbol::Invalid, translate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn zero_is_null() { assert_eq!(translate(0), InputSymbol::Null); }
    #[test] fn cancel_is_invalid() { assert_eq!(translate(vk::CANCEL), InputSymbol::Invalid); }
    #[test] fn clear_is_invalid() { assert_eq!(translate(vk::CLEAR), InputSymbol::Invalid); }
    #[test] fn f16_to_f24_are_invalid() {
        for code in (vk::F15 + 1)..=vk::F24 {
            assert_eq!(translate(code), InputSymbol::Invalid, "code {code:#x}");
        }
    }
    #[test] fn oem_plus_is_invalid() { assert_eq!(translate(vk::OEM_PLUS), InputSymbol::Invalid); }
    #[test] fn top_of_range_is_invalid() { assert_eq!(translate(0xFF), InputSymbol::Invalid); }
    #[test] fn wide_codes_are_invalid() { assert_eq!(translate_raw(0x1_0041), InputSymbol::Invalid); }
    #[test] fn wide_code_in_range() { assert_eq!(translate_raw(u32::from(b'Q')), InputSymbol::Q); }

    #[test]
    fn letters_and_digits() {
        assert_eq!(translate(b'A'), InputSymbol::A);
        assert_eq!(translate(b'Z'), InputSymbol::Z);
        assert_eq!(translate(b'0'), InputSymbol::Digit0);
        assert_eq!(translate(b'9'), InputSymbol::Digit9);
    }

    #[test]
    fn lowercase_ascii_is_not_a_letter() {
        // Lowercase ASCII lands in the numpad and function-key blocks.
        assert_eq!(translate(b'a'), InputSymbol::Numpad1);
        assert_eq!(translate(b'z'), InputSymbol::F11);
    }

    #[test]
    fn modifiers() {
        assert_eq!(translate(vk::CONTROL), InputSymbol::Ctrl);
        assert_eq!(translate(vk::LCONTROL), InputSymbol::LeftCtrl);
        assert_eq!(translate(vk::RMENU), InputSymbol::RightAlt);
        assert_eq!(translate(vk::RSHIFT), InputSymbol::RightShift);
    }

    #[test]
    fn volume_keys_are_not_swapped() {
        assert_eq!(translate(vk::VOLUME_UP), InputSymbol::VolumeUp);
        assert_eq!(translate(vk::VOLUME_DOWN), InputSymbol::VolumeDown);
    }

    #[test]
    fn mouse_buttons() {
        assert_eq!(translate(vk::LBUTTON), InputSymbol::MouseLeft);
        assert_eq!(translate(vk::XBUTTON2), InputSymbol::MouseX2);
        assert!(translate(vk::MBUTTON).is_mouse_button());
    }

    #[test]
    fn every_code_has_exactly_one_symbol() {
        let mut meaningful = 0;
        for code in 0..=u8::MAX {
            let sym = translate(code);
            assert_eq!(sym, translate(code));
            if !sym.is_meaningless() {
                meaningful += 1;
            }
        }
        assert!(meaningful > 100);
        let nulls = (0..=u8::MAX).filter(|c| translate(*c) == InputSymbol::Null).count();
        assert_eq!(nulls, 1);
    }
}
