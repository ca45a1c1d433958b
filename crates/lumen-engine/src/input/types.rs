use std::fmt;

/// Application-level input symbol.
///
/// Every raw platform code maps to exactly one symbol. Codes without a meaning map
/// to `Invalid`; code 0 maps to `Null`. Consumers treat both as "no semantic
/// meaning" rather than as errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InputSymbol {
    /// Raw code 0.
    Null,
    /// Raw code with no defined symbol.
    Invalid,

    // Pointer
    MouseLeft,
    MouseRight,
    MouseMiddle,
    MouseX1,
    MouseX2,
    MouseWheel,
    MouseMove,

    // Control keys
    Backspace,
    Tab,
    Enter,
    Pause,
    CapsLock,
    Escape,
    Space,

    PageUp,
    PageDown,
    End,
    Home,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Insert,
    Delete,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    LeftWin,
    RightWin,
    Apps,
    Sleep,

    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadMultiply,
    NumpadAdd,
    NumpadSubtract,
    NumpadDecimal,
    NumpadDivide,
    NumpadEquals,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8,
    F9, F10, F11, F12, F13, F14, F15,

    NumLock,
    ScrollLock,

    /// Side-agnostic modifiers, as delivered by the raw platform code.
    Shift,
    Ctrl,
    Alt,

    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,

    // Browser / media
    BrowserBack,
    BrowserForward,
    BrowserRefresh,
    BrowserStop,
    BrowserSearch,
    BrowserFavorites,
    BrowserHome,
    VolumeMute,
    VolumeDown,
    VolumeUp,
    MediaNextTrack,
    MediaPrevTrack,
    MediaStop,
    MediaPlayPause,
    LaunchMail,
    LaunchMediaSelect,

    // Punctuation (US layout positions)
    Semicolon,
    Comma,
    Minus,
    Period,
    Slash,
    Grave,
    LeftBracket,
    Backslash,
    RightBracket,
    Quote,
}

impl InputSymbol {
    /// True for `Null` and `Invalid`.
    pub fn is_meaningless(self) -> bool {
        matches!(self, InputSymbol::Null | InputSymbol::Invalid)
    }

    pub fn is_mouse_button(self) -> bool {
        matches!(
            self,
            InputSymbol::MouseLeft
                | InputSymbol::MouseRight
                | InputSymbol::MouseMiddle
                | InputSymbol::MouseX1
                | InputSymbol::MouseX2
        )
    }

    /// True for the six left/right Ctrl/Shift/Alt variants.
    pub fn is_lateral_modifier(self) -> bool {
        matches!(
            self,
            InputSymbol::LeftShift
                | InputSymbol::RightShift
                | InputSymbol::LeftCtrl
                | InputSymbol::RightCtrl
                | InputSymbol::LeftAlt
                | InputSymbol::RightAlt
        )
    }
}

impl fmt::Display for InputSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Direction of a key transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyTransition {
    Down,
    Up,
}
