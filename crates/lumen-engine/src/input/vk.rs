//! Platform virtual-key codes.
//!
//! The numbering follows the Win32 virtual-key layout, which is what raw key and
//! mouse-button messages carry. Platform layers that do not produce these natively
//! (see `window::platform::winit`) translate into this space.
//!
//! Ctrl/Shift/Alt arrive side-agnostic (`CONTROL`, `SHIFT`, `MENU`); the lateral
//! codes are produced by `LateralModifiers::resolve`.

pub const LBUTTON: u8 = 0x01;
pub const RBUTTON: u8 = 0x02;
pub const CANCEL: u8 = 0x03;
pub const MBUTTON: u8 = 0x04;
pub const XBUTTON1: u8 = 0x05;
pub const XBUTTON2: u8 = 0x06;

pub const BACK: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const CLEAR: u8 = 0x0C;
pub const RETURN: u8 = 0x0D;

pub const SHIFT: u8 = 0x10;
pub const CONTROL: u8 = 0x11;
pub const MENU: u8 = 0x12;
pub const PAUSE: u8 = 0x13;
pub const CAPITAL: u8 = 0x14;

pub const ESCAPE: u8 = 0x1B;

pub const SPACE: u8 = 0x20;
pub const PRIOR: u8 = 0x21;
pub const NEXT: u8 = 0x22;
pub const END: u8 = 0x23;
pub const HOME: u8 = 0x24;
pub const LEFT: u8 = 0x25;
pub const UP: u8 = 0x26;
pub const RIGHT: u8 = 0x27;
pub const DOWN: u8 = 0x28;
pub const SNAPSHOT: u8 = 0x2C;
pub const INSERT: u8 = 0x2D;
pub const DELETE: u8 = 0x2E;

/// `'0'..='9'` map to themselves.
pub const DIGIT_0: u8 = b'0';
/// `'A'..='Z'` map to themselves.
pub const KEY_A: u8 = b'A';

pub const LWIN: u8 = 0x5B;
pub const RWIN: u8 = 0x5C;
pub const APPS: u8 = 0x5D;
pub const SLEEP: u8 = 0x5F;

pub const NUMPAD0: u8 = 0x60;
pub const MULTIPLY: u8 = 0x6A;
pub const ADD: u8 = 0x6B;
pub const SEPARATOR: u8 = 0x6C;
pub const SUBTRACT: u8 = 0x6D;
pub const DECIMAL: u8 = 0x6E;
pub const DIVIDE: u8 = 0x6F;

pub const F1: u8 = 0x70;
pub const F15: u8 = 0x7E;
pub const F24: u8 = 0x87;

pub const NUMLOCK: u8 = 0x90;
pub const SCROLL: u8 = 0x91;
pub const OEM_NEC_EQUAL: u8 = 0x92;

pub const LSHIFT: u8 = 0xA0;
pub const RSHIFT: u8 = 0xA1;
pub const LCONTROL: u8 = 0xA2;
pub const RCONTROL: u8 = 0xA3;
pub const LMENU: u8 = 0xA4;
pub const RMENU: u8 = 0xA5;

pub const BROWSER_BACK: u8 = 0xA6;
pub const BROWSER_FORWARD: u8 = 0xA7;
pub const BROWSER_REFRESH: u8 = 0xA8;
pub const BROWSER_STOP: u8 = 0xA9;
pub const BROWSER_SEARCH: u8 = 0xAA;
pub const BROWSER_FAVORITES: u8 = 0xAB;
pub const BROWSER_HOME: u8 = 0xAC;

pub const VOLUME_MUTE: u8 = 0xAD;
pub const VOLUME_DOWN: u8 = 0xAE;
pub const VOLUME_UP: u8 = 0xAF;
pub const MEDIA_NEXT_TRACK: u8 = 0xB0;
pub const MEDIA_PREV_TRACK: u8 = 0xB1;
pub const MEDIA_STOP: u8 = 0xB2;
pub const MEDIA_PLAY_PAUSE: u8 = 0xB3;
pub const LAUNCH_MAIL: u8 = 0xB4;
pub const LAUNCH_MEDIA_SELECT: u8 = 0xB5;

pub const OEM_1: u8 = 0xBA;
pub const OEM_PLUS: u8 = 0xBB;
pub const OEM_COMMA: u8 = 0xBC;
pub const OEM_MINUS: u8 = 0xBD;
pub const OEM_PERIOD: u8 = 0xBE;
pub const OEM_2: u8 = 0xBF;
pub const OEM_3: u8 = 0xC0;
pub const OEM_4: u8 = 0xDB;
pub const OEM_5: u8 = 0xDC;
pub const OEM_6: u8 = 0xDD;
pub const OEM_7: u8 = 0xDE;
