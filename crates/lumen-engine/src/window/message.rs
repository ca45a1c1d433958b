use crate::coords::ClientSize;
use crate::input::KeyStateQuery;

/// Platform message vocabulary consumed by [`Window::dispatch`](super::Window::dispatch).
///
/// Key and button codes are virtual-key codes (`input::vk`). Pointer coordinates are
/// client-area pixels with the platform's top-left origin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RawMessage {
    KeyDown(u8),
    KeyUp(u8),
    MouseDown { button: u8, x: i32, y: i32 },
    MouseUp { button: u8, x: i32, y: i32 },
    MouseWheel { x: i32, y: i32, delta: i32 },
    MouseMove { x: i32, y: i32 },
    /// Window became active (`true`) or was minimised/hidden (`false`).
    Activate(bool),
    /// Keyboard focus gained (`true`) or lost (`false`).
    Focus(bool),
    /// Client region changed size.
    Size(ClientSize),
    Paint,
    EraseBackground,
    /// User asked to close the window.
    Close,
    /// Application quit signal; ends the message loop.
    Quit,
}

/// What the platform should do with a message after dispatch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Disposition {
    /// Continue with the platform's default handling.
    Default,
    /// Swallowed; the platform must not act on it (paint / background erase).
    Suppressed,
}

/// Source of platform messages for a single window.
///
/// This is the seam between the message loop and the windowing toolkit. `peek`
/// never blocks; `wait` blocks until something arrives.
pub trait MessageSource: KeyStateQuery {
    /// Next pending message, or `None` when the queue is empty.
    fn peek(&mut self) -> Option<RawMessage>;

    /// Blocks until a message is available.
    fn wait(&mut self) -> RawMessage;

    /// Queues a [`RawMessage::Quit`].
    fn post_quit(&mut self);

    /// Current client-region size as reported by the platform.
    fn client_size(&self) -> ClientSize;

    fn title(&self) -> String;

    fn set_title(&mut self, title: &str);
}

/// Fixed-size set of held virtual keys.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct KeySet([u64; 4]);

impl KeySet {
    #[inline]
    pub fn insert(&mut self, code: u8) {
        self.0[(code >> 6) as usize] |= 1u64 << (code & 63);
    }

    #[inline]
    pub fn remove(&mut self, code: u8) {
        self.0[(code >> 6) as usize] &= !(1u64 << (code & 63));
    }

    #[inline]
    pub fn contains(&self, code: u8) -> bool {
        self.0[(code >> 6) as usize] & (1u64 << (code & 63)) != 0
    }

    pub fn clear(&mut self) {
        self.0 = [0; 4];
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }
}
