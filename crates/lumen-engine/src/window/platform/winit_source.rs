use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as NativeWindow, WindowAttributes, WindowId};

use crate::coords::ClientSize;
use crate::input::{KeyStateQuery, vk};
use crate::window::message::{KeySet, MessageSource, RawMessage};

/// Platform wheel units per notch.
const WHEEL_DELTA: f32 = 120.0;

/// Pumps attempted while waiting for `resumed` to create the window.
const CREATE_ATTEMPTS: usize = 16;

/// A message paired with the held-key snapshot taken when it was translated, so
/// live key queries during dispatch see the state as of that message.
#[derive(Debug, Copy, Clone)]
struct Queued {
    msg: RawMessage,
    held: KeySet,
}

/// winit state machine collecting translated messages.
struct Collector {
    attrs: Option<WindowAttributes>,
    window: Option<Arc<NativeWindow>>,
    create_error: Option<String>,

    queue: VecDeque<Queued>,
    held: KeySet,
    cursor: (i32, i32),
    minimized: bool,
}

impl Collector {
    fn push(&mut self, msg: RawMessage) {
        self.queue.push_back(Queued {
            msg,
            held: self.held,
        });
    }
}

impl ApplicationHandler for Collector {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.attrs.take() else {
            return;
        };

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = ClientSize::from(window.inner_size());
                log::info!(
                    "window created: '{}' {}x{}",
                    window.title(),
                    size.width,
                    size.height
                );
                self.window = Some(Arc::new(window));
                self.push(RawMessage::Activate(true));
                self.push(RawMessage::Size(size));
            }
            Err(e) => {
                self.create_error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some((raw, physical)) = map_key(code) else {
                    return;
                };

                match event.state {
                    ElementState::Pressed => {
                        self.held.insert(physical);
                        self.push(RawMessage::KeyDown(raw));
                    }
                    ElementState::Released => {
                        self.held.remove(physical);
                        self.push(RawMessage::KeyUp(raw));
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
                let (x, y) = self.cursor;
                self.push(RawMessage::MouseMove { x, y });
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_mouse_button(button) else {
                    return;
                };
                let (x, y) = self.cursor;

                match state {
                    ElementState::Pressed => {
                        self.held.insert(button);
                        self.push(RawMessage::MouseDown { button, x, y });
                    }
                    ElementState::Released => {
                        self.held.remove(button);
                        self.push(RawMessage::MouseUp { button, x, y });
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => (y * WHEEL_DELTA) as i32,
                    MouseScrollDelta::PixelDelta(p) => p.y as i32,
                };
                let (x, y) = self.cursor;
                self.push(RawMessage::MouseWheel { x, y, delta });
            }

            WindowEvent::Resized(size) => {
                let size = ClientSize::from(size);
                if size.is_empty() && !self.minimized {
                    self.minimized = true;
                    self.push(RawMessage::Activate(false));
                } else if !size.is_empty() && self.minimized {
                    self.minimized = false;
                    self.push(RawMessage::Activate(true));
                }
                self.push(RawMessage::Size(size));
            }

            WindowEvent::Occluded(occluded) => self.push(RawMessage::Activate(!occluded)),

            WindowEvent::Focused(focused) => {
                // Releases that happen while unfocused are never delivered.
                if !focused {
                    self.held.clear();
                }
                self.push(RawMessage::Focus(focused));
            }

            WindowEvent::RedrawRequested => self.push(RawMessage::Paint),

            WindowEvent::CloseRequested => self.push(RawMessage::Close),

            _ => {}
        }
    }
}

/// winit-backed [`MessageSource`] owning the native window.
///
/// Uses `pump_app_events`: a zero timeout for [`peek`](MessageSource::peek) and no
/// timeout for [`wait`](MessageSource::wait). Desktop targets only.
pub struct WinitSource {
    event_loop: EventLoop<()>,
    collector: Collector,
    window: Arc<NativeWindow>,
    current: KeySet,
    exited: bool,
}

impl WinitSource {
    /// Creates the event loop and a window with the given client size.
    pub fn open(title: &str, size: ClientSize) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let attrs = NativeWindow::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::PhysicalSize::<u32>::from(size));

        let mut collector = Collector {
            attrs: Some(attrs),
            window: None,
            create_error: None,
            queue: VecDeque::new(),
            held: KeySet::default(),
            cursor: (0, 0),
            minimized: false,
        };

        // winit 0.30 creates windows inside `resumed`; pump until it fires.
        for _ in 0..CREATE_ATTEMPTS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut collector);
            if collector.window.is_some() || matches!(status, PumpStatus::Exit(_)) {
                break;
            }
        }

        if let Some(err) = collector.create_error.take() {
            return Err(anyhow!("failed to create window: {err}"));
        }
        let window = collector
            .window
            .clone()
            .context("window was not created (resumed never fired)")?;

        Ok(Self {
            event_loop,
            collector,
            window,
            current: KeySet::default(),
            exited: false,
        })
    }

    /// The native window, for GPU surface creation.
    pub fn native_window(&self) -> Arc<NativeWindow> {
        Arc::clone(&self.window)
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        if self.exited {
            return;
        }
        let status = self.event_loop.pump_app_events(timeout, &mut self.collector);
        if let PumpStatus::Exit(code) = status {
            log::debug!("winit event loop exited with code {code}");
            self.exited = true;
        }
    }

    fn pop(&mut self) -> Option<RawMessage> {
        let q = self.collector.queue.pop_front()?;
        self.current = q.held;
        Some(q.msg)
    }
}

impl KeyStateQuery for WinitSource {
    fn is_key_down(&self, code: u8) -> bool {
        match code {
            vk::SHIFT => self.current.contains(vk::LSHIFT) || self.current.contains(vk::RSHIFT),
            vk::CONTROL => {
                self.current.contains(vk::LCONTROL) || self.current.contains(vk::RCONTROL)
            }
            vk::MENU => self.current.contains(vk::LMENU) || self.current.contains(vk::RMENU),
            _ => self.current.contains(code),
        }
    }
}

impl MessageSource for WinitSource {
    fn peek(&mut self) -> Option<RawMessage> {
        if self.collector.queue.is_empty() {
            self.pump(Some(Duration::ZERO));
        }
        match self.pop() {
            Some(msg) => Some(msg),
            None if self.exited => Some(RawMessage::Quit),
            None => None,
        }
    }

    fn wait(&mut self) -> RawMessage {
        loop {
            if let Some(msg) = self.pop() {
                return msg;
            }
            if self.exited {
                return RawMessage::Quit;
            }
            self.pump(None);
        }
    }

    fn post_quit(&mut self) {
        self.collector.push(RawMessage::Quit);
    }

    fn client_size(&self) -> ClientSize {
        ClientSize::from(self.window.inner_size())
    }

    fn title(&self) -> String {
        self.window.title()
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

fn map_mouse_button(b: WinitMouseButton) -> Option<u8> {
    match b {
        WinitMouseButton::Left => Some(vk::LBUTTON),
        WinitMouseButton::Right => Some(vk::RBUTTON),
        WinitMouseButton::Middle => Some(vk::MBUTTON),
        WinitMouseButton::Back => Some(vk::XBUTTON1),
        WinitMouseButton::Forward => Some(vk::XBUTTON2),
        WinitMouseButton::Other(_) => None,
    }
}

/// Maps a physical key to `(raw code, physical code)`.
///
/// The raw code is what a key message carries: side-agnostic for Ctrl/Shift/Alt.
/// The physical code is what the held-key set records.
fn map_key(code: KeyCode) -> Option<(u8, u8)> {
    let lateral = match code {
        KeyCode::ShiftLeft => Some((vk::SHIFT, vk::LSHIFT)),
        KeyCode::ShiftRight => Some((vk::SHIFT, vk::RSHIFT)),
        KeyCode::ControlLeft => Some((vk::CONTROL, vk::LCONTROL)),
        KeyCode::ControlRight => Some((vk::CONTROL, vk::RCONTROL)),
        KeyCode::AltLeft => Some((vk::MENU, vk::LMENU)),
        KeyCode::AltRight => Some((vk::MENU, vk::RMENU)),
        _ => None,
    };
    if lateral.is_some() {
        return lateral;
    }

    let v = match code {
        KeyCode::Escape => vk::ESCAPE,
        KeyCode::Enter | KeyCode::NumpadEnter => vk::RETURN,
        KeyCode::Tab => vk::TAB,
        KeyCode::Backspace => vk::BACK,
        KeyCode::Space => vk::SPACE,
        KeyCode::Pause => vk::PAUSE,
        KeyCode::CapsLock => vk::CAPITAL,
        KeyCode::PrintScreen => vk::SNAPSHOT,

        KeyCode::Insert => vk::INSERT,
        KeyCode::Delete => vk::DELETE,
        KeyCode::Home => vk::HOME,
        KeyCode::End => vk::END,
        KeyCode::PageUp => vk::PRIOR,
        KeyCode::PageDown => vk::NEXT,

        KeyCode::ArrowUp => vk::UP,
        KeyCode::ArrowDown => vk::DOWN,
        KeyCode::ArrowLeft => vk::LEFT,
        KeyCode::ArrowRight => vk::RIGHT,

        KeyCode::SuperLeft => vk::LWIN,
        KeyCode::SuperRight => vk::RWIN,
        KeyCode::ContextMenu => vk::APPS,
        KeyCode::Sleep => vk::SLEEP,

        KeyCode::KeyA => b'A',
        KeyCode::KeyB => b'B',
        KeyCode::KeyC => b'C',
        KeyCode::KeyD => b'D',
        KeyCode::KeyE => b'E',
        KeyCode::KeyF => b'F',
        KeyCode::KeyG => b'G',
        KeyCode::KeyH => b'H',
        KeyCode::KeyI => b'I',
        KeyCode::KeyJ => b'J',
        KeyCode::KeyK => b'K',
        KeyCode::KeyL => b'L',
        KeyCode::KeyM => b'M',
        KeyCode::KeyN => b'N',
        KeyCode::KeyO => b'O',
        KeyCode::KeyP => b'P',
        KeyCode::KeyQ => b'Q',
        KeyCode::KeyR => b'R',
        KeyCode::KeyS => b'S',
        KeyCode::KeyT => b'T',
        KeyCode::KeyU => b'U',
        KeyCode::KeyV => b'V',
        KeyCode::KeyW => b'W',
        KeyCode::KeyX => b'X',
        KeyCode::KeyY => b'Y',
        KeyCode::KeyZ => b'Z',

        KeyCode::Digit0 => b'0',
        KeyCode::Digit1 => b'1',
        KeyCode::Digit2 => b'2',
        KeyCode::Digit3 => b'3',
        KeyCode::Digit4 => b'4',
        KeyCode::Digit5 => b'5',
        KeyCode::Digit6 => b'6',
        KeyCode::Digit7 => b'7',
        KeyCode::Digit8 => b'8',
        KeyCode::Digit9 => b'9',

        KeyCode::Numpad0 => vk::NUMPAD0,
        KeyCode::Numpad1 => vk::NUMPAD0 + 1,
        KeyCode::Numpad2 => vk::NUMPAD0 + 2,
        KeyCode::Numpad3 => vk::NUMPAD0 + 3,
        KeyCode::Numpad4 => vk::NUMPAD0 + 4,
        KeyCode::Numpad5 => vk::NUMPAD0 + 5,
        KeyCode::Numpad6 => vk::NUMPAD0 + 6,
        KeyCode::Numpad7 => vk::NUMPAD0 + 7,
        KeyCode::Numpad8 => vk::NUMPAD0 + 8,
        KeyCode::Numpad9 => vk::NUMPAD0 + 9,
        KeyCode::NumpadMultiply => vk::MULTIPLY,
        KeyCode::NumpadAdd => vk::ADD,
        KeyCode::NumpadSubtract => vk::SUBTRACT,
        KeyCode::NumpadDecimal => vk::DECIMAL,
        KeyCode::NumpadDivide => vk::DIVIDE,
        KeyCode::NumpadEqual => vk::OEM_NEC_EQUAL,
        KeyCode::NumLock => vk::NUMLOCK,
        KeyCode::ScrollLock => vk::SCROLL,

        KeyCode::F1 => vk::F1,
        KeyCode::F2 => vk::F1 + 1,
        KeyCode::F3 => vk::F1 + 2,
        KeyCode::F4 => vk::F1 + 3,
        KeyCode::F5 => vk::F1 + 4,
        KeyCode::F6 => vk::F1 + 5,
        KeyCode::F7 => vk::F1 + 6,
        KeyCode::F8 => vk::F1 + 7,
        KeyCode::F9 => vk::F1 + 8,
        KeyCode::F10 => vk::F1 + 9,
        KeyCode::F11 => vk::F1 + 10,
        KeyCode::F12 => vk::F1 + 11,
        KeyCode::F13 => vk::F1 + 12,
        KeyCode::F14 => vk::F1 + 13,
        KeyCode::F15 => vk::F1 + 14,

        KeyCode::BrowserBack => vk::BROWSER_BACK,
        KeyCode::BrowserForward => vk::BROWSER_FORWARD,
        KeyCode::BrowserRefresh => vk::BROWSER_REFRESH,
        KeyCode::BrowserStop => vk::BROWSER_STOP,
        KeyCode::BrowserSearch => vk::BROWSER_SEARCH,
        KeyCode::BrowserFavorites => vk::BROWSER_FAVORITES,
        KeyCode::BrowserHome => vk::BROWSER_HOME,
        KeyCode::AudioVolumeMute => vk::VOLUME_MUTE,
        KeyCode::AudioVolumeDown => vk::VOLUME_DOWN,
        KeyCode::AudioVolumeUp => vk::VOLUME_UP,
        KeyCode::MediaTrackNext => vk::MEDIA_NEXT_TRACK,
        KeyCode::MediaTrackPrevious => vk::MEDIA_PREV_TRACK,
        KeyCode::MediaStop => vk::MEDIA_STOP,
        KeyCode::MediaPlayPause => vk::MEDIA_PLAY_PAUSE,
        KeyCode::LaunchMail => vk::LAUNCH_MAIL,
        KeyCode::MediaSelect => vk::LAUNCH_MEDIA_SELECT,

        KeyCode::Semicolon => vk::OEM_1,
        KeyCode::Equal => vk::OEM_PLUS,
        KeyCode::Comma => vk::OEM_COMMA,
        KeyCode::Minus => vk::OEM_MINUS,
        KeyCode::Period => vk::OEM_PERIOD,
        KeyCode::Slash => vk::OEM_2,
        KeyCode::Backquote => vk::OEM_3,
        KeyCode::BracketLeft => vk::OEM_4,
        KeyCode::Backslash => vk::OEM_5,
        KeyCode::BracketRight => vk::OEM_6,
        KeyCode::Quote => vk::OEM_7,

        _ => return None,
    };

    Some((v, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputSymbol, translate};

    #[test]
    fn modifiers_are_side_agnostic_on_the_wire() {
        assert_eq!(map_key(KeyCode::ControlRight), Some((vk::CONTROL, vk::RCONTROL)));
        assert_eq!(map_key(KeyCode::ShiftLeft), Some((vk::SHIFT, vk::LSHIFT)));
    }

    #[test]
    fn keys_land_on_their_symbols() {
        let sym = |c| translate(map_key(c).map(|(raw, _)| raw).unwrap_or(0));
        assert_eq!(sym(KeyCode::KeyQ), InputSymbol::Q);
        assert_eq!(sym(KeyCode::F12), InputSymbol::F12);
        assert_eq!(sym(KeyCode::Numpad7), InputSymbol::Numpad7);
        assert_eq!(sym(KeyCode::PageDown), InputSymbol::PageDown);
        assert_eq!(sym(KeyCode::Backquote), InputSymbol::Grave);
    }

    #[test] fn unmapped_key_is_dropped() { assert_eq!(map_key(KeyCode::Fn), None); }
    #[test] fn other_buttons_are_dropped() { assert_eq!(map_mouse_button(WinitMouseButton::Other(9)), None); }
}
